//! Runtime state and the execution context threaded through the
//! evaluator, executor, and function-block handler (`spec.md` §6, §9).
use std::collections::HashMap;

use scanvm_dsl::ast::Program;
use scanvm_dsl::core::Id;
use scanvm_dsl::value::Value;

use crate::registry::{ConstantRegistry, FbKindRegistry, TypeRegistry};
use crate::store::Store;

/// Per-program state that survives across scan cycles.
///
/// The previous-input map is keyed by `"<instance>.<pin>"` (e.g.
/// `"c.CU"`) and is consulted for edge detection on counter pins; it is
/// never cleared between scans (§4.4, §9 design note).
#[derive(Debug, Default)]
pub struct RuntimeState {
    pub previous_inputs: HashMap<String, bool>,
    pub types: TypeRegistry,
    pub constants: ConstantRegistry,
    pub fb_kinds: FbKindRegistry,
}

impl RuntimeState {
    /// Builds the type, constant, and FB-kind registries from
    /// `program`'s declarations and starts with an empty previous-input
    /// map.
    pub fn create(program: &Program) -> RuntimeState {
        RuntimeState {
            previous_inputs: HashMap::new(),
            types: crate::init::build_type_registry(program),
            constants: crate::init::build_constant_registry(program),
            fb_kinds: crate::init::build_fb_kind_registry(program),
        }
    }

    pub fn previous_input(&self, instance: &Id, pin: &str) -> bool {
        let key = format!("{}.{}", instance.lower_case(), pin.to_ascii_uppercase());
        self.previous_inputs.get(&key).copied().unwrap_or(false)
    }

    pub fn set_previous_input(&mut self, instance: &Id, pin: &str, value: bool) {
        let key = format!("{}.{}", instance.lower_case(), pin.to_ascii_uppercase());
        self.previous_inputs.insert(key, value);
    }
}

/// Lets an embedding host supply behavior for user-defined function
/// blocks and functions the core does not itself model (§4.2, §4.4).
pub trait UserFunctionHook {
    fn call(&self, name: &Id, args: &[Value]) -> Option<Value>;
}

pub trait UserFbOutputHook {
    fn output(&self, instance: &Id, field: &Id) -> Option<Value>;
}

/// Bundles the store and runtime state for one evaluation/execution
/// pass. Built fresh by the caller each scan via [`create`](Self::create).
pub struct ExecutionContext<'a> {
    pub store: &'a mut Store,
    pub runtime_state: &'a mut RuntimeState,
    pub user_function_hook: Option<&'a dyn UserFunctionHook>,
    pub user_fb_output_hook: Option<&'a dyn UserFbOutputHook>,
}

impl<'a> ExecutionContext<'a> {
    pub fn create(store: &'a mut Store, runtime_state: &'a mut RuntimeState) -> Self {
        ExecutionContext {
            store,
            runtime_state,
            user_function_hook: None,
            user_fb_output_hook: None,
        }
    }

    pub fn with_user_function_hook(mut self, hook: &'a dyn UserFunctionHook) -> Self {
        self.user_function_hook = Some(hook);
        self
    }

    pub fn with_user_fb_output_hook(mut self, hook: &'a dyn UserFbOutputHook) -> Self {
        self.user_fb_output_hook = Some(hook);
        self
    }

    /// Borrows a read-only [`crate::eval::EvalContext`] view for
    /// evaluating an expression without handing out mutable access to
    /// the store.
    pub fn eval_view(&self) -> crate::eval::EvalContext<'_> {
        crate::eval::EvalContext {
            store: self.store,
            types: &self.runtime_state.types,
            user_function_hook: self.user_function_hook,
            user_fb_output_hook: self.user_fb_output_hook,
        }
    }
}
