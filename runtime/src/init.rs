//! Variable initialization (`spec.md` §4.1).
use scanvm_dsl::ast::{Program, VariableDeclaration, VariableQualifier};
use scanvm_dsl::types::DeclaredType;
use scanvm_dsl::value::Value;

use crate::coerce::trunc_to_i64;
use crate::eval::{evaluate, EvalContext};
use crate::registry::{ConstantRegistry, FbKind, FbKindRegistry, TypeRegistry};
use crate::store::{Store, TimerKind};

/// Builds the type registry by walking every variable block's
/// declarations. Declaration order follows source order; there is no
/// cross-declaration resolution at this stage.
pub fn build_type_registry(program: &Program) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for block in &program.var_blocks {
        for decl in &block.declarations {
            registry.insert(decl.name.clone(), DeclaredType::from_keyword(&decl.type_name));
        }
    }
    registry
}

/// Records the concrete FB personality (TON vs TOF vs TP, CTU vs CTD
/// vs CTUD, ...) named by each declaration's type keyword, so the
/// handler can dispatch by declared kind instead of only by
/// argument-signature heuristics.
pub fn build_fb_kind_registry(program: &Program) -> FbKindRegistry {
    let mut registry = FbKindRegistry::new();
    for block in &program.var_blocks {
        for decl in &block.declarations {
            if let Some(kind) = FbKind::from_keyword(&decl.type_name) {
                registry.insert(decl.name.clone(), kind);
            }
        }
    }
    registry
}

/// Records every name declared with the `CONSTANT` qualifier.
pub fn build_constant_registry(program: &Program) -> ConstantRegistry {
    let mut registry = ConstantRegistry::new();
    for block in &program.var_blocks {
        if block.qualifier == Some(VariableQualifier::Constant) {
            for decl in &block.declarations {
                registry.insert(decl.name.clone());
            }
        }
    }
    registry
}

/// Populates `store` with every declared variable's initial value and
/// creates function-block instances for FB-typed declarations.
///
/// Initial-value expressions may reference only literals and names
/// already initialized earlier in source order (§4.1): this function
/// builds the type registry once up front and evaluates each
/// initializer against the store as it stands so far.
pub fn initialize_variables(program: &Program, store: &mut Store) {
    let types = build_type_registry(program);
    for block in &program.var_blocks {
        for decl in &block.declarations {
            initialize_declaration(decl, &types, store);
        }
    }
}

fn initialize_declaration(decl: &VariableDeclaration, types: &TypeRegistry, store: &mut Store) {
    let declared = types.get(&decl.name).unwrap_or(DeclaredType::Unknown);

    let initial = decl.initial_value.as_ref().map(|expr| {
        let ctx = EvalContext {
            store,
            types,
            user_function_hook: None,
            user_fb_output_hook: None,
        };
        evaluate(expr, &ctx)
    });

    match declared {
        DeclaredType::Bool => {
            let v = initial.map(|v| crate::coerce::to_bool(&v)).unwrap_or(false);
            store.set_bool(&decl.name, v);
        }
        DeclaredType::Int => {
            let v = initial
                .map(|v| trunc_to_i64(crate::coerce::to_number(&v)))
                .unwrap_or(0);
            store.set_int(&decl.name, v);
        }
        DeclaredType::Real => {
            let v = initial.map(|v| crate::coerce::to_number(&v)).unwrap_or(0.0);
            store.set_real(&decl.name, v);
        }
        DeclaredType::Time => {
            let v = initial
                .map(|v| trunc_to_i64(crate::coerce::to_number(&v)))
                .unwrap_or(0);
            store.set_time(&decl.name, v);
        }
        DeclaredType::String => {
            let v = initial
                .map(|v| crate::coerce::to_string(&v))
                .unwrap_or_default();
            store.set_string(&decl.name, v);
        }
        DeclaredType::Timer => {
            let pt = initial
                .map(|v| trunc_to_i64(crate::coerce::to_number(&v)))
                .unwrap_or(0);
            let kind = match decl.type_name.to_ascii_uppercase().as_str() {
                "TOF" => TimerKind::Tof,
                "TP" => TimerKind::Tp,
                _ => TimerKind::Ton,
            };
            store.init_timer(&decl.name, pt, kind);
        }
        DeclaredType::Counter => {
            let pv = initial
                .map(|v| trunc_to_i64(crate::coerce::to_number(&v)))
                .unwrap_or(0);
            store.init_counter(&decl.name, pv);
        }
        DeclaredType::EdgeDetector => {
            store.init_edge_detector(&decl.name);
        }
        DeclaredType::Bistable => {
            store.init_bistable(&decl.name);
        }
        DeclaredType::Array | DeclaredType::Unknown => {
            // Fall back to value-type inference from the initializer, or
            // leave undeclared (store.get_variable's zero fallback
            // handles reads of a never-initialized name).
            if let Some(value) = initial {
                store_inferred(&decl.name, value, store);
            }
        }
    }
}

fn store_inferred(name: &scanvm_dsl::core::Id, value: Value, store: &mut Store) {
    match value {
        Value::Bool(b) => store.set_bool(name, b),
        Value::Int(i) => store.set_int(name, i),
        Value::Real(r) => store.set_real(name, r),
        Value::Time(t) => store.set_time(name, t),
        Value::String(s) => store.set_string(name, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanvm_dsl::ast::{Expression, VariableBlock, VariableScope};
    use scanvm_dsl::core::Id;

    fn decl(name: &str, type_name: &str, initial: Option<Expression>) -> VariableDeclaration {
        VariableDeclaration {
            name: Id::from(name),
            type_name: type_name.to_string(),
            initial_value: initial,
        }
    }

    #[test]
    fn initialize_variables_when_no_initializer_then_zero() {
        let program = Program {
            name: Id::from("P"),
            var_blocks: vec![VariableBlock {
                scope: VariableScope::Var,
                qualifier: None,
                declarations: vec![decl("x", "INT", None), decl("s", "STRING", None)],
            }],
            body: vec![],
        };
        let mut store = Store::new(100);
        initialize_variables(&program, &mut store);
        assert_eq!(store.get_int(&Id::from("x")), Some(0));
        assert_eq!(store.get_string(&Id::from("s")).unwrap(), "");
    }

    #[test]
    fn initialize_variables_when_constant_initializer_then_evaluates() {
        let program = Program {
            name: Id::from("P"),
            var_blocks: vec![VariableBlock {
                scope: VariableScope::Var,
                qualifier: Some(VariableQualifier::Constant),
                declarations: vec![decl(
                    "PI",
                    "REAL",
                    Some(Expression::Literal(Value::Real(3.14159))),
                )],
            }],
            body: vec![],
        };
        let mut store = Store::new(100);
        initialize_variables(&program, &mut store);
        assert_eq!(store.get_real(&Id::from("PI")), Some(3.14159));

        let constants = build_constant_registry(&program);
        assert!(constants.contains(&Id::from("PI")));
    }

    #[test]
    fn initialize_variables_when_timer_decl_then_creates_instance() {
        let program = Program {
            name: Id::from("P"),
            var_blocks: vec![VariableBlock {
                scope: VariableScope::Var,
                qualifier: None,
                declarations: vec![decl("t", "TON", None)],
            }],
            body: vec![],
        };
        let mut store = Store::new(100);
        initialize_variables(&program, &mut store);
        let timer = store.get_timer(&Id::from("t")).unwrap();
        assert_eq!(timer.pt, 0);
        assert_eq!(timer.et, 0);
        assert!(!timer.q);
    }
}
