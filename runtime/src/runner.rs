//! The scan-cycle runner (`spec.md` §4.5).
use scanvm_dsl::ast::Program;

use crate::context::{ExecutionContext, RuntimeState};
use crate::error::{ControlSignal, RuntimeError, Signal};
use crate::store::Store;

/// Executes the program body exactly once.
///
/// Timer elapsed-time advance happens inside each timer's own
/// function-block call (`fb::handle_timer`), not as a separate pre-pass
/// here: a timer's outputs only change when it is invoked. A
/// `ControlSignal::Return` escaping the body is the normal way a
/// program ends its scan; `Exit`/`Continue` escaping every loop is a
/// bug in the AST (or an interpreter bug) and surfaces as an error.
pub fn run_scan_cycle(
    program: &Program,
    store: &mut Store,
    runtime_state: &mut RuntimeState,
) -> Result<(), RuntimeError> {
    let mut ctx = ExecutionContext::create(store, runtime_state);
    match crate::exec::execute_block(&program.body, &mut ctx) {
        Ok(()) => Ok(()),
        Err(Signal::Control(ControlSignal::Return)) => Ok(()),
        Err(Signal::Control(_)) => Err(RuntimeError::UnhandledSignal),
        Err(Signal::Error(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanvm_dsl::ast::{Assignment, Expression, Statement, VariableBlock, VariableDeclaration, VariableRef, VariableScope};
    use scanvm_dsl::core::Id;
    use scanvm_dsl::value::Value;

    #[test]
    fn run_scan_cycle_when_return_statement_then_normal_exit() {
        let program = Program {
            name: Id::from("P"),
            var_blocks: vec![VariableBlock {
                scope: VariableScope::Var,
                qualifier: None,
                declarations: vec![VariableDeclaration {
                    name: Id::from("x"),
                    type_name: "INT".to_string(),
                    initial_value: None,
                }],
            }],
            body: vec![
                Statement::Assignment(Assignment {
                    target: VariableRef::simple("x"),
                    value: Expression::Literal(Value::Int(1)),
                }),
                Statement::Return,
                Statement::Assignment(Assignment {
                    target: VariableRef::simple("x"),
                    value: Expression::Literal(Value::Int(99)),
                }),
            ],
        };
        let mut store = Store::new(100);
        crate::init::initialize_variables(&program, &mut store);
        let mut state = RuntimeState::create(&program);

        run_scan_cycle(&program, &mut store, &mut state).unwrap();
        assert_eq!(store.get_int(&Id::from("x")), Some(1));
    }

    #[test]
    fn run_scan_cycle_when_exit_escapes_body_then_error() {
        let program = Program {
            name: Id::from("P"),
            var_blocks: vec![],
            body: vec![Statement::Exit],
        };
        let mut store = Store::new(100);
        let mut state = RuntimeState::create(&program);
        assert_eq!(
            run_scan_cycle(&program, &mut store, &mut state),
            Err(RuntimeError::UnhandledSignal)
        );
    }
}
