//! End-to-end scan-cycle scenarios covering a full program lifecycle:
//! declare, initialize, drive several scans, inspect the store.
use scanvm_dsl::ast::{
    Assignment, BinaryExpr, BinaryOp, CaseClause, CaseLabel, CaseStatement, Expression,
    FunctionBlockCall, IfStatement, NamedArgument, Program, Statement, VariableBlock,
    VariableDeclaration, VariableQualifier, VariableRef, VariableScope,
};
use scanvm_dsl::core::Id;
use scanvm_dsl::value::Value;
use scanvm_runtime::{initialize_variables, run_scan_cycle, RuntimeState, Store};

fn var(name: &str, type_name: &str) -> VariableDeclaration {
    VariableDeclaration {
        name: Id::from(name),
        type_name: type_name.to_string(),
        initial_value: None,
    }
}

fn var_block(decls: Vec<VariableDeclaration>) -> VariableBlock {
    VariableBlock {
        scope: VariableScope::Var,
        qualifier: None,
        declarations: decls,
    }
}

fn assign(target: &str, value: Expression) -> Statement {
    Statement::Assignment(Assignment {
        target: VariableRef::simple(target),
        value,
    })
}

fn var_expr(name: &str) -> Expression {
    Expression::Variable(VariableRef::simple(name))
}

fn fb_call(instance: &str, args: Vec<(&str, Expression)>) -> Statement {
    Statement::FunctionBlockCall(FunctionBlockCall {
        instance: Id::from(instance),
        arguments: args
            .into_iter()
            .map(|(name, value)| NamedArgument {
                name: Id::from(name),
                value,
            })
            .collect(),
    })
}

fn field(base: &str, field: &str) -> Expression {
    Expression::Variable(VariableRef {
        access_path: vec![Id::from(base), Id::from(field)],
        array_indices: vec![],
    })
}

fn drive(program: &Program, store: &mut Store, state: &mut RuntimeState, scans: u32) {
    for _ in 0..scans {
        run_scan_cycle(program, store, state).unwrap();
    }
}

/// S1 — TON at exact boundary.
#[test]
fn ton_reaches_boundary_then_falls_on_input_drop() {
    let program = Program {
        name: Id::from("S1"),
        var_blocks: vec![var_block(vec![var("t", "TON"), var("Start", "BOOL")])],
        body: vec![fb_call(
            "t",
            vec![("IN", var_expr("Start")), ("PT", Expression::Literal(Value::Time(500)))],
        )],
    };
    let mut store = Store::new(100);
    initialize_variables(&program, &mut store);
    let mut state = RuntimeState::create(&program);

    store.set_bool(&Id::from("Start"), true);
    drive(&program, &mut store, &mut state, 5);
    let timer = store.get_timer(&Id::from("t")).unwrap();
    assert!(timer.q);
    assert_eq!(timer.et, 500);

    store.set_bool(&Id::from("Start"), false);
    drive(&program, &mut store, &mut state, 1);
    let timer = store.get_timer(&Id::from("t")).unwrap();
    assert!(!timer.q);
    assert_eq!(timer.et, 0);
}

/// S2 — CTU edge counting.
#[test]
fn ctu_counts_rising_edges_and_reaches_done() {
    let program = Program {
        name: Id::from("S2"),
        var_blocks: vec![var_block(vec![
            var("c", "CTU"),
            var("Sensor", "BOOL"),
            var("Reset", "BOOL"),
        ])],
        body: vec![fb_call(
            "c",
            vec![
                ("CU", var_expr("Sensor")),
                ("R", var_expr("Reset")),
                ("PV", Expression::Literal(Value::Int(10))),
            ],
        )],
    };
    let mut store = Store::new(100);
    initialize_variables(&program, &mut store);
    let mut state = RuntimeState::create(&program);

    for _ in 0..10 {
        store.set_bool(&Id::from("Sensor"), false);
        drive(&program, &mut store, &mut state, 1);
        store.set_bool(&Id::from("Sensor"), true);
        drive(&program, &mut store, &mut state, 1);
    }
    let counter = store.get_counter(&Id::from("c")).unwrap();
    assert_eq!(counter.cv, 10);
    assert!(counter.qu);

    store.set_bool(&Id::from("Sensor"), true);
    drive(&program, &mut store, &mut state, 5);
    assert_eq!(store.get_counter(&Id::from("c")).unwrap().cv, 10);
}

/// S3 — SR motor latch with interlock.
#[test]
fn sr_latch_holds_until_fault_resets() {
    let program = Program {
        name: Id::from("S3"),
        var_blocks: vec![var_block(vec![
            var("MotorLatch", "SR"),
            var("StartBtn", "BOOL"),
            var("StopBtn", "BOOL"),
            var("Fault", "BOOL"),
            var("MotorRunning", "BOOL"),
        ])],
        body: vec![
            fb_call(
                "MotorLatch",
                vec![
                    (
                        "S1",
                        Expression::Binary(BinaryExpr {
                            op: BinaryOp::And,
                            left: Box::new(var_expr("StartBtn")),
                            right: Box::new(Expression::Unary(scanvm_dsl::ast::UnaryExpr {
                                op: scanvm_dsl::ast::UnaryOp::Not,
                                operand: Box::new(var_expr("Fault")),
                            })),
                        }),
                    ),
                    (
                        "R",
                        Expression::Binary(BinaryExpr {
                            op: BinaryOp::Or,
                            left: Box::new(var_expr("StopBtn")),
                            right: Box::new(var_expr("Fault")),
                        }),
                    ),
                ],
            ),
            assign("MotorRunning", field("MotorLatch", "Q1")),
        ],
    };
    let mut store = Store::new(100);
    initialize_variables(&program, &mut store);
    let mut state = RuntimeState::create(&program);

    store.set_bool(&Id::from("StartBtn"), true);
    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_bool(&Id::from("MotorRunning")), Some(true));

    store.set_bool(&Id::from("StartBtn"), false);
    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_bool(&Id::from("MotorRunning")), Some(true));

    store.set_bool(&Id::from("Fault"), true);
    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_bool(&Id::from("MotorRunning")), Some(false));

    store.set_bool(&Id::from("Fault"), false);
    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_bool(&Id::from("MotorRunning")), Some(false));
}

/// S4 — CASE with range and descending alias.
#[test]
fn case_matches_ranges_including_descending_alias() {
    fn program_for(phase: i64) -> (Program, Store, RuntimeState) {
        let program = Program {
            name: Id::from("S4"),
            var_blocks: vec![var_block(vec![var("phase", "INT"), var("a", "INT")])],
            body: vec![Statement::Case(CaseStatement {
                selector: var_expr("phase"),
                clauses: vec![
                    CaseClause {
                        labels: vec![CaseLabel::Single(0)],
                        body: vec![],
                    },
                    CaseClause {
                        labels: vec![CaseLabel::Range(1, 3)],
                        body: vec![assign("a", Expression::Literal(Value::Int(1)))],
                    },
                    CaseClause {
                        labels: vec![CaseLabel::Range(10, 5)],
                        body: vec![assign("a", Expression::Literal(Value::Int(2)))],
                    },
                ],
                else_branch: Some(vec![assign("a", Expression::Literal(Value::Int(9)))]),
            })],
        };
        let mut store = Store::new(100);
        initialize_variables(&program, &mut store);
        store.set_int(&Id::from("phase"), phase);
        let state = RuntimeState::create(&program);
        (program, store, state)
    }

    for (phase, expected) in [(2, 1), (7, 2), (99, 9)] {
        let (program, mut store, mut state) = program_for(phase);
        drive(&program, &mut store, &mut state, 1);
        assert_eq!(store.get_int(&Id::from("a")), Some(expected), "phase {}", phase);
    }
}

/// S5 — FOR with EXIT.
#[test]
fn for_loop_with_exit_sums_before_exit() {
    let program = Program {
        name: Id::from("S5"),
        var_blocks: vec![var_block(vec![var("i", "INT"), var("sum", "INT")])],
        body: vec![Statement::For(scanvm_dsl::ast::ForStatement {
            control: Id::from("i"),
            start: Expression::Literal(Value::Int(1)),
            end: Expression::Literal(Value::Int(100)),
            step: None,
            body: vec![
                Statement::If(IfStatement {
                    condition: Expression::Binary(BinaryExpr {
                        op: BinaryOp::Eq,
                        left: Box::new(var_expr("i")),
                        right: Box::new(Expression::Literal(Value::Int(5))),
                    }),
                    then_branch: vec![Statement::Exit],
                    elsif_branches: vec![],
                    else_branch: None,
                }),
                assign(
                    "sum",
                    Expression::Binary(BinaryExpr {
                        op: BinaryOp::Add,
                        left: Box::new(var_expr("sum")),
                        right: Box::new(var_expr("i")),
                    }),
                ),
            ],
        })],
    };
    let mut store = Store::new(100);
    initialize_variables(&program, &mut store);
    let mut state = RuntimeState::create(&program);

    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_int(&Id::from("sum")), Some(10));
    assert_eq!(store.get_int(&Id::from("i")), Some(5));
}

/// S6 — CONSTANT enforcement.
#[test]
fn constant_assignment_is_rejected() {
    let program = Program {
        name: Id::from("S6"),
        var_blocks: vec![
            VariableBlock {
                scope: VariableScope::Var,
                qualifier: Some(VariableQualifier::Constant),
                declarations: vec![VariableDeclaration {
                    name: Id::from("PI"),
                    type_name: "REAL".to_string(),
                    initial_value: Some(Expression::Literal(Value::Real(3.14159))),
                }],
            },
            var_block(vec![var("x", "REAL")]),
        ],
        body: vec![
            assign("PI", Expression::Literal(Value::Real(10.0))),
            assign("x", var_expr("PI")),
        ],
    };
    let mut store = Store::new(100);
    initialize_variables(&program, &mut store);
    let mut state = RuntimeState::create(&program);

    drive(&program, &mut store, &mut state, 1);
    assert_eq!(store.get_real(&Id::from("PI")), Some(3.14159));
    assert_eq!(store.get_real(&Id::from("x")), Some(3.14159));
}
