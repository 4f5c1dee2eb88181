//! The statement executor (`spec.md` §4.3).
use scanvm_dsl::ast::{
    Assignment, CaseLabel, CaseStatement, ForStatement, IfStatement, RepeatStatement, Statement,
    VariableRef, WhileStatement,
};
use scanvm_dsl::types::DeclaredType;
use scanvm_dsl::value::Value;

use crate::coerce::{to_bool, to_number, to_string, trunc_to_i64};
use crate::context::ExecutionContext;
use crate::error::{ControlSignal, ExecResult, Signal};
use crate::eval::evaluate;

/// Backstop against a runaway FOR/WHILE/REPEAT: a scan that would
/// otherwise never finish is cut off and logged rather than hanging
/// the caller forever (§4.3, §7).
pub const MAX_LOOP_ITERATIONS: u32 = 10_000;

/// Executes every statement in `stmts` in order, stopping at the first
/// one that yields a control signal or error.
pub fn execute_block(stmts: &[Statement], ctx: &mut ExecutionContext) -> ExecResult {
    for stmt in stmts {
        execute_statement(stmt, ctx)?;
    }
    Ok(())
}

pub fn execute_statement(stmt: &Statement, ctx: &mut ExecutionContext) -> ExecResult {
    match stmt {
        Statement::Assignment(a) => execute_assignment(a, ctx),
        Statement::FunctionBlockCall(call) => {
            crate::fb::call(call, ctx).map_err(Signal::Error)
        }
        Statement::If(s) => execute_if(s, ctx),
        Statement::Case(s) => execute_case(s, ctx),
        Statement::For(s) => execute_for(s, ctx),
        Statement::While(s) => execute_while(s, ctx),
        Statement::Repeat(s) => execute_repeat(s, ctx),
        Statement::Return => Err(Signal::Control(ControlSignal::Return)),
        Statement::Exit => Err(Signal::Control(ControlSignal::Exit)),
        Statement::Continue => Err(Signal::Control(ControlSignal::Continue)),
    }
}

fn execute_assignment(a: &Assignment, ctx: &mut ExecutionContext) -> ExecResult {
    let value = evaluate(&a.value, &ctx.eval_view());
    assign(&a.target, value, ctx);
    Ok(())
}

/// Stores `value` at `target`, honoring the declared type's storage
/// discipline (§3.2, §4.3): writes to a `CONSTANT` name are dropped
/// with a warning, array writes go through `Store::set_array_element`,
/// and function-block instance fields are read-only from an
/// assignment (they're only driven by named-argument calls).
fn assign(target: &VariableRef, value: Value, ctx: &mut ExecutionContext) {
    let name = match target.access_path.first() {
        Some(n) if target.access_path.len() == 1 => n,
        _ => {
            log::warn!("assignment target is not a simple variable, ignoring");
            return;
        }
    };

    if ctx.runtime_state.constants.contains(name) {
        log::warn!("ignoring assignment to constant {}", name);
        return;
    }

    if let Some(index_expr) = target.array_indices.first() {
        let index = trunc_to_i64(to_number(&evaluate(index_expr, &ctx.eval_view())));
        ctx.store.set_array_element(name, index, value);
        return;
    }

    let declared = ctx.runtime_state.types.get(name).unwrap_or(DeclaredType::Unknown);
    match declared {
        DeclaredType::Bool => ctx.store.set_bool(name, to_bool(&value)),
        DeclaredType::Int => ctx.store.set_int(name, trunc_to_i64(to_number(&value))),
        DeclaredType::Real => ctx.store.set_real(name, to_number(&value)),
        DeclaredType::Time => ctx.store.set_time(name, trunc_to_i64(to_number(&value))),
        DeclaredType::String => ctx.store.set_string(name, to_string(&value)),
        DeclaredType::Timer
        | DeclaredType::Counter
        | DeclaredType::EdgeDetector
        | DeclaredType::Bistable => {
            log::warn!("{} is a function-block instance, ignoring direct assignment", name);
        }
        DeclaredType::Array | DeclaredType::Unknown => match value {
            Value::Bool(b) => ctx.store.set_bool(name, b),
            Value::Int(i) => ctx.store.set_int(name, i),
            Value::Real(r) => ctx.store.set_real(name, r),
            Value::Time(t) => ctx.store.set_time(name, t),
            Value::String(s) => ctx.store.set_string(name, s),
        },
    }
}

fn execute_if(stmt: &IfStatement, ctx: &mut ExecutionContext) -> ExecResult {
    if to_bool(&evaluate(&stmt.condition, &ctx.eval_view())) {
        return execute_block(&stmt.then_branch, ctx);
    }
    for (condition, body) in &stmt.elsif_branches {
        if to_bool(&evaluate(condition, &ctx.eval_view())) {
            return execute_block(body, ctx);
        }
    }
    if let Some(else_branch) = &stmt.else_branch {
        return execute_block(else_branch, ctx);
    }
    Ok(())
}

/// Matches a selector against a label. A descending range (`hi < lo`)
/// is accepted as an alias for the ascending range and logged once per
/// occurrence rather than rejected outright (§4.3).
fn label_matches(label: &CaseLabel, selector: i64) -> bool {
    match *label {
        CaseLabel::Single(v) => v == selector,
        CaseLabel::Range(lo, hi) => {
            let (lo, hi) = if lo <= hi {
                (lo, hi)
            } else {
                log::warn!("CASE range {}..{} is descending, treating as {}..{}", lo, hi, hi, lo);
                (hi, lo)
            };
            selector >= lo && selector <= hi
        }
    }
}

fn execute_case(stmt: &CaseStatement, ctx: &mut ExecutionContext) -> ExecResult {
    let selector = trunc_to_i64(to_number(&evaluate(&stmt.selector, &ctx.eval_view())));
    for clause in &stmt.clauses {
        if clause.labels.iter().any(|l| label_matches(l, selector)) {
            return execute_block(&clause.body, ctx);
        }
    }
    if let Some(else_branch) = &stmt.else_branch {
        return execute_block(else_branch, ctx);
    }
    Ok(())
}

fn execute_for(stmt: &ForStatement, ctx: &mut ExecutionContext) -> ExecResult {
    let start = trunc_to_i64(to_number(&evaluate(&stmt.start, &ctx.eval_view())));
    let end = trunc_to_i64(to_number(&evaluate(&stmt.end, &ctx.eval_view())));
    let step = match &stmt.step {
        Some(e) => trunc_to_i64(to_number(&evaluate(e, &ctx.eval_view()))),
        None => 1,
    };
    if step == 0 {
        log::warn!("FOR step is 0 for {}, skipping loop", stmt.control);
        return Ok(());
    }

    let mut i = start;
    ctx.store.set_int(&stmt.control, i);
    let mut iterations: u32 = 0;
    while (step > 0 && i <= end) || (step < 0 && i >= end) {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            log::warn!("FOR loop on {} exceeded iteration cap, aborting", stmt.control);
            break;
        }
        match execute_block(&stmt.body, ctx) {
            Ok(()) => {}
            Err(Signal::Control(ControlSignal::Exit)) => break,
            Err(Signal::Control(ControlSignal::Continue)) => {}
            Err(other) => return Err(other),
        }
        i += step;
        ctx.store.set_int(&stmt.control, i);
    }
    Ok(())
}

fn execute_while(stmt: &WhileStatement, ctx: &mut ExecutionContext) -> ExecResult {
    let mut iterations: u32 = 0;
    while to_bool(&evaluate(&stmt.condition, &ctx.eval_view())) {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            log::warn!("WHILE loop exceeded iteration cap, aborting");
            break;
        }
        match execute_block(&stmt.body, ctx) {
            Ok(()) => {}
            Err(Signal::Control(ControlSignal::Exit)) => break,
            Err(Signal::Control(ControlSignal::Continue)) => continue,
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

fn execute_repeat(stmt: &RepeatStatement, ctx: &mut ExecutionContext) -> ExecResult {
    let mut iterations: u32 = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            log::warn!("REPEAT loop exceeded iteration cap, aborting");
            break;
        }
        match execute_block(&stmt.body, ctx) {
            Ok(()) => {}
            Err(Signal::Control(ControlSignal::Exit)) => break,
            Err(Signal::Control(ControlSignal::Continue)) => {}
            Err(other) => return Err(other),
        }
        if to_bool(&evaluate(&stmt.until, &ctx.eval_view())) {
            break;
        }
    }
    Ok(())
}
