//! The expression evaluator (`spec.md` §4.2).
//!
//! `evaluate` is a pure function from `(Expression, EvalContext)` to a
//! tagged [`Value`]: it never mutates the store. Function-block calls and
//! assignments — the only operations that mutate state — live in
//! `exec`/`fb`, not here.
use scanvm_dsl::ast::{BinaryExpr, BinaryOp, Expression, FunctionCall, UnaryExpr, UnaryOp, VariableRef};
use scanvm_dsl::core::Id;
use scanvm_dsl::value::Value;

use crate::coerce::{to_bool, to_number, to_string};
use crate::context::{UserFbOutputHook, UserFunctionHook};
use crate::registry::TypeRegistry;
use crate::store::Store;

/// Everything `evaluate` needs to resolve a variable or dispatch a
/// function call. Deliberately lighter than [`crate::context::ExecutionContext`]:
/// evaluation never needs the constant registry or the previous-input
/// map, only the store, declared types, and optional user hooks.
pub struct EvalContext<'a> {
    pub store: &'a Store,
    pub types: &'a TypeRegistry,
    pub user_function_hook: Option<&'a dyn UserFunctionHook>,
    pub user_fb_output_hook: Option<&'a dyn UserFbOutputHook>,
}

/// Evaluates `expr` to a value. Total: every AST shape is handled.
pub fn evaluate(expr: &Expression, ctx: &EvalContext) -> Value {
    match expr {
        Expression::Literal(v) => v.clone(),
        Expression::Variable(var_ref) => evaluate_variable(var_ref, ctx),
        Expression::Paren(inner) => evaluate(inner, ctx),
        Expression::Unary(u) => evaluate_unary(u, ctx),
        Expression::Binary(b) => evaluate_binary(b, ctx),
        Expression::FunctionCall(call) => crate::builtins::call(call, ctx),
    }
}

fn evaluate_variable(var_ref: &VariableRef, ctx: &EvalContext) -> Value {
    match var_ref.access_path.as_slice() {
        [name] if var_ref.array_indices.is_empty() => ctx.store.get_variable(name, ctx.types.get(name)),
        [name] => evaluate_array_access(name, var_ref, ctx),
        [base, field] => evaluate_member(base, field, ctx),
        _ => Value::Bool(false),
    }
}

fn evaluate_array_access(name: &Id, var_ref: &VariableRef, ctx: &EvalContext) -> Value {
    let index = var_ref
        .array_indices
        .first()
        .map(|e| to_number(&evaluate(e, ctx)) as i64)
        .unwrap_or(0);
    ctx.store
        .arrays
        .get(name)
        .and_then(|elems| {
            if index >= 0 {
                elems.get(index as usize)
            } else {
                None
            }
        })
        .cloned()
        .unwrap_or(Value::Bool(false))
}

fn evaluate_member(base: &Id, field: &Id, ctx: &EvalContext) -> Value {
    if let Some(hook) = ctx.user_fb_output_hook {
        if let Some(v) = hook.output(base, field) {
            return v;
        }
    }

    let field_upper = field.as_str().to_ascii_uppercase();

    if let Some(timer) = ctx.store.get_timer(base) {
        return match field_upper.as_str() {
            "Q" => Value::Bool(timer.q),
            "ET" => Value::Time(timer.et),
            "IN" => Value::Bool(timer.input),
            "PT" => Value::Time(timer.pt),
            _ => Value::Bool(false),
        };
    }
    if let Some(counter) = ctx.store.get_counter(base) {
        return match field_upper.as_str() {
            "CV" => Value::Int(counter.cv),
            "QU" => Value::Bool(counter.qu),
            "QD" => Value::Bool(counter.qd),
            "PV" => Value::Int(counter.pv),
            "CU" => Value::Bool(counter.cu),
            "CD" => Value::Bool(counter.cd),
            "R" => Value::Bool(counter.r),
            "LD" => Value::Bool(counter.ld),
            _ => Value::Bool(false),
        };
    }
    if let Some(edge) = ctx.store.get_edge_detector(base) {
        return match field_upper.as_str() {
            "Q" => Value::Bool(edge.q),
            "CLK" => Value::Bool(edge.clk),
            "M" => Value::Bool(edge.m),
            _ => Value::Bool(false),
        };
    }
    if let Some(bistable) = ctx.store.get_bistable(base) {
        return match field_upper.as_str() {
            "Q1" => Value::Bool(bistable.q1),
            _ => Value::Bool(false),
        };
    }
    Value::Bool(false)
}

fn evaluate_unary(u: &UnaryExpr, ctx: &EvalContext) -> Value {
    let operand = evaluate(&u.operand, ctx);
    match u.op {
        UnaryOp::Neg => Value::Real(-to_number(&operand)).normalize_like(&operand),
        UnaryOp::Not => Value::Bool(!to_bool(&operand)),
    }
}

fn evaluate_binary(b: &BinaryExpr, ctx: &EvalContext) -> Value {
    // Both operands are always evaluated: no short-circuiting for
    // AND/OR/XOR (§4.2, a documented decision preserved from the source).
    let left = evaluate(&b.left, ctx);
    let right = evaluate(&b.right, ctx);

    match b.op {
        BinaryOp::And => Value::Bool(to_bool(&left) && to_bool(&right)),
        BinaryOp::Or => Value::Bool(to_bool(&left) || to_bool(&right)),
        BinaryOp::Xor => Value::Bool(to_bool(&left) != to_bool(&right)),
        BinaryOp::Eq => Value::Bool(compare(&left, &right) == std::cmp::Ordering::Equal),
        BinaryOp::Ne => Value::Bool(compare(&left, &right) != std::cmp::Ordering::Equal),
        BinaryOp::Lt => Value::Bool(compare(&left, &right) == std::cmp::Ordering::Less),
        BinaryOp::Gt => Value::Bool(compare(&left, &right) == std::cmp::Ordering::Greater),
        BinaryOp::Le => Value::Bool(compare(&left, &right) != std::cmp::Ordering::Greater),
        BinaryOp::Ge => Value::Bool(compare(&left, &right) != std::cmp::Ordering::Less),
        BinaryOp::Add => numeric_result(&left, &right, to_number(&left) + to_number(&right)),
        BinaryOp::Sub => numeric_result(&left, &right, to_number(&left) - to_number(&right)),
        BinaryOp::Mul => numeric_result(&left, &right, to_number(&left) * to_number(&right)),
        BinaryOp::Div => {
            // No fault on divide by zero: yields +/- infinity (§4.2).
            numeric_result(&left, &right, to_number(&left) / to_number(&right))
        }
        BinaryOp::Mod => {
            let (l, r) = (to_number(&left), to_number(&right));
            // Truncated remainder, matching IEC MOD semantics.
            numeric_result(&left, &right, l - r * (l / r).trunc())
        }
        BinaryOp::Pow => numeric_result(&left, &right, to_number(&left).powf(to_number(&right))),
    }
}

/// String comparison is lexicographic when both operands are strings,
/// numeric otherwise (§4.2).
fn compare(left: &Value, right: &Value) -> std::cmp::Ordering {
    if let (Value::String(l), Value::String(r)) = (left, right) {
        return l.cmp(r);
    }
    to_number(left)
        .partial_cmp(&to_number(right))
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// Produces an INT result when both operands are integral (INT or BOOL),
/// a REAL result otherwise, matching IEC's implicit numeric widening.
fn numeric_result(left: &Value, right: &Value, result: f64) -> Value {
    if is_integral(left) && is_integral(right) && result.fract() == 0.0 {
        Value::Int(result as i64)
    } else {
        Value::Real(result)
    }
}

fn is_integral(v: &Value) -> bool {
    matches!(v, Value::Int(_) | Value::Bool(_) | Value::Time(_))
}

/// Helper so unary `-` preserves INT-ness instead of always widening to
/// REAL (`-5` should stay an INT, not become `-5.0`).
trait NormalizeLike {
    fn normalize_like(self, sample: &Value) -> Value;
}

impl NormalizeLike for Value {
    fn normalize_like(self, sample: &Value) -> Value {
        if let Value::Real(r) = self {
            if is_integral(sample) && r.fract() == 0.0 {
                return Value::Int(r as i64);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    fn ctx<'a>(store: &'a Store, types: &'a TypeRegistry) -> EvalContext<'a> {
        EvalContext {
            store,
            types,
            user_function_hook: None,
            user_fb_output_hook: None,
        }
    }

    fn lit_int(v: i64) -> Expression {
        Expression::Literal(Value::Int(v))
    }

    fn bin(op: BinaryOp, l: Expression, r: Expression) -> Expression {
        Expression::Binary(BinaryExpr {
            op,
            left: Box::new(l),
            right: Box::new(r),
        })
    }

    #[test]
    fn evaluate_when_precedence_mul_over_add_then_fourteen() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        // 2 + 3 * 4
        let expr = bin(
            BinaryOp::Add,
            lit_int(2),
            bin(BinaryOp::Mul, lit_int(3), lit_int(4)),
        );
        assert_eq!(evaluate(&expr, &ctx(&store, &types)), Value::Int(14));
    }

    #[test]
    fn evaluate_when_div_by_zero_then_infinity() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        let expr = bin(
            BinaryOp::Div,
            Expression::Literal(Value::Real(1.0)),
            lit_int(0),
        );
        assert_eq!(evaluate(&expr, &ctx(&store, &types)), Value::Real(f64::INFINITY));
    }

    #[test]
    fn evaluate_when_de_morgan_not_and_then_equals_or_of_nots() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        let c = ctx(&store, &types);
        for x in [true, false] {
            for y in [true, false] {
                let left = !(x && y);
                let right = (!x) || (!y);
                assert_eq!(left, right);
            }
        }
        let _ = c;
    }

    #[test]
    fn evaluate_when_string_comparison_then_lexicographic() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        let expr = bin(
            BinaryOp::Lt,
            Expression::Literal(Value::String("apple".into())),
            Expression::Literal(Value::String("banana".into())),
        );
        assert_eq!(evaluate(&expr, &ctx(&store, &types)), Value::Bool(true));
    }

    #[test]
    fn evaluate_when_unary_neg_on_int_then_stays_int() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        let expr = Expression::Unary(UnaryExpr {
            op: UnaryOp::Neg,
            operand: Box::new(lit_int(5)),
        });
        assert_eq!(evaluate(&expr, &ctx(&store, &types)), Value::Int(-5));
    }

    #[test]
    fn evaluate_when_member_access_missing_timer_field_then_false() {
        let store = Store::new(100);
        let types = TypeRegistry::new();
        let var = VariableRef {
            access_path: vec![Id::from("nope"), Id::from("Q")],
            array_indices: vec![],
        };
        assert_eq!(
            evaluate(&Expression::Variable(var), &ctx(&store, &types)),
            Value::Bool(false)
        );
    }
}
