//! The built-in function library (`spec.md` §4.2).
use scanvm_dsl::ast::FunctionCall;
use scanvm_dsl::value::Value;

use crate::coerce::{to_bool, to_number, to_string, trunc_to_i64};
use crate::eval::{evaluate, EvalContext};

/// Resolves and calls a built-in (or, failing that, user) function by
/// its upper-cased name.
pub fn call(call: &FunctionCall, ctx: &EvalContext) -> Value {
    let args: Vec<Value> = call.arguments.iter().map(|e| evaluate(e, ctx)).collect();
    let name = call.name.as_str().to_ascii_uppercase();

    if let Some(result) = call_numeric(&name, &args) {
        return result;
    }
    if let Some(result) = call_selection(&name, &args) {
        return result;
    }
    if let Some(result) = call_string(&name, &args) {
        return result;
    }
    if let Some(result) = call_conversion(&name, &args) {
        return result;
    }
    if let Some(hook) = ctx.user_function_hook {
        if let Some(v) = hook.call(&call.name, &args) {
            return v;
        }
    }
    log::warn!("unknown function {}, returning 0", call.name);
    Value::Int(0)
}

fn arg(args: &[Value], i: usize) -> f64 {
    args.get(i).map(to_number).unwrap_or(0.0)
}

fn call_numeric(name: &str, args: &[Value]) -> Option<Value> {
    let real = |f: f64| Some(Value::Real(f));
    match name {
        "ABS" => real(arg(args, 0).abs()),
        "SQRT" => real(arg(args, 0).sqrt()),
        "MIN" => real(arg(args, 0).min(arg(args, 1))),
        "MAX" => real(arg(args, 0).max(arg(args, 1))),
        "SIN" => real(arg(args, 0).sin()),
        "COS" => real(arg(args, 0).cos()),
        "TAN" => real(arg(args, 0).tan()),
        "ASIN" => real(arg(args, 0).asin()),
        "ACOS" => real(arg(args, 0).acos()),
        "ATAN" => real(arg(args, 0).atan()),
        "ATAN2" => real(arg(args, 0).atan2(arg(args, 1))),
        "LN" => real(arg(args, 0).ln()),
        "LOG" => real(arg(args, 0).log10()),
        "EXP" => real(arg(args, 0).exp()),
        "TRUNC" => Some(Value::Int(trunc_to_i64(arg(args, 0)))),
        _ => None,
    }
}

fn call_selection(name: &str, args: &[Value]) -> Option<Value> {
    match name {
        "SEL" => {
            let g = args.first().map(to_bool).unwrap_or(false);
            let in1 = args.get(2).cloned();
            let in0 = args.get(1).cloned();
            Some(if g {
                in1.unwrap_or(Value::Int(0))
            } else {
                in0.unwrap_or(Value::Int(0))
            })
        }
        "MUX" => {
            let k = args.first().map(|v| trunc_to_i64(to_number(v))).unwrap_or(0);
            let options = &args[1.min(args.len())..];
            Some(
                options
                    .get(k.max(0) as usize)
                    .cloned()
                    .or_else(|| options.first().cloned())
                    .unwrap_or(Value::Int(0)),
            )
        }
        "LIMIT" => {
            let mn = arg(args, 0);
            let v = arg(args, 1);
            let mx = arg(args, 2);
            Some(Value::Real(v.max(mn).min(mx)))
        }
        _ => None,
    }
}

fn str_arg(args: &[Value], i: usize) -> String {
    args.get(i).map(to_string).unwrap_or_default()
}

fn int_arg(args: &[Value], i: usize) -> i64 {
    args.get(i).map(|v| trunc_to_i64(to_number(v))).unwrap_or(0)
}

fn call_string(name: &str, args: &[Value]) -> Option<Value> {
    match name {
        "CONCAT" => Some(Value::String(
            args.iter().map(to_string).collect::<Vec<_>>().join(""),
        )),
        "LEN" => Some(Value::Int(str_arg(args, 0).chars().count() as i64)),
        "LEFT" => {
            let s = str_arg(args, 0);
            let l = int_arg(args, 1).max(0) as usize;
            Some(Value::String(s.chars().take(l).collect()))
        }
        "RIGHT" => {
            let s = str_arg(args, 0);
            let chars: Vec<char> = s.chars().collect();
            let l = (int_arg(args, 1).max(0) as usize).min(chars.len());
            Some(Value::String(chars[chars.len() - l..].iter().collect()))
        }
        "MID" => {
            let s = str_arg(args, 0);
            let chars: Vec<char> = s.chars().collect();
            let l = int_arg(args, 1).max(0) as usize;
            // P is 1-based.
            let p = int_arg(args, 2).max(1) as usize - 1;
            if p >= chars.len() {
                return Some(Value::String(String::new()));
            }
            let end = (p + l).min(chars.len());
            Some(Value::String(chars[p..end].iter().collect()))
        }
        "FIND" => {
            let haystack = str_arg(args, 0);
            let needle = str_arg(args, 1);
            if needle.is_empty() {
                return Some(Value::Int(0));
            }
            Some(Value::Int(match haystack.find(&needle) {
                Some(byte_pos) => haystack[..byte_pos].chars().count() as i64 + 1,
                None => 0,
            }))
        }
        "INSERT" => {
            let s = str_arg(args, 0);
            let insert = str_arg(args, 1);
            let mut chars: Vec<char> = s.chars().collect();
            let p = (int_arg(args, 2).max(0) as usize).min(chars.len());
            chars.splice(p..p, insert.chars());
            Some(Value::String(chars.into_iter().collect()))
        }
        "DELETE" => {
            let s = str_arg(args, 0);
            let mut chars: Vec<char> = s.chars().collect();
            let l = (int_arg(args, 1).max(0) as usize).min(chars.len());
            let p = (int_arg(args, 2).max(1) as usize - 1).min(chars.len());
            let end = (p + l).min(chars.len());
            chars.drain(p..end);
            Some(Value::String(chars.into_iter().collect()))
        }
        "REPLACE" => {
            let s = str_arg(args, 0);
            let replacement = str_arg(args, 1);
            let mut chars: Vec<char> = s.chars().collect();
            let l = (int_arg(args, 2).max(0) as usize).min(chars.len());
            let p = (int_arg(args, 3).max(1) as usize - 1).min(chars.len());
            let end = (p + l).min(chars.len());
            chars.splice(p..end, replacement.chars());
            Some(Value::String(chars.into_iter().collect()))
        }
        _ => None,
    }
}

/// The scalar groups used both by `DeclaredType::from_keyword` and by
/// `<SRC>_TO_<DST>` conversion dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeCategory {
    Bool,
    Int,
    Real,
    Time,
    String,
}

fn category_of(token: &str) -> Option<TypeCategory> {
    match token {
        "BOOL" => Some(TypeCategory::Bool),
        "SINT" | "INT" | "DINT" | "LINT" | "USINT" | "UINT" | "UDINT" | "ULINT" | "BYTE"
        | "WORD" | "DWORD" | "LWORD" => Some(TypeCategory::Int),
        "REAL" | "LREAL" => Some(TypeCategory::Real),
        "TIME" => Some(TypeCategory::Time),
        "STRING" | "WSTRING" => Some(TypeCategory::String),
        _ => None,
    }
}

/// Dispatches `<SRC>_TO_<DST>` conversions generically over the type
/// categories rather than enumerating every one of the ~270 pairs by
/// hand: conversion semantics depend only on the destination category
/// (§4.2).
fn call_conversion(name: &str, args: &[Value]) -> Option<Value> {
    let (src_token, dst_token) = name.split_once("_TO_")?;
    category_of(src_token)?;
    let dst = category_of(dst_token)?;
    let value = args.first()?;
    Some(match dst {
        TypeCategory::Bool => Value::Bool(to_bool(value)),
        TypeCategory::Int => Value::Int(trunc_to_i64(to_number(value))),
        TypeCategory::Real => Value::Real(to_number(value)),
        TypeCategory::Time => Value::Time(trunc_to_i64(to_number(value))),
        TypeCategory::String => Value::String(to_string(value)),
    })
}
