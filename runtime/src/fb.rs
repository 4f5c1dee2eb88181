//! The function-block handler (`spec.md` §4.4).
//!
//! A function-block call is a named-argument invocation against a
//! stateful instance. Dispatch prefers the declared FB kind recorded at
//! initialization time; it falls back to the argument-signature
//! heuristic only for instances with no declared kind, since signature
//! dispatch is fragile for FB types with overlapping pin names.
use std::collections::HashMap;

use scanvm_dsl::ast::FunctionBlockCall;
use scanvm_dsl::core::Id;
use scanvm_dsl::value::Value;

use crate::coerce::{to_bool, to_number, trunc_to_i64};
use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::registry::FbKind;
use crate::store::TimerKind;

enum Dispatch {
    Timer(TimerKind),
    Counter,
    Edge(EdgeKind),
    Bistable(BistableKind),
}

enum EdgeKind {
    RTrig,
    FTrig,
}

enum BistableKind {
    Sr,
    Rs,
}

pub fn call(fb_call: &FunctionBlockCall, ctx: &mut ExecutionContext) -> Result<(), RuntimeError> {
    let mut args: HashMap<String, Value> = HashMap::new();
    {
        let view = ctx.eval_view();
        for named in &fb_call.arguments {
            args.insert(
                named.name.as_str().to_ascii_uppercase(),
                crate::eval::evaluate(&named.value, &view),
            );
        }
    }

    match resolve_dispatch(&fb_call.instance, &args, ctx) {
        Some(Dispatch::Timer(default_kind)) => {
            handle_timer(&fb_call.instance, &args, default_kind, ctx);
            Ok(())
        }
        Some(Dispatch::Counter) => {
            handle_counter(&fb_call.instance, &args, ctx);
            Ok(())
        }
        Some(Dispatch::Edge(kind)) => {
            handle_edge(&fb_call.instance, &args, kind, ctx);
            Ok(())
        }
        Some(Dispatch::Bistable(kind)) => {
            handle_bistable(&fb_call.instance, &args, kind, ctx);
            Ok(())
        }
        None => {
            log::warn!(
                "{} does not match a known function-block signature",
                fb_call.instance
            );
            Ok(())
        }
    }
}

fn resolve_dispatch(
    instance: &Id,
    args: &HashMap<String, Value>,
    ctx: &ExecutionContext,
) -> Option<Dispatch> {
    if let Some(kind) = ctx.runtime_state.fb_kinds.get(instance) {
        return Some(match kind {
            FbKind::Ton => Dispatch::Timer(TimerKind::Ton),
            FbKind::Tof => Dispatch::Timer(TimerKind::Tof),
            FbKind::Tp => Dispatch::Timer(TimerKind::Tp),
            FbKind::Ctu | FbKind::Ctd | FbKind::Ctud => Dispatch::Counter,
            FbKind::RTrig => Dispatch::Edge(EdgeKind::RTrig),
            FbKind::FTrig => Dispatch::Edge(EdgeKind::FTrig),
            FbKind::Sr => Dispatch::Bistable(BistableKind::Sr),
            FbKind::Rs => Dispatch::Bistable(BistableKind::Rs),
        });
    }

    if args.contains_key("CLK") {
        let name_upper = instance.as_str().to_ascii_uppercase();
        return Some(Dispatch::Edge(
            if name_upper.contains("FTRIG") || name_upper.starts_with("F_") {
                EdgeKind::FTrig
            } else {
                EdgeKind::RTrig
            },
        ));
    }
    if args.contains_key("S1") && args.contains_key("R") {
        return Some(Dispatch::Bistable(BistableKind::Sr));
    }
    if args.contains_key("S") && args.contains_key("R1") {
        return Some(Dispatch::Bistable(BistableKind::Rs));
    }
    if args.contains_key("CU") || args.contains_key("CD") || args.contains_key("PV") {
        return Some(Dispatch::Counter);
    }
    if args.contains_key("IN") || args.contains_key("PT") {
        return Some(Dispatch::Timer(TimerKind::Ton));
    }
    None
}

/// Sets the instance's inputs and runs its timing update in the same
/// call: a timer's outputs only change when it is invoked, so the call
/// site is where edge detection and ET accumulation happen, not a
/// separate scan-wide pre-pass (§4.4, §4.5).
fn handle_timer(
    instance: &Id,
    args: &HashMap<String, Value>,
    default_kind: TimerKind,
    ctx: &mut ExecutionContext,
) {
    let pt = args.get("PT").map(|v| trunc_to_i64(to_number(v)));
    if ctx.store.get_timer(instance).is_none() {
        ctx.store.init_timer(instance, pt.unwrap_or(0), default_kind);
    }
    if let Some(pt) = pt {
        ctx.store.set_timer_pt(instance, pt);
    }
    if let Some(input) = args.get("IN") {
        ctx.store.set_timer_input(instance, to_bool(input));
    }

    let scan_time = ctx.store.scan_time;
    if let Some(timer) = ctx.store.get_timer_mut(instance) {
        update_timer(timer, scan_time);
    }
}

fn update_timer(timer: &mut crate::store::TimerState, scan_time: i64) {
    let rising = timer.input && !timer.prev_input;
    let falling = !timer.input && timer.prev_input;

    match timer.kind {
        TimerKind::Ton => {
            if rising {
                if timer.pt <= 0 {
                    timer.q = true;
                    timer.running = false;
                    timer.et = 0;
                } else {
                    timer.running = true;
                    timer.et = 0;
                }
            }
            if timer.input {
                if timer.running {
                    timer.et += scan_time;
                    if timer.et >= timer.pt {
                        timer.et = timer.pt.max(0);
                        timer.q = true;
                        timer.running = false;
                    }
                }
            } else {
                timer.q = false;
                timer.running = false;
                timer.et = 0;
            }
        }
        TimerKind::Tof => {
            if falling {
                if timer.pt <= 0 {
                    timer.q = false;
                    timer.running = false;
                    timer.et = 0;
                } else {
                    timer.running = true;
                    timer.et = 0;
                }
            }
            if timer.input {
                timer.q = true;
                timer.running = false;
                timer.et = 0;
            } else if timer.running {
                timer.et += scan_time;
                if timer.et >= timer.pt {
                    timer.et = timer.pt.max(0);
                    timer.q = false;
                    timer.running = false;
                }
            }
        }
        TimerKind::Tp => {
            // Q is high for the whole pulse, so `running` stays false
            // throughout it; whether the pulse is still counting is
            // read off `et < pt`, not a separate flag (§8.2: `Q ∧
            // running` never holds).
            if rising && !timer.q {
                timer.et = 0;
                timer.q = true;
            }
            if timer.q && timer.et < timer.pt {
                timer.et += scan_time;
                if timer.et >= timer.pt {
                    timer.et = timer.pt;
                    timer.q = false;
                }
            }
            timer.running = false;
        }
    }
    timer.prev_input = timer.input;
}

/// Rising edges on `CU`/`CD` are detected against the runtime state's
/// previous-input map (keyed `"<instance>.CU"`/`"<instance>.CD"`)
/// rather than a field on `CounterState`, per the declared interface
/// (§4.4).
fn handle_counter(instance: &Id, args: &HashMap<String, Value>, ctx: &mut ExecutionContext) {
    let cu = args.get("CU").map(to_bool).unwrap_or(false);
    let cd = args.get("CD").map(to_bool).unwrap_or(false);
    let r = args.get("R").map(to_bool).unwrap_or(false);
    let ld = args.get("LD").map(to_bool).unwrap_or(false);
    let pv = args.get("PV").map(|v| trunc_to_i64(to_number(v)));

    if ctx.store.get_counter(instance).is_none() {
        ctx.store.init_counter(instance, pv.unwrap_or(0));
    }
    if let Some(pv) = pv {
        ctx.store.set_counter_pv(instance, pv);
    }

    let cu_rising = cu && !ctx.runtime_state.previous_input(instance, "CU");
    let cd_rising = cd && !ctx.runtime_state.previous_input(instance, "CD");
    ctx.runtime_state.set_previous_input(instance, "CU", cu);
    ctx.runtime_state.set_previous_input(instance, "CD", cd);

    if let Some(counter) = ctx.store.get_counter_mut(instance) {
        counter.cu = cu;
        counter.cd = cd;
        counter.r = r;
        counter.ld = ld;
        if r {
            counter.cv = 0;
        } else if ld {
            counter.cv = counter.pv;
        } else {
            if cu_rising {
                counter.cv += 1;
            }
            if cd_rising {
                counter.cv = (counter.cv - 1).max(0);
            }
        }
        counter.qu = counter.cv >= counter.pv;
        counter.qd = counter.cv <= 0;
    }
}

fn handle_edge(instance: &Id, args: &HashMap<String, Value>, kind: EdgeKind, ctx: &mut ExecutionContext) {
    let clk = args.get("CLK").map(to_bool).unwrap_or(false);
    if ctx.store.get_edge_detector(instance).is_none() {
        ctx.store.init_edge_detector(instance);
    }
    if let Some(edge) = ctx.store.get_edge_detector_mut(instance) {
        edge.clk = clk;
        edge.q = match kind {
            EdgeKind::RTrig => clk && !edge.m,
            EdgeKind::FTrig => !clk && edge.m,
        };
        edge.m = clk;
    }
}

fn handle_bistable(
    instance: &Id,
    args: &HashMap<String, Value>,
    kind: BistableKind,
    ctx: &mut ExecutionContext,
) {
    if ctx.store.get_bistable(instance).is_none() {
        ctx.store.init_bistable(instance);
    }
    if let Some(bistable) = ctx.store.get_bistable_mut(instance) {
        match kind {
            BistableKind::Sr => {
                let s1 = args.get("S1").map(to_bool).unwrap_or(false);
                let r = args.get("R").map(to_bool).unwrap_or(false);
                if s1 {
                    bistable.q1 = true;
                } else if r {
                    bistable.q1 = false;
                }
            }
            BistableKind::Rs => {
                let s = args.get("S").map(to_bool).unwrap_or(false);
                let r1 = args.get("R1").map(to_bool).unwrap_or(false);
                if r1 {
                    bistable.q1 = false;
                } else if s {
                    bistable.q1 = true;
                }
            }
        }
    }
}
