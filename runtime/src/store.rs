//! The simulation store: typed mutable state for scalars and
//! function-block instances (`spec.md` §3.2).
use std::collections::HashMap;

use scanvm_dsl::core::Id;
use scanvm_dsl::types::DeclaredType;
use scanvm_dsl::value::Value;

/// Which timer personality a [`TimerState`] record implements.
///
/// All three kinds share one state record (§4.4): only the transition
/// rules in `fb::update_timer` differ by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Ton,
    Tof,
    Tp,
}

#[derive(Debug, Clone)]
pub struct TimerState {
    pub kind: TimerKind,
    pub input: bool,
    pub pt: i64,
    pub q: bool,
    pub et: i64,
    pub running: bool,
    /// `input` as of the previous update, used to detect the rising or
    /// falling edge that starts a timing phase.
    pub prev_input: bool,
}

impl TimerState {
    fn new(kind: TimerKind, pt: i64) -> TimerState {
        TimerState {
            kind,
            input: false,
            pt,
            q: false,
            et: 0,
            running: false,
            prev_input: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CounterState {
    pub cu: bool,
    pub cd: bool,
    pub r: bool,
    pub ld: bool,
    pub pv: i64,
    pub qu: bool,
    pub qd: bool,
    pub cv: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeDetectorState {
    pub clk: bool,
    pub q: bool,
    /// Memorized sample from the previous scan.
    pub m: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BistableState {
    pub q1: bool,
}

/// Typed mutable state for a running program.
///
/// Each scalar mapping is disjoint from the others: a name lives in at
/// most one of `booleans`/`integers`/`reals`/`times`/`strings` and at
/// most one function-block instance mapping (§3.2 invariant a).
#[derive(Debug, Default)]
pub struct Store {
    pub booleans: HashMap<Id, bool>,
    pub integers: HashMap<Id, i64>,
    pub reals: HashMap<Id, f64>,
    pub times: HashMap<Id, i64>,
    pub strings: HashMap<Id, String>,

    pub timers: HashMap<Id, TimerState>,
    pub counters: HashMap<Id, CounterState>,
    pub edge_detectors: HashMap<Id, EdgeDetectorState>,
    pub bistables: HashMap<Id, BistableState>,
    pub arrays: HashMap<Id, Vec<Value>>,

    /// Nominal elapsed-time delta applied to timers each scan, in ms.
    pub scan_time: i64,
}

impl Store {
    pub fn new(scan_time: i64) -> Store {
        Store {
            scan_time,
            ..Default::default()
        }
    }

    // -- scalars ---------------------------------------------------------

    pub fn set_bool(&mut self, name: &Id, value: bool) {
        self.booleans.insert(name.clone(), value);
    }
    pub fn get_bool(&self, name: &Id) -> Option<bool> {
        self.booleans.get(name).copied()
    }
    pub fn set_int(&mut self, name: &Id, value: i64) {
        self.integers.insert(name.clone(), value);
    }
    pub fn get_int(&self, name: &Id) -> Option<i64> {
        self.integers.get(name).copied()
    }
    pub fn set_real(&mut self, name: &Id, value: f64) {
        self.reals.insert(name.clone(), value);
    }
    pub fn get_real(&self, name: &Id) -> Option<f64> {
        self.reals.get(name).copied()
    }
    pub fn set_time(&mut self, name: &Id, value: i64) {
        self.times.insert(name.clone(), value);
    }
    pub fn get_time(&self, name: &Id) -> Option<i64> {
        self.times.get(name).copied()
    }
    pub fn set_string(&mut self, name: &Id, value: String) {
        self.strings.insert(name.clone(), value);
    }
    pub fn get_string(&self, name: &Id) -> Option<&String> {
        self.strings.get(name)
    }

    /// Looks up `name` by presence (not truthiness) across every scalar
    /// bucket in priority order, then falls back to the type-appropriate
    /// zero for its declared type, per §3.2 invariant (d) and §8 item 6.
    pub fn get_variable(&self, name: &Id, declared: Option<DeclaredType>) -> Value {
        if let Some(v) = self.booleans.get(name) {
            return Value::Bool(*v);
        }
        if let Some(v) = self.integers.get(name) {
            return Value::Int(*v);
        }
        if let Some(v) = self.reals.get(name) {
            return Value::Real(*v);
        }
        if let Some(v) = self.times.get(name) {
            return Value::Time(*v);
        }
        if let Some(v) = self.strings.get(name) {
            return Value::String(v.clone());
        }
        match declared {
            Some(DeclaredType::Int) => Value::Int(0),
            Some(DeclaredType::Real) => Value::Real(0.0),
            Some(DeclaredType::Time) => Value::Time(0),
            Some(DeclaredType::String) => Value::String(String::new()),
            _ => Value::Bool(false),
        }
    }

    // -- arrays --------------------------------------------------------------

    pub fn set_array_element(&mut self, name: &Id, index: i64, value: Value) {
        if index < 0 {
            return;
        }
        let elems = self.arrays.entry(name.clone()).or_default();
        let index = index as usize;
        if index >= elems.len() {
            elems.resize(index + 1, Value::Bool(false));
        }
        elems[index] = value;
    }

    // -- timers ------------------------------------------------------------

    pub fn init_timer(&mut self, name: &Id, pt: i64, kind: TimerKind) {
        self.timers
            .entry(name.clone())
            .or_insert_with(|| TimerState::new(kind, pt));
    }
    pub fn set_timer_input(&mut self, name: &Id, input: bool) {
        if let Some(t) = self.timers.get_mut(name) {
            t.input = input;
        }
    }
    pub fn set_timer_pt(&mut self, name: &Id, pt: i64) {
        if let Some(t) = self.timers.get_mut(name) {
            t.pt = pt;
        }
    }
    pub fn get_timer(&self, name: &Id) -> Option<&TimerState> {
        self.timers.get(name)
    }
    pub fn get_timer_mut(&mut self, name: &Id) -> Option<&mut TimerState> {
        self.timers.get_mut(name)
    }

    // -- counters ------------------------------------------------------------

    pub fn init_counter(&mut self, name: &Id, pv: i64) {
        self.counters.entry(name.clone()).or_insert_with(|| {
            let mut c = CounterState::default();
            c.pv = pv;
            c
        });
    }
    pub fn set_counter_pv(&mut self, name: &Id, pv: i64) {
        if let Some(c) = self.counters.get_mut(name) {
            c.pv = pv;
        }
    }
    pub fn get_counter(&self, name: &Id) -> Option<&CounterState> {
        self.counters.get(name)
    }
    pub fn get_counter_mut(&mut self, name: &Id) -> Option<&mut CounterState> {
        self.counters.get_mut(name)
    }

    // -- edge detectors ------------------------------------------------------

    pub fn init_edge_detector(&mut self, name: &Id) {
        self.edge_detectors
            .entry(name.clone())
            .or_insert_with(EdgeDetectorState::default);
    }
    pub fn get_edge_detector(&self, name: &Id) -> Option<&EdgeDetectorState> {
        self.edge_detectors.get(name)
    }
    pub fn get_edge_detector_mut(&mut self, name: &Id) -> Option<&mut EdgeDetectorState> {
        self.edge_detectors.get_mut(name)
    }

    // -- bistables -------------------------------------------------------

    pub fn init_bistable(&mut self, name: &Id) {
        self.bistables
            .entry(name.clone())
            .or_insert_with(BistableState::default);
    }
    pub fn get_bistable(&self, name: &Id) -> Option<&BistableState> {
        self.bistables.get(name)
    }
    pub fn get_bistable_mut(&mut self, name: &Id) -> Option<&mut BistableState> {
        self.bistables.get_mut(name)
    }
}
