//! Control-flow signals and internal errors (`spec.md` §7).
use thiserror::Error;

/// The sanctioned unwind mechanism for EXIT/CONTINUE/RETURN (§4.3).
///
/// This is not an error — it is propagated with `?` through statement
/// execution so loop and scan-cycle boundaries can distinguish it from a
/// genuine fault without downcasting an exception type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Exit,
    Continue,
    Return,
}

/// Internal errors: bugs, not recoverable conditions. A scan that hits
/// one of these aborts and surfaces the error to the embedding host
/// (§7); it is never logged-and-continued the way a warning is.
#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("unknown AST node kind: {0}")]
    UnknownNode(&'static str),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("EXIT or CONTINUE escaped the outermost scan")]
    UnhandledSignal,
}

/// Result type for statement execution, where a `ControlSignal` is a
/// normal (non-error) short-circuit and a `RuntimeError` is a fault.
pub type ExecResult = Result<(), Signal>;

/// Combines the two outcomes a statement can produce besides falling
/// through normally: a control-flow signal or an internal error.
#[derive(Debug, PartialEq)]
pub enum Signal {
    Control(ControlSignal),
    Error(RuntimeError),
}

impl From<ControlSignal> for Signal {
    fn from(c: ControlSignal) -> Self {
        Signal::Control(c)
    }
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self {
        Signal::Error(e)
    }
}
