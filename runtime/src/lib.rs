//! Execution core for the IEC 61131-3 Structured Text scan-cycle
//! interpreter: a store, an expression evaluator, a statement executor,
//! a function-block handler, and the scan-cycle runner that ties them
//! together.
//!
//! The AST consumed here (`scanvm_dsl::ast`) is produced by an external
//! parser; this crate depends only on that node-shape contract.
pub mod builtins;
pub mod coerce;
pub mod context;
pub mod error;
pub mod eval;
pub mod exec;
pub mod fb;
pub mod init;
pub mod registry;
pub mod runner;
pub mod store;

pub use context::{ExecutionContext, RuntimeState, UserFbOutputHook, UserFunctionHook};
pub use error::{ControlSignal, ExecResult, RuntimeError, Signal};
pub use init::{build_constant_registry, build_fb_kind_registry, build_type_registry, initialize_variables};
pub use runner::run_scan_cycle;
pub use store::Store;
