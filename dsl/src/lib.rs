//! AST and value types consumed by the Structured Text execution core.
//!
//! This crate defines the contract between an external parser (which turns
//! IEC 61131-3 Structured Text source into a [`ast::Program`]) and the
//! execution core in `scanvm-runtime`. It owns no parsing or evaluation
//! logic of its own.
pub mod ast;
pub mod core;
pub mod time_literal;
pub mod types;
pub mod value;

pub use ast::*;
pub use core::Id;
pub use types::DeclaredType;
pub use value::Value;
