//! The parsed-program contract consumed by the execution core.
//!
//! These types describe the shape an external parser hands to
//! `scanvm-runtime`: a [`Program`] made of variable declaration blocks and
//! a statement body. The lexer/CST-to-AST transformation that produces
//! this tree is outside this crate's scope.
use serde::{Deserialize, Serialize};

use crate::core::Id;
use crate::value::Value;

/// A complete unit of execution: the top-level variable blocks plus the
/// statement body that runs once per scan.
///
/// `PROGRAM` and `FUNCTION_BLOCK` source wrappers both reduce to this
/// shape; the wrapper kind itself carries no runtime behavior the core
/// needs to distinguish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub name: Id,
    pub var_blocks: Vec<VariableBlock>,
    pub body: Vec<Statement>,
}

/// One `VAR ... END_VAR`-style block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableBlock {
    pub scope: VariableScope,
    pub qualifier: Option<VariableQualifier>,
    pub declarations: Vec<VariableDeclaration>,
}

/// The declaration scope a `VariableBlock` was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableScope {
    Var,
    VarInput,
    VarOutput,
    VarInOut,
    VarTemp,
    VarGlobal,
}

/// A storage qualifier applied to every declaration in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableQualifier {
    Constant,
    Retain,
}

/// A single `name : type [:= initial];` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: Id,
    pub type_name: String,
    pub initial_value: Option<Expression>,
}

/// Statement variants per IEC 61131-3 §3.3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    Assignment(Assignment),
    FunctionBlockCall(FunctionBlockCall),
    If(IfStatement),
    Case(CaseStatement),
    For(ForStatement),
    While(WhileStatement),
    Repeat(RepeatStatement),
    Return,
    Exit,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub target: VariableRef,
    pub value: Expression,
}

/// A named-argument invocation of a stateful function-block instance,
/// e.g. `t(IN := Start, PT := T#500ms)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionBlockCall {
    pub instance: Id,
    pub arguments: Vec<NamedArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedArgument {
    pub name: Id,
    pub value: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub elsif_branches: Vec<(Expression, Vec<Statement>)>,
    pub else_branch: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStatement {
    pub selector: Expression,
    pub clauses: Vec<CaseClause>,
    pub else_branch: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseClause {
    pub labels: Vec<CaseLabel>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaseLabel {
    Single(i64),
    Range(i64, i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForStatement {
    pub control: Id,
    pub start: Expression,
    pub end: Expression,
    pub step: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatStatement {
    pub body: Vec<Statement>,
    pub until: Expression,
}

/// A reference to a variable, member field, or array element on the
/// left-hand side of an assignment. Mirrors [`Expression::Variable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRef {
    pub access_path: Vec<Id>,
    pub array_indices: Vec<Expression>,
}

impl VariableRef {
    pub fn simple(name: &str) -> VariableRef {
        VariableRef {
            access_path: vec![Id::from(name)],
            array_indices: vec![],
        }
    }
}

/// Expression variants per IEC 61131-3 §3.2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    Literal(Value),
    Variable(VariableRef),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Paren(Box<Expression>),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: Id,
    pub arguments: Vec<Expression>,
}

/// Binary operators, ordered here by ascending precedence (see
/// `scanvm_runtime::eval` for the precedence climb that builds these
/// trees — the AST itself carries no precedence, only nesting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}
