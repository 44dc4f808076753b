//! Tree-walking interpreter for parsed modules.
//!
//! Execution uses a single mixed stack holding operand values, function
//! activation markers and block/loop label markers. See [`stack`] for the
//! layout and [`interpreter`] for the call protocol.

pub mod config;
pub mod control;
pub mod interpreter;
pub mod ops;
pub mod stack;
pub mod test_utils;

pub use config::Config;
pub use interpreter::Interpreter;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Arity mismatch: expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("Unknown function: {0}")]
    UnknownFunction(u32),
    #[error("Unknown export: {0}")]
    UnknownExport(String),
    #[error("Export is not a function: {0}")]
    ExportNotFunction(String),
    #[error("Unlinked import: {module}.{name}")]
    UnlinkedImport { module: String, name: String },
    #[error("Local variable index out of bounds: {0}")]
    LocalIndexOutOfBounds(u32),
    #[error("Unimplemented instruction: {0}")]
    UnimplementedInstruction(String),
    #[error("Missing operand for {0}")]
    MissingOperand(String),
    #[error("Invalid label: {0}")]
    InvalidLabel(u32),
    #[error("Call stack overflow: depth limit {0} reached")]
    CallStackOverflow(usize),
    #[error("Corrupt stack: {0}")]
    CorruptStack(&'static str),
}
