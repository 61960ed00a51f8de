//! Lowers a desugared, type-resolved, error-free AST to the SSA IR.

pub mod diagnostic;
pub mod error;
pub mod lower;
pub mod pipeline;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, SourceLocation};
pub use error::LowerError;
pub use lower::{lower, LowerVisitor};
pub use pipeline::compile;
