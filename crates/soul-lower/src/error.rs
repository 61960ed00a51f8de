//! Errors that can occur while lowering a desugared, type-resolved AST to IR.

use soul_ir::IrError;

#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    /// `lower()`'s entry point was handed a root that isn't a `Module`.
    #[error("expected a Module at the lowering root, found {0}")]
    RootNotModule(&'static str),

    /// An IR builder operation failed (dangling block/instruction
    /// reference). Indicates a bug in `LowerVisitor`'s own bookkeeping,
    /// since every block and instruction it emits is created by itself.
    #[error(transparent)]
    Ir(#[from] IrError),
}
