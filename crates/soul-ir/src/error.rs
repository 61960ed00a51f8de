//! IR-level errors for fallible builder operations.

use thiserror::Error;

use crate::id::{BlockId, InstrId};

#[derive(Debug, Error)]
pub enum IrError {
    #[error("block not found: BlockId({id})", id = id.0)]
    BlockNotFound { id: BlockId },

    #[error("instruction not found: InstrId({id})", id = id.0)]
    InstrNotFound { id: InstrId },

    #[error("no current function: a function must be created before emitting instructions")]
    NoCurrentFunction,

    #[error("no current block: a block must be selected before emitting instructions")]
    NoCurrentBlock,
}
