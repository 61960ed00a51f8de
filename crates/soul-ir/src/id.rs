//! Stable ID newtypes for IR entities: plain arena indices, not graph
//! handles -- a typed index into a per-function `Vec`, per the design
//! note preferring arenas over a generic graph library in a memory-safe
//! target language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index into a `Function`'s `basic_blocks` vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Index into a `BasicBlock`'s `instructions` vector, also doubling as the
/// instruction's SSA version (see `Instruction::version`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstrId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types_with_display() {
        assert_eq!(format!("{}", BlockId(3)), "3");
        assert_eq!(format!("{}", InstrId(7)), "7");
    }
}
