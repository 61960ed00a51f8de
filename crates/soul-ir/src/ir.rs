//! The SSA CFG data model: `Module`, `Function`, `BasicBlock`, `Instruction`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use soul_ast::{Type, Value};

use crate::id::{BlockId, InstrId};

/// An instruction's payload. Each variant holds exactly the operand
/// references (`InstrId`) and/or block references (`BlockId`) it needs --
/// not every variant fits a fixed two-operand shape (`Call` takes a
/// variable argument list), but every operand reference is an index into
/// the owning function's arenas, never a raw pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstructionKind {
    Unreachable,
    Noop,
    Const(Value),
    Cast(InstrId),
    Jump(BlockId),
    JumpIf {
        cond: InstrId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Not(InstrId),
    Add(InstrId, InstrId),
    Sub(InstrId, InstrId),
    Mul(InstrId, InstrId),
    Div(InstrId, InstrId),
    Mod(InstrId, InstrId),
    Equal(InstrId, InstrId),
    NotEqual(InstrId, InstrId),
    Greater(InstrId, InstrId),
    GreaterEqual(InstrId, InstrId),
    Less(InstrId, InstrId),
    LessEqual(InstrId, InstrId),
    And(InstrId, InstrId),
    Or(InstrId, InstrId),
    /// Observes the most recent `Upsilon` for `identifier` reaching this
    /// program point along every predecessor edge.
    Phi(String),
    /// Binds the logical variable `identifier` to `value` at this program
    /// point; consumed by a matching `Phi` at a later join. This builder's
    /// simplified per-block phi cache (see `IrBuilder::emit_phi`) only
    /// reconciles upsilons within the current block rather than walking
    /// dominators, so no explicit link to the consuming `Phi` is tracked
    /// on the instruction itself.
    Upsilon {
        identifier: String,
        value: InstrId,
    },
    /// Reads the `index`-th function parameter. Not named in the
    /// instruction set proper; added to close the `GetArgument`-shaped
    /// gap for function parameter reads.
    Argument(u32),
    /// A return-equivalent terminator, added to close the gap of the
    /// otherwise-unresolved `Return` lowering.
    Return(Option<InstrId>),
    /// A call to a named function, added to close the gap left by
    /// `LowerVisitor`'s `FunctionCall` dispatch rule, which requires
    /// emitting a call instruction the base instruction set doesn't name.
    Call { name: String, args: Vec<InstrId> },
}

/// One SSA instruction: a globally (module-wide) unique `version`, a
/// resolved `type`, and a payload. Equality and ordering are by `version`
/// alone -- that's the instruction's SSA identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub version: u32,
    pub ty: Type,
    pub kind: InstructionKind,
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}
impl Eq for Instruction {}

impl PartialOrd for Instruction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Instruction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

/// A maximal straight-line instruction sequence with one entry and one
/// explicit terminator. Owns its instructions; successors are references
/// (indices) into the owning function's block arena, not ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub label: u32,
    pub successors: Vec<BlockId>,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(label: u32) -> Self {
        BasicBlock { label, successors: Vec::new(), instructions: Vec::new() }
    }
}

/// Owns its basic blocks; `basic_blocks[0]` is always the entry block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub parameter_types: Vec<Type>,
    pub basic_blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.basic_blocks.get(id.0 as usize)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.basic_blocks.get_mut(id.0 as usize)
    }

    pub fn instruction(&self, id: InstrId) -> Option<&Instruction> {
        self.basic_blocks
            .iter()
            .flat_map(|b| &b.instructions)
            .find(|instr| instr.version == id.0)
    }
}

/// Owns its functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_equality_and_order_are_by_version() {
        let a = Instruction { version: 0, ty: Type::unknown(), kind: InstructionKind::Noop };
        let b = Instruction { version: 0, ty: Type::unknown(), kind: InstructionKind::Unreachable };
        let c = Instruction { version: 1, ty: Type::unknown(), kind: InstructionKind::Noop };
        assert_eq!(a, b);
        assert!(a < c);
    }
}
