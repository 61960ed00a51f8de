//! Materializes a CFG of basic blocks from a higher-level visitor (see
//! `soul-lower`), including the Upsilon/Phi bookkeeping that realizes SSA
//! out of lexically-scoped variables (Braun et al.).

use std::collections::HashMap;

use soul_ast::{Type, Value};

use crate::error::IrError;
use crate::id::{BlockId, InstrId};
use crate::ir::{BasicBlock, Function, Instruction, InstructionKind, Module};

pub struct IrBuilder {
    module: Module,
    current_function: Option<usize>,
    current_block: Option<BlockId>,
    next_version: u32,
    next_label: u32,
    /// Per `(block, identifier)`, the `Phi` already materialized in that
    /// block for that identifier -- so repeated reads of the same
    /// variable within one block share one `Phi` rather than duplicating.
    phi_cache: HashMap<(BlockId, String), InstrId>,
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrBuilder {
    pub fn new() -> Self {
        IrBuilder {
            module: Module::default(),
            current_function: None,
            current_block: None,
            next_version: 0,
            next_label: 0,
            phi_cache: HashMap::new(),
        }
    }

    pub fn set_module_name(&mut self, name: impl Into<String>) {
        self.module.name = name.into();
    }

    /// Yields the constructed module and resets the builder to a fresh
    /// state, ready to build another module.
    pub fn build(&mut self) -> Module {
        self.current_function = None;
        self.current_block = None;
        self.next_version = 0;
        self.next_label = 0;
        self.phi_cache.clear();
        std::mem::take(&mut self.module)
    }

    pub fn create_function(
        &mut self,
        name: impl Into<String>,
        return_type: Type,
        parameter_types: Vec<Type>,
    ) -> BlockId {
        let entry = BasicBlock::new(0);
        let function = Function {
            name: name.into(),
            return_type,
            parameter_types,
            basic_blocks: vec![entry],
        };
        self.module.functions.push(function);
        self.current_function = Some(self.module.functions.len() - 1);
        self.next_label = 1;
        self.current_block = Some(BlockId(0));
        BlockId(0)
    }

    pub fn create_basic_block(&mut self) -> Result<BlockId, IrError> {
        let label = self.next_label;
        self.next_label += 1;
        let f = self.current_function_mut()?;
        let id = BlockId(f.basic_blocks.len() as u32);
        f.basic_blocks.push(BasicBlock::new(label));
        Ok(id)
    }

    pub fn switch_to(&mut self, block: BlockId) -> Result<(), IrError> {
        let f = self.current_function()?;
        if f.block(block).is_none() {
            return Err(IrError::BlockNotFound { id: block });
        }
        self.current_block = Some(block);
        Ok(())
    }

    pub fn current_block_id(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn connect(&mut self, pred: BlockId, succ: BlockId) -> Result<(), IrError> {
        let f = self.current_function_mut()?;
        let block = f.block_mut(pred).ok_or(IrError::BlockNotFound { id: pred })?;
        block.successors.push(succ);
        Ok(())
    }

    pub fn connect_many(
        &mut self,
        pred: BlockId,
        succs: impl IntoIterator<Item = BlockId>,
    ) -> Result<(), IrError> {
        for succ in succs {
            self.connect(pred, succ)?;
        }
        Ok(())
    }

    fn current_function(&self) -> Result<&Function, IrError> {
        let idx = self.current_function.ok_or(IrError::NoCurrentFunction)?;
        Ok(&self.module.functions[idx])
    }

    fn current_function_mut(&mut self) -> Result<&mut Function, IrError> {
        let idx = self.current_function.ok_or(IrError::NoCurrentFunction)?;
        Ok(&mut self.module.functions[idx])
    }

    fn emit(&mut self, ty: Type, kind: InstructionKind) -> Result<InstrId, IrError> {
        let block_id = self.current_block.ok_or(IrError::NoCurrentBlock)?;
        let version = self.next_version;
        self.next_version += 1;
        let f = self.current_function_mut()?;
        let block = f.block_mut(block_id).ok_or(IrError::BlockNotFound { id: block_id })?;
        block.instructions.push(Instruction { version, ty, kind });
        Ok(InstrId(version))
    }

    fn type_of(&self, id: InstrId) -> Type {
        self.current_function()
            .ok()
            .and_then(|f| f.instruction(id))
            .map(|instr| instr.ty.clone())
            .unwrap_or_else(Type::unknown)
    }

    pub fn emit_unreachable(&mut self) -> Result<InstrId, IrError> {
        self.emit(Type::unknown(), InstructionKind::Unreachable)
    }

    pub fn emit_noop(&mut self) -> Result<InstrId, IrError> {
        self.emit(Type::unknown(), InstructionKind::Noop)
    }

    pub fn emit_const(&mut self, value: Value, ty: Type) -> Result<InstrId, IrError> {
        self.emit(ty, InstructionKind::Const(value))
    }

    pub fn emit_cast(&mut self, value: InstrId, ty: Type) -> Result<InstrId, IrError> {
        self.emit(ty, InstructionKind::Cast(value))
    }

    pub fn emit_jump(&mut self, target: BlockId) -> Result<InstrId, IrError> {
        self.emit(Type::unknown(), InstructionKind::Jump(target))
    }

    pub fn emit_jump_if(
        &mut self,
        cond: InstrId,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<InstrId, IrError> {
        self.emit(Type::unknown(), InstructionKind::JumpIf { cond, then_block, else_block })
    }

    pub fn emit_not(&mut self, arg: InstrId, ty: Type) -> Result<InstrId, IrError> {
        self.emit(ty, InstructionKind::Not(arg))
    }

    /// `Add`/`Sub`/`Mul`/`Div`/`Mod` -- result type equals operand type.
    pub fn emit_arithmetic(
        &mut self,
        op: ArithmeticOp,
        lhs: InstrId,
        rhs: InstrId,
        ty: Type,
    ) -> Result<InstrId, IrError> {
        let kind = match op {
            ArithmeticOp::Add => InstructionKind::Add(lhs, rhs),
            ArithmeticOp::Sub => InstructionKind::Sub(lhs, rhs),
            ArithmeticOp::Mul => InstructionKind::Mul(lhs, rhs),
            ArithmeticOp::Div => InstructionKind::Div(lhs, rhs),
            ArithmeticOp::Mod => InstructionKind::Mod(lhs, rhs),
        };
        self.emit(ty, kind)
    }

    /// Comparisons -- result type is always `Boolean`.
    pub fn emit_comparison(
        &mut self,
        op: ComparisonOp,
        lhs: InstrId,
        rhs: InstrId,
    ) -> Result<InstrId, IrError> {
        let kind = match op {
            ComparisonOp::Equal => InstructionKind::Equal(lhs, rhs),
            ComparisonOp::NotEqual => InstructionKind::NotEqual(lhs, rhs),
            ComparisonOp::Greater => InstructionKind::Greater(lhs, rhs),
            ComparisonOp::GreaterEqual => InstructionKind::GreaterEqual(lhs, rhs),
            ComparisonOp::Less => InstructionKind::Less(lhs, rhs),
            ComparisonOp::LessEqual => InstructionKind::LessEqual(lhs, rhs),
        };
        self.emit(soul_ast::Type::Primitive(soul_ast::PrimitiveKind::Boolean), kind)
    }

    /// `And`/`Or` -- result type is always `Boolean`.
    pub fn emit_logical(&mut self, op: LogicalOp, lhs: InstrId, rhs: InstrId) -> Result<InstrId, IrError> {
        let kind = match op {
            LogicalOp::And => InstructionKind::And(lhs, rhs),
            LogicalOp::Or => InstructionKind::Or(lhs, rhs),
        };
        self.emit(soul_ast::Type::Primitive(soul_ast::PrimitiveKind::Boolean), kind)
    }

    pub fn emit_argument(&mut self, index: u32, ty: Type) -> Result<InstrId, IrError> {
        self.emit(ty, InstructionKind::Argument(index))
    }

    pub fn emit_return(&mut self, value: Option<InstrId>) -> Result<InstrId, IrError> {
        let ty = value.map(|v| self.type_of(v)).unwrap_or_else(|| {
            Type::Primitive(soul_ast::PrimitiveKind::Void)
        });
        self.emit(ty, InstructionKind::Return(value))
    }

    pub fn emit_call(&mut self, name: impl Into<String>, args: Vec<InstrId>, ty: Type) -> Result<InstrId, IrError> {
        self.emit(ty, InstructionKind::Call { name: name.into(), args })
    }

    /// `Upsilon(x, v)`: states the logical variable `x` holds value `v`
    /// at this program point.
    pub fn emit_upsilon(&mut self, identifier: impl Into<String>, value: InstrId) -> Result<InstrId, IrError> {
        let identifier = identifier.into();
        let ty = self.type_of(value);
        self.emit(ty, InstructionKind::Upsilon { identifier, value })
    }

    /// `Phi(x, tau)`: the merge point for `x`'s reaching value. Returns
    /// the existing `Phi` for `x` in the current block if one was already
    /// emitted, rather than creating a duplicate.
    pub fn emit_phi(&mut self, identifier: impl Into<String>, ty: Type) -> Result<InstrId, IrError> {
        let identifier = identifier.into();
        let block = self.current_block.ok_or(IrError::NoCurrentBlock)?;
        if let Some(existing) = self.phi_cache.get(&(block, identifier.clone())) {
            return Ok(*existing);
        }
        let id = self.emit(ty, InstructionKind::Phi(identifier.clone()))?;
        self.phi_cache.insert((block, identifier), id);
        Ok(id)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

#[derive(Debug, Clone, Copy)]
pub enum LogicalOp {
    And,
    Or,
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_ast::PrimitiveKind;

    #[test]
    fn builds_entry_block_and_increments_versions() {
        let mut b = IrBuilder::new();
        b.set_module_name("m");
        b.create_function("main", Type::Primitive(PrimitiveKind::Void), vec![]);
        let c0 = b.emit_const(Value::I64(1), Type::Primitive(PrimitiveKind::Int32)).unwrap();
        let c1 = b.emit_const(Value::I64(2), Type::Primitive(PrimitiveKind::Int32)).unwrap();
        assert_eq!(c0, InstrId(0));
        assert_eq!(c1, InstrId(1));
        let module = b.build();
        assert_eq!(module.name, "m");
        assert_eq!(module.functions[0].basic_blocks[0].instructions.len(), 2);
    }

    #[test]
    fn phi_cache_reuses_existing_phi_in_block() {
        let mut b = IrBuilder::new();
        b.create_function("f", Type::Primitive(PrimitiveKind::Void), vec![]);
        let p1 = b.emit_phi("x", Type::Primitive(PrimitiveKind::Int32)).unwrap();
        let p2 = b.emit_phi("x", Type::Primitive(PrimitiveKind::Int32)).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn connect_records_successor() {
        let mut b = IrBuilder::new();
        b.create_function("f", Type::Primitive(PrimitiveKind::Void), vec![]);
        let entry = b.current_block_id().unwrap();
        let next = b.create_basic_block().unwrap();
        b.connect(entry, next).unwrap();
        let module = b.build();
        assert_eq!(module.functions[0].basic_blocks[0].successors, vec![next]);
        assert_eq!(module.functions[0].basic_blocks[1].label, 1);
    }

    #[test]
    fn block_not_found_is_an_error() {
        let mut b = IrBuilder::new();
        b.create_function("f", Type::Primitive(PrimitiveKind::Void), vec![]);
        assert!(b.switch_to(BlockId(99)).is_err());
    }
}
