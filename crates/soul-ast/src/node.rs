//! The AST node sum type.
//!
//! One payload struct per variant, each carrying a `ty: Type` field
//! (initially `Type::unknown()`), flattened into the `ASTNode` enum for
//! dispatch -- a tagged union rather than a virtual class hierarchy, so
//! visiting collapses to an ordinary `match`.

use serde::{Deserialize, Serialize};

use crate::types::{Operator, Type, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ASTNode {
    Binary(Box<BinaryNode>),
    Block(Box<BlockNode>),
    Cast(Box<CastNode>),
    Error(Box<ErrorNode>),
    ForLoop(Box<ForLoopNode>),
    ForeachLoop(Box<ForeachLoopNode>),
    FunctionCall(Box<FunctionCallNode>),
    FunctionDeclaration(Box<FunctionDeclarationNode>),
    If(Box<IfNode>),
    Literal(Box<LiteralNode>),
    LoopControl(Box<LoopControlNode>),
    Module(Box<ModuleNode>),
    Return(Box<ReturnNode>),
    StructDeclaration(Box<StructDeclarationNode>),
    Unary(Box<UnaryNode>),
    VariableDeclaration(Box<VariableDeclarationNode>),
    While(Box<WhileNode>),
}

impl ASTNode {
    pub fn ty(&self) -> &Type {
        match self {
            ASTNode::Binary(n) => &n.ty,
            ASTNode::Block(n) => &n.ty,
            ASTNode::Cast(n) => &n.ty,
            ASTNode::Error(n) => &n.ty,
            ASTNode::ForLoop(n) => &n.ty,
            ASTNode::ForeachLoop(n) => &n.ty,
            ASTNode::FunctionCall(n) => &n.ty,
            ASTNode::FunctionDeclaration(n) => &n.ty,
            ASTNode::If(n) => &n.ty,
            ASTNode::Literal(n) => &n.ty,
            ASTNode::LoopControl(n) => &n.ty,
            ASTNode::Module(n) => &n.ty,
            ASTNode::Return(n) => &n.ty,
            ASTNode::StructDeclaration(n) => &n.ty,
            ASTNode::Unary(n) => &n.ty,
            ASTNode::VariableDeclaration(n) => &n.ty,
            ASTNode::While(n) => &n.ty,
        }
    }

    pub fn set_ty(&mut self, ty: Type) {
        match self {
            ASTNode::Binary(n) => n.ty = ty,
            ASTNode::Block(n) => n.ty = ty,
            ASTNode::Cast(n) => n.ty = ty,
            ASTNode::Error(n) => n.ty = ty,
            ASTNode::ForLoop(n) => n.ty = ty,
            ASTNode::ForeachLoop(n) => n.ty = ty,
            ASTNode::FunctionCall(n) => n.ty = ty,
            ASTNode::FunctionDeclaration(n) => n.ty = ty,
            ASTNode::If(n) => n.ty = ty,
            ASTNode::Literal(n) => n.ty = ty,
            ASTNode::LoopControl(n) => n.ty = ty,
            ASTNode::Module(n) => n.ty = ty,
            ASTNode::Return(n) => n.ty = ty,
            ASTNode::StructDeclaration(n) => n.ty = ty,
            ASTNode::Unary(n) => n.ty = ty,
            ASTNode::VariableDeclaration(n) => n.ty = ty,
            ASTNode::While(n) => n.ty = ty,
        }
    }

    /// Is this node (or, transitively, does it represent) an `ErrorNode`?
    pub fn is_error(&self) -> bool {
        matches!(self, ASTNode::Error(_))
    }

    /// Read-only children in declaration order, for traversals (like
    /// `ErrorCollectorVisitor`) that don't need to rebuild the tree.
    pub fn children(&self) -> Vec<&ASTNode> {
        match self {
            ASTNode::Binary(n) => vec![&n.lhs, &n.rhs],
            ASTNode::Block(n) => n.statements.iter().collect(),
            ASTNode::Cast(n) => vec![&n.expr],
            ASTNode::Error(_) => vec![],
            ASTNode::ForLoop(n) => {
                let mut out = vec![];
                if let Some(init) = &n.init {
                    out.push(init);
                }
                if let Some(cond) = &n.condition {
                    out.push(cond);
                }
                if let Some(upd) = &n.update {
                    out.push(upd);
                }
                out.push(&n.body);
                out
            }
            ASTNode::ForeachLoop(n) => vec![&n.iterable, &n.body],
            ASTNode::FunctionCall(n) => n.arguments.iter().collect(),
            ASTNode::FunctionDeclaration(n) => {
                let mut out: Vec<&ASTNode> = n.parameters.iter().collect();
                out.push(&n.body);
                out
            }
            ASTNode::If(n) => vec![&n.condition, &n.then_branch, &n.else_branch],
            ASTNode::Literal(_) => vec![],
            ASTNode::LoopControl(_) => vec![],
            ASTNode::Module(n) => n.statements.iter().collect(),
            ASTNode::Return(n) => n.expression.iter().collect(),
            ASTNode::StructDeclaration(n) => n.fields.iter().collect(),
            ASTNode::Unary(n) => vec![&n.expr],
            ASTNode::VariableDeclaration(n) => n.init.iter().collect(),
            ASTNode::While(n) => vec![&n.condition, &n.body],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryNode {
    pub op: Operator,
    pub lhs: ASTNode,
    pub rhs: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockNode {
    pub statements: Vec<ASTNode>,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastNode {
    pub target_type: String,
    pub expr: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNode {
    pub message: String,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForLoopNode {
    pub init: Option<ASTNode>,
    pub condition: Option<ASTNode>,
    pub update: Option<ASTNode>,
    /// Always a `Block`.
    pub body: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeachLoopNode {
    pub variable: String,
    pub iterable: ASTNode,
    /// Always a `Block`.
    pub body: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallNode {
    pub name: String,
    pub arguments: Vec<ASTNode>,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclarationNode {
    pub name: String,
    pub return_type: String,
    /// Each a `VariableDeclaration`.
    pub parameters: Vec<ASTNode>,
    /// Always a `Block`.
    pub body: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfNode {
    pub condition: ASTNode,
    /// Always a `Block`.
    pub then_branch: ASTNode,
    /// Always a `Block`, possibly empty.
    pub else_branch: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralType {
    Boolean,
    Char,
    Float32,
    Float64,
    Int32,
    Int64,
    String,
    Identifier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralNode {
    pub value: Value,
    pub literal_type: LiteralType,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopControlKind {
    Break,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopControlNode {
    pub kind: LoopControlKind,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleNode {
    pub name: String,
    pub statements: Vec<ASTNode>,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnNode {
    pub expression: Option<ASTNode>,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDeclarationNode {
    pub name: String,
    /// Each a `VariableDeclaration`.
    pub fields: Vec<ASTNode>,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryNode {
    pub op: Operator,
    pub expr: ASTNode,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclarationNode {
    pub name: String,
    pub declared_type: String,
    pub init: Option<ASTNode>,
    pub is_mutable: bool,
    pub ty: Type,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileNode {
    pub condition: ASTNode,
    /// Always a `Block`.
    pub body: ASTNode,
    pub ty: Type,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn lit_i32(v: i64) -> ASTNode {
        ASTNode::Literal(Box::new(LiteralNode {
            value: Value::I64(v),
            literal_type: LiteralType::Int32,
            ty: Type::Primitive(PrimitiveKind::Int32),
        }))
    }

    #[test]
    fn children_of_binary() {
        let node = ASTNode::Binary(Box::new(BinaryNode {
            op: Operator::Add,
            lhs: lit_i32(1),
            rhs: lit_i32(2),
            ty: Type::unknown(),
        }));
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn children_of_for_loop_skip_absent_parts() {
        let body = ASTNode::Block(Box::new(BlockNode {
            statements: vec![],
            ty: Type::unknown(),
        }));
        let node = ASTNode::ForLoop(Box::new(ForLoopNode {
            init: None,
            condition: Some(lit_i32(1)),
            update: None,
            body,
            ty: Type::unknown(),
        }));
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn set_ty_round_trips() {
        let mut node = lit_i32(5);
        node.set_ty(Type::Primitive(PrimitiveKind::Int64));
        assert_eq!(node.ty(), &Type::Primitive(PrimitiveKind::Int64));
    }
}
