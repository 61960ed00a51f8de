//! Rewrites compound-assign binaries and `for` loops into kernel forms.
//!
//! Extends `CopyVisitor`: every node not named below passes through the
//! same default traversal `CopyVisitor` uses: only `visit_binary` and
//! `visit_for_loop` are overridden.

use crate::node::{
    ASTNode, BinaryNode, BlockNode, ForLoopNode, LiteralNode, LiteralType, WhileNode,
};
use crate::types::{PrimitiveKind, Type, Value};
use crate::visitor::Visitor;
use crate::visitors::copy::CopyVisitor;

#[derive(Default)]
pub struct DesugarVisitor;

impl DesugarVisitor {
    pub fn desugar(node: ASTNode) -> ASTNode {
        let mut visitor = DesugarVisitor;
        visitor.visit(node)
    }
}

impl Visitor for DesugarVisitor {
    fn visit_binary(&mut self, node: BinaryNode) -> ASTNode {
        let Some(underlying) = node.op.underlying_arithmetic() else {
            return ASTNode::Binary(Box::new(BinaryNode {
                op: node.op,
                lhs: self.visit(node.lhs),
                rhs: self.visit(node.rhs),
                ty: node.ty,
            }));
        };

        let lhs = self.visit(node.lhs);
        let rhs = self.visit(node.rhs);

        // Two independent clones: one is written to, one is read as the
        // left operand of the underlying arithmetic op. They must not
        // share ownership.
        let lhs_write = CopyVisitor::copy(&lhs);
        let lhs_read = lhs;

        let inner = ASTNode::Binary(Box::new(BinaryNode {
            op: underlying,
            lhs: lhs_read,
            rhs,
            ty: node.ty.clone(),
        }));

        ASTNode::Binary(Box::new(BinaryNode {
            op: crate::types::Operator::Assign,
            lhs: lhs_write,
            rhs: inner,
            ty: node.ty,
        }))
    }

    fn visit_for_loop(&mut self, node: ForLoopNode) -> ASTNode {
        let init = node.init.map(|n| self.visit(n));
        let condition = node.condition.map(|n| self.visit(n));
        let update = node.update.map(|n| self.visit(n));
        let body = self.visit(node.body);

        let ASTNode::Block(body_block) = body else {
            unreachable!("ForLoop.body is always a Block")
        };
        let body_block = *body_block;
        let mut inner_statements = body_block.statements;
        if let Some(update) = update {
            inner_statements.push(update);
        }
        let inner_block = ASTNode::Block(Box::new(BlockNode {
            statements: inner_statements,
            ty: body_block.ty,
        }));

        // An absent condition (`for (;;)`) has no rewrite rule in the
        // source; this treats it as an infinite loop, i.e. `true`.
        let condition = condition.unwrap_or_else(|| {
            ASTNode::Literal(Box::new(LiteralNode {
                value: Value::Bool(true),
                literal_type: LiteralType::Boolean,
                ty: Type::Primitive(PrimitiveKind::Boolean),
            }))
        });

        let while_node = ASTNode::While(Box::new(WhileNode {
            condition,
            body: inner_block,
            ty: Type::Primitive(PrimitiveKind::Void),
        }));

        let mut outer_statements = Vec::with_capacity(2);
        if let Some(init) = init {
            outer_statements.push(init);
        }
        outer_statements.push(while_node);

        ASTNode::Block(Box::new(BlockNode {
            statements: outer_statements,
            ty: node.ty,
        }))
    }
}
