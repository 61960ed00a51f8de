//! Deep clone with variant-, order-, and type-preserving equality.

use crate::node::ASTNode;
use crate::visitor::Visitor;

/// Produces a deep clone of an AST. The default `Visitor` traversal already
/// rebuilds every node from its visited children while leaving every other
/// field (including `ty` and, for `Literal`, `literal_type`) untouched, so
/// `CopyVisitor` needs no overrides at all -- it *is* the default traversal.
#[derive(Default)]
pub struct CopyVisitor;

impl Visitor for CopyVisitor {}

impl CopyVisitor {
    pub fn copy(node: &ASTNode) -> ASTNode {
        let mut visitor = CopyVisitor;
        visitor.visit(node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BinaryNode, BlockNode, LiteralNode, LiteralType};
    use crate::stringify::ast_to_json;
    use crate::types::{Operator, PrimitiveKind, Type, Value};

    fn sample() -> ASTNode {
        ASTNode::Block(Box::new(BlockNode {
            statements: vec![ASTNode::Binary(Box::new(BinaryNode {
                op: Operator::Add,
                lhs: ASTNode::Literal(Box::new(LiteralNode {
                    value: Value::I64(1),
                    literal_type: LiteralType::Int32,
                    ty: Type::Primitive(PrimitiveKind::Int32),
                })),
                rhs: ASTNode::Literal(Box::new(LiteralNode {
                    value: Value::I64(2),
                    literal_type: LiteralType::Int32,
                    ty: Type::Primitive(PrimitiveKind::Int32),
                })),
                ty: Type::Primitive(PrimitiveKind::Int32),
            }))],
            ty: Type::unknown(),
        }))
    }

    #[test]
    fn stringify_round_trip() {
        let original = sample();
        let cloned = CopyVisitor::copy(&original);
        assert_eq!(ast_to_json(&original, false), ast_to_json(&cloned, false));
    }

    proptest::proptest! {
        #[test]
        fn stringify_of_copy_matches_stringify_of_original(node in crate::arb::ast_tree(4)) {
            let cloned = CopyVisitor::copy(&node);
            proptest::prop_assert_eq!(ast_to_json(&node, false), ast_to_json(&cloned, false));
        }
    }
}
