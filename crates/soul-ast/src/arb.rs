//! Depth-bounded `proptest` generators for small ASTs, used by the
//! round-trip properties in `copy.rs` and `desugar.rs`. Only `Literal`,
//! `Binary`, and `Cast` are generated -- enough surface to exercise the
//! properties under test without needing a full grammar.

use proptest::prelude::*;

use crate::node::{ASTNode, BinaryNode, CastNode, LiteralNode, LiteralType};
use crate::types::{Operator, Type, Value};

fn leaf() -> impl Strategy<Value = ASTNode> {
    prop_oneof![
        any::<i32>().prop_map(|v| ASTNode::Literal(Box::new(LiteralNode {
            value: Value::I64(v as i64),
            literal_type: LiteralType::Int32,
            ty: Type::unknown(),
        }))),
        any::<bool>().prop_map(|v| ASTNode::Literal(Box::new(LiteralNode {
            value: Value::Bool(v),
            literal_type: LiteralType::Boolean,
            ty: Type::unknown(),
        }))),
    ]
}

/// A tree of `Literal`/`Binary`/`Cast` nodes, bounded to at most `depth`
/// levels and a handful of nodes per level.
pub fn ast_tree(depth: u32) -> impl Strategy<Value = ASTNode> {
    leaf().prop_recursive(depth, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone(), arith_op()).prop_map(|(lhs, rhs, op)| {
                ASTNode::Binary(Box::new(BinaryNode { op, lhs, rhs, ty: Type::unknown() }))
            }),
            (inner, cast_target()).prop_map(|(expr, target_type)| {
                ASTNode::Cast(Box::new(CastNode { target_type, expr, ty: Type::unknown() }))
            }),
        ]
    })
}

fn arith_op() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Add),
        Just(Operator::Sub),
        Just(Operator::AddAssign),
        Just(Operator::SubAssign),
    ]
}

fn cast_target() -> impl Strategy<Value = String> {
    prop_oneof![Just("i32".to_string()), Just("i64".to_string()), Just("str".to_string())]
}
