//! The AST-to-JSON stringifier used for golden tests.
//!
//! Produces a JSON-shaped tree with keys in a fixed, per-variant order.
//! Built by hand rather than via `serde_json::Value` (whose `Map` sorts
//! keys unless the `preserve_order` feature is enabled, which this crate
//! does not take on) so that key order is guaranteed independent of any
//! crate feature flags. Absent optional children print as the literal
//! token `__unknown__`, matching `Value`'s own monostate rendering.

use crate::node::{ASTNode, LiteralType, LoopControlKind};

fn json_string(s: &str) -> String {
    serde_json::to_string(s).expect("string serialization cannot fail")
}

const UNKNOWN_TOKEN: &str = "\"__unknown__\"";

fn opt_json(node: &Option<ASTNode>, print_types: bool) -> String {
    match node {
        Some(n) => ast_to_json_inner(n, print_types),
        None => UNKNOWN_TOKEN.to_string(),
    }
}

fn array_json(items: &[ASTNode], print_types: bool) -> String {
    let parts: Vec<String> = items.iter().map(|n| ast_to_json_inner(n, print_types)).collect();
    format!("[{}]", parts.join(","))
}

fn literal_type_name(lt: LiteralType) -> &'static str {
    match lt {
        LiteralType::Boolean => "boolean",
        LiteralType::Char => "char",
        LiteralType::Float32 => "float32",
        LiteralType::Float64 => "float64",
        LiteralType::Int32 => "int32",
        LiteralType::Int64 => "int64",
        LiteralType::String => "string",
        LiteralType::Identifier => "identifier",
    }
}

fn loop_control_name(k: LoopControlKind) -> &'static str {
    match k {
        LoopControlKind::Break => "break",
        LoopControlKind::Continue => "continue",
    }
}

/// Renders one object's fields (already in the fixed order for its kind),
/// appending `"type"` last if `print_types` is set.
fn object(kind: &str, fields: &[(&str, String)], node: &ASTNode, print_types: bool) -> String {
    let mut out = format!("{{\"kind\":{}", json_string(kind));
    for (key, value) in fields {
        out.push_str(&format!(",{}:{}", json_string(key), value));
    }
    if print_types {
        out.push_str(&format!(",\"type\":{}", json_string(&node.ty().to_string())));
    }
    out.push('}');
    out
}

fn ast_to_json_inner(node: &ASTNode, print_types: bool) -> String {
    match node {
        ASTNode::Binary(n) => object(
            "Binary",
            &[
                ("op", json_string(n.op.symbol())),
                ("lhs", ast_to_json_inner(&n.lhs, print_types)),
                ("rhs", ast_to_json_inner(&n.rhs, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::Block(n) => object(
            "Block",
            &[("statements", array_json(&n.statements, print_types))],
            node,
            print_types,
        ),
        ASTNode::Cast(n) => object(
            "Cast",
            &[
                ("target_type", json_string(&n.target_type)),
                ("expr", ast_to_json_inner(&n.expr, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::Error(n) => {
            object("Error", &[("message", json_string(&n.message))], node, print_types)
        }
        ASTNode::ForLoop(n) => object(
            "ForLoop",
            &[
                ("init", opt_json(&n.init, print_types)),
                ("condition", opt_json(&n.condition, print_types)),
                ("update", opt_json(&n.update, print_types)),
                ("body", ast_to_json_inner(&n.body, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::ForeachLoop(n) => object(
            "ForeachLoop",
            &[
                ("variable", json_string(&n.variable)),
                ("iterable", ast_to_json_inner(&n.iterable, print_types)),
                ("body", ast_to_json_inner(&n.body, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::FunctionCall(n) => object(
            "FunctionCall",
            &[
                ("name", json_string(&n.name)),
                ("arguments", array_json(&n.arguments, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::FunctionDeclaration(n) => object(
            "FunctionDeclaration",
            &[
                ("name", json_string(&n.name)),
                ("return_type", json_string(&n.return_type)),
                ("parameters", array_json(&n.parameters, print_types)),
                ("body", ast_to_json_inner(&n.body, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::If(n) => object(
            "If",
            &[
                ("condition", ast_to_json_inner(&n.condition, print_types)),
                ("then", ast_to_json_inner(&n.then_branch, print_types)),
                ("else", ast_to_json_inner(&n.else_branch, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::Literal(n) => object(
            "Literal",
            &[
                ("value", json_string(&n.value.to_display_string())),
                ("literal_type", json_string(literal_type_name(n.literal_type))),
            ],
            node,
            print_types,
        ),
        ASTNode::LoopControl(n) => object(
            "LoopControl",
            &[("kind", json_string(loop_control_name(n.kind)))],
            node,
            print_types,
        ),
        ASTNode::Module(n) => object(
            "Module",
            &[
                ("name", json_string(&n.name)),
                ("statements", array_json(&n.statements, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::Return(n) => object(
            "Return",
            &[("expression", opt_json(&n.expression, print_types))],
            node,
            print_types,
        ),
        ASTNode::StructDeclaration(n) => object(
            "StructDeclaration",
            &[
                ("name", json_string(&n.name)),
                ("fields", array_json(&n.fields, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::Unary(n) => object(
            "Unary",
            &[
                ("op", json_string(n.op.symbol())),
                ("expr", ast_to_json_inner(&n.expr, print_types)),
            ],
            node,
            print_types,
        ),
        ASTNode::VariableDeclaration(n) => object(
            "VariableDeclaration",
            &[
                ("name", json_string(&n.name)),
                ("declared_type", json_string(&n.declared_type)),
                ("init", opt_json(&n.init, print_types)),
                ("is_mutable", n.is_mutable.to_string()),
            ],
            node,
            print_types,
        ),
        ASTNode::While(n) => object(
            "While",
            &[
                ("condition", ast_to_json_inner(&n.condition, print_types)),
                ("body", ast_to_json_inner(&n.body, print_types)),
            ],
            node,
            print_types,
        ),
    }
}

/// Deterministic JSON-shaped dump of an AST, for golden tests.
/// `print_types` additionally emits each node's resolved `type` field.
pub fn ast_to_json(node: &ASTNode, print_types: bool) -> String {
    ast_to_json_inner(node, print_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LiteralNode, ModuleNode};
    use crate::types::{PrimitiveKind, Type, Value};

    #[test]
    fn literal_stringifies_deterministically() {
        let node = ASTNode::Literal(Box::new(LiteralNode {
            value: Value::I64(42),
            literal_type: LiteralType::Int32,
            ty: Type::Primitive(PrimitiveKind::Int32),
        }));
        let first = ast_to_json(&node, false);
        let second = ast_to_json(&node, false);
        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"{"kind":"Literal","value":"42","literal_type":"int32"}"#
        );
    }

    #[test]
    fn print_types_appends_type_last() {
        let node = ASTNode::Literal(Box::new(LiteralNode {
            value: Value::Bool(true),
            literal_type: LiteralType::Boolean,
            ty: Type::Primitive(PrimitiveKind::Boolean),
        }));
        let json = ast_to_json(&node, true);
        assert!(json.ends_with(r#","type":"bool"}"#));
    }

    #[test]
    fn empty_module_has_deterministic_shape() {
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::Primitive(PrimitiveKind::Void),
        }));
        assert_eq!(
            ast_to_json(&module, false),
            r#"{"kind":"Module","name":"m","statements":[]}"#
        );
    }

    #[test]
    fn absent_optional_child_prints_unknown_token() {
        let ret = ASTNode::Return(Box::new(crate::node::ReturnNode {
            expression: None,
            ty: Type::Primitive(PrimitiveKind::Void),
        }));
        assert_eq!(
            ast_to_json(&ret, false),
            r#"{"kind":"Return","expression":"__unknown__"}"#
        );
    }
}
