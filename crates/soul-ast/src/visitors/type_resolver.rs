//! Fills every node's `type` field, consulting the cast lattice and a
//! name table produced by `TypeDiscovererVisitor`.

use indexmap::IndexMap;

use crate::node::{
    ASTNode, BinaryNode, CastNode, ErrorNode, FunctionCallNode, FunctionDeclarationNode, IfNode,
    LiteralNode, LiteralType, StructDeclarationNode, UnaryNode, VariableDeclarationNode,
};
use crate::types::{common_implicit_type, type_cast_kind, CastKind, Operator, PrimitiveKind, Type, Value};
use crate::visitor::Visitor;

/// Resolves AST node types in a single pass. Holds the type-name table
/// from type discovery, a function name -> return-type table built as a
/// prior sub-pass over the module's top-level declarations (as §4.6
/// instructs), and a lexical variable-name -> type table populated as
/// `VariableDeclaration`s (including function parameters) are visited, so
/// that identifier reads (`Literal { literal_type: Identifier, .. }`) can
/// resolve to the type of the most recently declared variable of that
/// name -- the source has no explicit rule for this case, so this
/// environment is this crate's completion of that gap.
pub struct TypeResolverVisitor {
    names: IndexMap<String, Type>,
    function_return_types: IndexMap<String, Type>,
    variable_types: IndexMap<String, Type>,
}

impl TypeResolverVisitor {
    pub fn new(names: IndexMap<String, Type>, module: &ASTNode) -> Self {
        let mut function_return_types = IndexMap::new();
        if let ASTNode::Module(m) = module {
            for stmt in &m.statements {
                if let ASTNode::FunctionDeclaration(f) = stmt {
                    let ret = names.get(&f.return_type).cloned().unwrap_or_else(Type::unknown);
                    function_return_types.insert(f.name.clone(), ret);
                }
            }
        }
        TypeResolverVisitor {
            names,
            function_return_types,
            variable_types: IndexMap::new(),
        }
    }

    pub fn run(mut self, module: ASTNode) -> ASTNode {
        self.visit(module)
    }

    fn type_from_identifier(&self, ident: &str) -> Type {
        self.names.get(ident).cloned().unwrap_or_else(Type::unknown)
    }

    fn resolve_binary_type(&self, op: Operator, lhs_ty: &Type, rhs_ty: &Type) -> Type {
        if lhs_ty.is_unknown() || rhs_ty.is_unknown() {
            return Type::unknown();
        }
        use Operator::*;
        match op {
            Equal | NotEqual | Greater | GreaterEqual | Less | LessEqual | LogicalAnd
            | LogicalOr => Type::Primitive(PrimitiveKind::Boolean),
            Assign | AddAssign | SubAssign | MulAssign | DivAssign | ModAssign => lhs_ty.clone(),
            Add | Sub | Mul | Div | Mod => match (lhs_ty.as_primitive(), rhs_ty.as_primitive()) {
                (Some(a), Some(b)) => common_implicit_type(a, b)
                    .map(Type::Primitive)
                    .unwrap_or_else(Type::unknown),
                _ => Type::unknown(),
            },
            _ => Type::unknown(),
        }
    }
}

impl Visitor for TypeResolverVisitor {
    fn visit_literal(&mut self, node: LiteralNode) -> ASTNode {
        let ty = if matches!(node.value, Value::Unknown) {
            Type::unknown()
        } else {
            match node.literal_type {
                LiteralType::Boolean => Type::Primitive(PrimitiveKind::Boolean),
                LiteralType::Char => Type::Primitive(PrimitiveKind::Char),
                LiteralType::Float32 => Type::Primitive(PrimitiveKind::Float32),
                LiteralType::Float64 => Type::Primitive(PrimitiveKind::Float64),
                LiteralType::Int32 => Type::Primitive(PrimitiveKind::Int32),
                LiteralType::Int64 => Type::Primitive(PrimitiveKind::Int64),
                LiteralType::String => Type::Primitive(PrimitiveKind::String),
                LiteralType::Identifier => {
                    let Value::String(name) = &node.value else {
                        return ASTNode::Literal(Box::new(LiteralNode { ty: Type::unknown(), ..node }));
                    };
                    self.variable_types.get(name).cloned().unwrap_or_else(Type::unknown)
                }
            }
        };
        ASTNode::Literal(Box::new(LiteralNode { ty, ..node }))
    }

    fn visit_variable_declaration(&mut self, node: VariableDeclarationNode) -> ASTNode {
        let init = node.init.map(|i| self.visit(i));
        let ty = self.type_from_identifier(&node.declared_type);
        self.variable_types.insert(node.name.clone(), ty.clone());
        ASTNode::VariableDeclaration(Box::new(VariableDeclarationNode {
            name: node.name,
            declared_type: node.declared_type,
            init,
            is_mutable: node.is_mutable,
            ty,
        }))
    }

    fn visit_cast(&mut self, node: CastNode) -> ASTNode {
        let expr = self.visit(node.expr);
        let to_type = self.type_from_identifier(&node.target_type);
        if type_cast_kind(expr.ty(), &to_type) == CastKind::Impossible {
            return ASTNode::Error(Box::new(ErrorNode {
                message: format!("impossible cast from {} to {}", expr.ty(), to_type),
                ty: Type::unknown(),
            }));
        }
        ASTNode::Cast(Box::new(CastNode { target_type: node.target_type, expr, ty: to_type }))
    }

    fn visit_binary(&mut self, node: BinaryNode) -> ASTNode {
        let lhs = self.visit(node.lhs);
        let rhs = self.visit(node.rhs);
        let ty = self.resolve_binary_type(node.op, lhs.ty(), rhs.ty());
        ASTNode::Binary(Box::new(BinaryNode { op: node.op, lhs, rhs, ty }))
    }

    fn visit_unary(&mut self, node: UnaryNode) -> ASTNode {
        let expr = self.visit(node.expr);
        let ty = match node.op {
            Operator::LogicalNot => Type::Primitive(PrimitiveKind::Boolean),
            Operator::PreIncrement
            | Operator::PostIncrement
            | Operator::PreDecrement
            | Operator::PostDecrement => match expr.ty().as_primitive() {
                Some(
                    PrimitiveKind::Int32
                    | PrimitiveKind::Int64
                    | PrimitiveKind::Float32
                    | PrimitiveKind::Float64,
                ) => expr.ty().clone(),
                _ => Type::unknown(),
            },
            _ => Type::unknown(),
        };
        ASTNode::Unary(Box::new(UnaryNode { op: node.op, expr, ty }))
    }

    fn visit_if(&mut self, node: IfNode) -> ASTNode {
        let condition = self.visit(node.condition);
        let then_branch = self.visit(node.then_branch);
        let else_branch = self.visit(node.else_branch);
        ASTNode::If(Box::new(IfNode {
            condition,
            then_branch,
            else_branch,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_for_loop(&mut self, node: crate::node::ForLoopNode) -> ASTNode {
        let init = node.init.map(|n| self.visit(n));
        let condition = node.condition.map(|n| self.visit(n));
        let update = node.update.map(|n| self.visit(n));
        let body = self.visit(node.body);
        ASTNode::ForLoop(Box::new(crate::node::ForLoopNode {
            init,
            condition,
            update,
            body,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_foreach_loop(&mut self, node: crate::node::ForeachLoopNode) -> ASTNode {
        let iterable = self.visit(node.iterable);
        let body = self.visit(node.body);
        ASTNode::ForeachLoop(Box::new(crate::node::ForeachLoopNode {
            variable: node.variable,
            iterable,
            body,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_while(&mut self, node: crate::node::WhileNode) -> ASTNode {
        let condition = self.visit(node.condition);
        let body = self.visit(node.body);
        ASTNode::While(Box::new(crate::node::WhileNode {
            condition,
            body,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_module(&mut self, node: crate::node::ModuleNode) -> ASTNode {
        let statements = node.statements.into_iter().map(|s| self.visit(s)).collect();
        ASTNode::Module(Box::new(crate::node::ModuleNode {
            name: node.name,
            statements,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_block(&mut self, node: crate::node::BlockNode) -> ASTNode {
        let statements = node.statements.into_iter().map(|s| self.visit(s)).collect();
        ASTNode::Block(Box::new(crate::node::BlockNode {
            statements,
            ty: Type::Primitive(PrimitiveKind::Void),
        }))
    }

    fn visit_function_declaration(&mut self, node: FunctionDeclarationNode) -> ASTNode {
        let parameters = node.parameters.into_iter().map(|p| self.visit(p)).collect();
        let body = self.visit(node.body);
        let ty = self.type_from_identifier(&node.return_type);
        ASTNode::FunctionDeclaration(Box::new(FunctionDeclarationNode {
            name: node.name,
            return_type: node.return_type,
            parameters,
            body,
            ty,
        }))
    }

    fn visit_return(&mut self, node: crate::node::ReturnNode) -> ASTNode {
        let expression = node.expression.map(|e| self.visit(e));
        let ty = expression
            .as_ref()
            .map(|e| e.ty().clone())
            .unwrap_or(Type::Primitive(PrimitiveKind::Void));
        ASTNode::Return(Box::new(crate::node::ReturnNode { expression, ty }))
    }

    fn visit_function_call(&mut self, node: FunctionCallNode) -> ASTNode {
        let arguments = node.arguments.into_iter().map(|a| self.visit(a)).collect();
        let ty = self
            .function_return_types
            .get(&node.name)
            .cloned()
            .unwrap_or_else(Type::unknown);
        ASTNode::FunctionCall(Box::new(FunctionCallNode { name: node.name, arguments, ty }))
    }

    fn visit_struct_declaration(&mut self, node: StructDeclarationNode) -> ASTNode {
        let fields = node.fields.into_iter().map(|f| self.visit(f)).collect();
        let ty = self.type_from_identifier(&node.name);
        ASTNode::StructDeclaration(Box::new(StructDeclarationNode { name: node.name, fields, ty }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BlockNode, ModuleNode, VariableDeclarationNode as VarDecl};
    use crate::visitors::type_discoverer::TypeDiscovererVisitor;

    fn lit_identifier(name: &str) -> ASTNode {
        ASTNode::Literal(Box::new(LiteralNode {
            value: Value::String(name.into()),
            literal_type: LiteralType::Identifier,
            ty: Type::unknown(),
        }))
    }

    fn lit_i32(v: i64) -> ASTNode {
        ASTNode::Literal(Box::new(LiteralNode {
            value: Value::I64(v),
            literal_type: LiteralType::Int32,
            ty: Type::unknown(),
        }))
    }

    #[test]
    fn literal_widths_resolve_from_literal_type() {
        let (names, _) = (TypeDiscovererVisitor::new().names().clone(), ());
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        let mut resolver = TypeResolverVisitor::new(names, &module);
        let out = resolver.visit(lit_i32(5));
        assert_eq!(out.ty(), &Type::Primitive(PrimitiveKind::Int32));
    }

    #[test]
    fn identifier_literal_resolves_via_variable_environment() {
        let names = TypeDiscovererVisitor::new().names().clone();
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        let mut resolver = TypeResolverVisitor::new(names, &module);

        let decl = ASTNode::VariableDeclaration(Box::new(VarDecl {
            name: "index".into(),
            declared_type: "i32".into(),
            init: Some(lit_i32(0)),
            is_mutable: true,
            ty: Type::unknown(),
        }));
        resolver.visit(decl);

        let read = resolver.visit(lit_identifier("index"));
        assert_eq!(read.ty(), &Type::Primitive(PrimitiveKind::Int32));
    }

    #[test]
    fn binary_widens_to_common_implicit_type() {
        let names = TypeDiscovererVisitor::new().names().clone();
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        let mut resolver = TypeResolverVisitor::new(names, &module);
        let bin = ASTNode::Binary(Box::new(BinaryNode {
            op: Operator::Add,
            lhs: lit_i32(1),
            rhs: ASTNode::Literal(Box::new(LiteralNode {
                value: Value::I64(2),
                literal_type: LiteralType::Int64,
                ty: Type::unknown(),
            })),
            ty: Type::unknown(),
        }));
        let out = resolver.visit(bin);
        assert_eq!(out.ty(), &Type::Primitive(PrimitiveKind::Int64));
    }

    #[test]
    fn impossible_cast_becomes_error_node() {
        let names = TypeDiscovererVisitor::new().names().clone();
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        let mut resolver = TypeResolverVisitor::new(names, &module);
        let cast = ASTNode::Cast(Box::new(CastNode {
            target_type: "chr".into(),
            expr: lit_i32(1),
            ty: Type::unknown(),
        }));
        let out = resolver.visit(cast);
        assert!(out.is_error());
    }

    #[test]
    fn block_and_module_type_to_void() {
        let names = TypeDiscovererVisitor::new().names().clone();
        let module_shell = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        let mut resolver = TypeResolverVisitor::new(names, &module_shell);
        let block = ASTNode::Block(Box::new(BlockNode { statements: vec![], ty: Type::unknown() }));
        let out = resolver.visit(block);
        assert_eq!(out.ty(), &Type::Primitive(PrimitiveKind::Void));
    }
}
