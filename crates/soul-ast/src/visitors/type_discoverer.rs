//! Populates a name -> `Type` map from top-level struct declarations.

use indexmap::IndexMap;

use crate::node::{ASTNode, ErrorNode, ModuleNode, StructDeclarationNode, VariableDeclarationNode};
use crate::types::{PrimitiveKind, Type};

/// Builtin primitive type names seeded into every discovery pass.
const BUILTIN_NAMES: &[(&str, PrimitiveKind)] = &[
    ("bool", PrimitiveKind::Boolean),
    ("chr", PrimitiveKind::Char),
    ("f32", PrimitiveKind::Float32),
    ("f64", PrimitiveKind::Float64),
    ("i32", PrimitiveKind::Int32),
    ("i64", PrimitiveKind::Int64),
    ("str", PrimitiveKind::String),
    ("void", PrimitiveKind::Void),
];

/// A single pre-pass over a `Module`'s top-level statements. Only
/// top-level `StructDeclaration`s are considered -- ordering matters,
/// since a struct may reference only previously declared types.
pub struct TypeDiscovererVisitor {
    names: IndexMap<String, Type>,
}

impl Default for TypeDiscovererVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDiscovererVisitor {
    pub fn new() -> Self {
        let mut names = IndexMap::new();
        for (name, kind) in BUILTIN_NAMES {
            names.insert((*name).to_string(), Type::Primitive(*kind));
        }
        TypeDiscovererVisitor { names }
    }

    pub fn names(&self) -> &IndexMap<String, Type> {
        &self.names
    }

    /// Consumes a cloned `Module` AST node, returning the (possibly
    /// error-annotated) rewritten module and the resulting name table.
    pub fn run(mut self, module: ASTNode) -> (ASTNode, IndexMap<String, Type>) {
        let ASTNode::Module(module) = module else {
            return (module, self.names);
        };
        let module = *module;
        let statements = module
            .statements
            .into_iter()
            .map(|stmt| self.discover_statement(stmt))
            .collect();
        (
            ASTNode::Module(Box::new(ModuleNode {
                name: module.name,
                statements,
                ty: module.ty,
            })),
            self.names,
        )
    }

    fn discover_statement(&mut self, stmt: ASTNode) -> ASTNode {
        let ASTNode::StructDeclaration(decl) = stmt else {
            return stmt;
        };
        let decl = *decl;

        if self.names.contains_key(&decl.name) {
            return ASTNode::Error(Box::new(ErrorNode {
                message: format!("redefinition of type '{}'", decl.name),
                ty: Type::unknown(),
            }));
        }

        let mut tuple = Vec::new();
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            let ASTNode::VariableDeclaration(var) = field else {
                fields.push(field);
                continue;
            };
            let var = *var;
            match self.names.get(&var.declared_type) {
                Some(field_ty) => {
                    tuple.push(field_ty.clone());
                    fields.push(ASTNode::VariableDeclaration(Box::new(var)));
                }
                None => {
                    fields.push(ASTNode::Error(Box::new(ErrorNode {
                        message: format!(
                            "cannot resolve type '{}', because no such type exists",
                            var.declared_type
                        ),
                        ty: Type::unknown(),
                    })));
                }
            }
        }

        self.names
            .insert(decl.name.clone(), Type::Struct(tuple));

        ASTNode::StructDeclaration(Box::new(StructDeclarationNode {
            name: decl.name,
            fields,
            ty: decl.ty,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::VariableDeclarationNode as VarDecl;

    fn var(name: &str, declared_type: &str) -> ASTNode {
        ASTNode::VariableDeclaration(Box::new(VarDecl {
            name: name.into(),
            declared_type: declared_type.into(),
            init: None,
            is_mutable: false,
            ty: Type::unknown(),
        }))
    }

    fn struct_decl(name: &str, fields: Vec<ASTNode>) -> ASTNode {
        ASTNode::StructDeclaration(Box::new(StructDeclarationNode {
            name: name.into(),
            fields,
            ty: Type::unknown(),
        }))
    }

    #[test]
    fn seeds_builtin_primitives() {
        let d = TypeDiscovererVisitor::new();
        assert_eq!(
            d.names().get("i32"),
            Some(&Type::Primitive(PrimitiveKind::Int32))
        );
        assert_eq!(d.names().len(), BUILTIN_NAMES.len());
    }

    #[test]
    fn registers_struct_and_skips_unknown_fields() {
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![struct_decl(
                "point",
                vec![var("x", "i32"), var("y", "mystery")],
            )],
            ty: Type::unknown(),
        }));
        let discoverer = TypeDiscovererVisitor::new();
        let (rewritten, names) = discoverer.run(module);

        assert_eq!(
            names.get("point"),
            Some(&Type::Struct(vec![Type::Primitive(PrimitiveKind::Int32)]))
        );

        let ASTNode::Module(m) = rewritten else {
            panic!("expected module")
        };
        let ASTNode::StructDeclaration(decl) = &m.statements[0] else {
            panic!("expected struct decl")
        };
        assert!(decl.fields[0].is_error() == false);
        assert!(decl.fields[1].is_error());
    }

    #[test]
    fn redefinition_becomes_error_and_keeps_first_binding() {
        let module = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![
                struct_decl("dup", vec![var("x", "i32")]),
                struct_decl("dup", vec![var("y", "i64")]),
            ],
            ty: Type::unknown(),
        }));
        let (rewritten, names) = TypeDiscovererVisitor::new().run(module);
        assert_eq!(
            names.get("dup"),
            Some(&Type::Struct(vec![Type::Primitive(PrimitiveKind::Int32)]))
        );
        let ASTNode::Module(m) = rewritten else {
            panic!("expected module")
        };
        assert!(m.statements[1].is_error());
    }
}
