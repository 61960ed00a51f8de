#[cfg(test)]
pub(crate) mod arb;
pub mod node;
pub mod stringify;
pub mod types;
pub mod visitor;
pub mod visitors;

pub use node::{
    ASTNode, BinaryNode, BlockNode, CastNode, ErrorNode, ForLoopNode, ForeachLoopNode,
    FunctionCallNode, FunctionDeclarationNode, IfNode, LiteralNode, LiteralType,
    LoopControlKind, LoopControlNode, ModuleNode, ReturnNode, StructDeclarationNode, UnaryNode,
    VariableDeclarationNode, WhileNode,
};
pub use types::{CastKind, Operator, PrimitiveKind, Type, Value, cast_kind, common_implicit_type, type_cast_kind};
pub use visitor::Visitor;
pub use visitors::copy::CopyVisitor;
pub use visitors::desugar::DesugarVisitor;
pub use visitors::error_collector::{CollectedError, ErrorCollectorVisitor};
pub use visitors::type_discoverer::TypeDiscovererVisitor;
pub use visitors::type_resolver::TypeResolverVisitor;
