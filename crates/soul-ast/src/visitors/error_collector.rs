//! Depth-bounded collection of `ErrorNode`s.

use crate::node::ASTNode;

/// One collected error: the depth it was found at (root is depth 0) and a
/// borrow of the offending node.
pub struct CollectedError<'a> {
    pub depth: u32,
    pub node: &'a ASTNode,
}

/// Walks an AST pre-order, recording every `ErrorNode` found at or above a
/// maximum depth. `d_max = None` means unbounded.
pub struct ErrorCollectorVisitor {
    d_max: Option<u32>,
}

impl ErrorCollectorVisitor {
    pub fn new(d_max: Option<u32>) -> Self {
        ErrorCollectorVisitor { d_max }
    }

    pub fn unbounded() -> Self {
        ErrorCollectorVisitor { d_max: None }
    }

    /// Runs the walk, returning the ordered list of `(depth, node)` pairs
    /// in pre-order, depth-first discovery order.
    pub fn collect<'a>(&self, root: &'a ASTNode) -> Vec<CollectedError<'a>> {
        let mut out = Vec::new();
        self.walk(root, 0, &mut out);
        out
    }

    pub fn is_valid(&self, root: &ASTNode) -> bool {
        self.collect(root).is_empty()
    }

    fn walk<'a>(&self, node: &'a ASTNode, depth: u32, out: &mut Vec<CollectedError<'a>>) {
        let within_bound = self.d_max.map(|max| depth <= max).unwrap_or(true);
        if within_bound && node.is_error() {
            out.push(CollectedError { depth, node });
        }
        for child in node.children() {
            self.walk(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BlockNode, ErrorNode, ModuleNode};
    use crate::types::Type;

    fn module_with_error() -> ASTNode {
        ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![ASTNode::Block(Box::new(BlockNode {
                statements: vec![ASTNode::Error(Box::new(ErrorNode {
                    message: "redefinition of type 'x'".into(),
                    ty: Type::unknown(),
                }))],
                ty: Type::unknown(),
            }))],
            ty: Type::unknown(),
        }))
    }

    #[test]
    fn finds_nested_error_and_reports_depth() {
        let root = module_with_error();
        let collector = ErrorCollectorVisitor::unbounded();
        let found = collector.collect(&root);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].depth, 2);
        assert!(!collector.is_valid(&root));
    }

    #[test]
    fn depth_bound_excludes_deeper_errors() {
        let root = module_with_error();
        let collector = ErrorCollectorVisitor::new(Some(1));
        assert!(collector.collect(&root).is_empty());
        assert!(collector.is_valid(&root));
    }

    #[test]
    fn valid_tree_has_no_errors() {
        let root = ASTNode::Module(Box::new(ModuleNode {
            name: "m".into(),
            statements: vec![],
            ty: Type::unknown(),
        }));
        assert!(ErrorCollectorVisitor::unbounded().is_valid(&root));
    }
}
