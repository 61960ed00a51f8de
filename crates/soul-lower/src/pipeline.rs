//! The top-level `compile` entry point: copy -> type_discover -> validate
//! -> type_resolve -> validate -> desugar -> validate -> lower. Grounded on
//! `lmlang-codegen/src/compiler.rs`'s orchestration of type-check-then-emit
//! as one composed pipeline function.

use soul_ast::{
    ASTNode, CopyVisitor, DesugarVisitor, ErrorCollectorVisitor, TypeDiscovererVisitor,
    TypeResolverVisitor,
};
use soul_ir::Module;

use crate::diagnostic::Diagnostic;
use crate::error::LowerError;
use crate::lower;

fn validate(node: &ASTNode) -> Result<(), Vec<Diagnostic>> {
    let collector = ErrorCollectorVisitor::unbounded();
    let errors = collector.collect(node);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.iter().map(Diagnostic::from_collected_error).collect())
    }
}

/// Runs the full pipeline over a module-root AST, producing a built IR
/// `Module` or the diagnostics collected at whichever pass first failed.
pub fn compile(module_root: &ASTNode) -> Result<Module, Vec<Diagnostic>> {
    let copied = CopyVisitor::copy(module_root);

    let (discovered, names) = TypeDiscovererVisitor::new().run(copied);
    validate(&discovered)?;

    let resolver = TypeResolverVisitor::new(names, &discovered);
    let resolved = resolver.run(discovered);
    validate(&resolved)?;

    let desugared = DesugarVisitor::desugar(resolved);
    validate(&desugared)?;

    lower::lower(&desugared).map_err(|e: LowerError| vec![Diagnostic::internal(e.to_string())])
}
