//! The resolution pass
//!
//!     A single walk over the AST binds every definition in the scope it belongs to and
//!     records every use site together with the scope it occurred in. Uses are resolved only
//!     after the walk, against the finished tree, so a `jump` may target a label defined
//!     further down the file.
//!
//!     Binding rules:
//!     - `define` and `default` bind variables in the global scope.
//!     - `label` binds a function in the enclosing scope and opens a child scope in which its
//!       parameters are variables.
//!     - `jump` and `call` targets are function uses; variable references in expressions are
//!       variable uses.
//!
//!     A dotted variable use (`persistent.seen`) resolves to the full name if it was
//!     defined, and otherwise to its first segment.

use super::error::ResolveError;
use super::scope::{ScopeId, ScopeTree, SymbolId, SymbolKind};
use crate::renpy::analysis::AnalysisOptions;
use crate::renpy::ast::{
    AssignmentOperation, Call, DefaultStatement, Define, Document, Identifier, Jump, Label,
    Range, VariableReference, Visitor,
};
use tracing::{debug, trace};

/// The outcome of resolving one document.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: ScopeTree,
    pub errors: Vec<ResolveError>,
}

struct Use {
    name: String,
    kind: SymbolKind,
    range: Range,
    scope: ScopeId,
}

struct Resolver {
    tree: ScopeTree,
    stack: Vec<ScopeId>,
    uses: Vec<Use>,
    errors: Vec<ResolveError>,
}

impl Resolver {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(self.tree.global())
    }

    fn bind(&mut self, scope: ScopeId, name: &str, kind: SymbolKind, range: Range) {
        match self.tree.bind(scope, name, kind, Some(range)) {
            Ok(_) => trace!(name, kind = kind.as_str(), "bound symbol"),
            Err(existing) => {
                if self.tree.claim_builtin(existing, range) {
                    return;
                }
                let first = self
                    .tree
                    .symbol(existing)
                    .and_then(|symbol| symbol.definition)
                    .unwrap_or(range);
                self.errors.push(ResolveError::DuplicateSymbol {
                    name: name.to_string(),
                    kind,
                    range,
                    first,
                });
            }
        }
    }

    fn bind_global_assignment(&mut self, assignment: Option<&AssignmentOperation>) {
        if let Some(target) = assignment.and_then(|assignment| assignment.target()) {
            let global = self.tree.global();
            self.bind(global, &target.name, SymbolKind::Variable, target.range);
        }
    }

    fn record_use(&mut self, name: &str, kind: SymbolKind, range: Range) {
        self.uses.push(Use {
            name: name.to_string(),
            kind,
            range,
            scope: self.current(),
        });
    }

    fn record_target(&mut self, target: Option<&Identifier>) {
        if let Some(target) = target {
            self.record_use(&target.name, SymbolKind::Function, target.range);
        }
    }

    fn lookup(&self, usage: &Use) -> Option<SymbolId> {
        let exact = self.tree.lookup(usage.scope, &usage.name, usage.kind);
        if exact.is_some() || usage.kind != SymbolKind::Variable {
            return exact;
        }
        let root = usage.name.split('.').next()?;
        if root == usage.name {
            return None;
        }
        self.tree.lookup(usage.scope, root, usage.kind)
    }

    fn finish(mut self, report_unresolved: bool) -> Resolution {
        let mut uses = std::mem::take(&mut self.uses);
        uses.sort_by_key(|usage| usage.range.start);
        for usage in &uses {
            match self.lookup(usage) {
                Some(id) => self.tree.add_reference(id, usage.range),
                None if report_unresolved => {
                    self.errors.push(ResolveError::UnresolvedReference {
                        name: usage.name.clone(),
                        kind: usage.kind,
                        range: usage.range,
                    })
                }
                None => {}
            }
        }
        self.errors.sort_by_key(|error| error.range().start);
        debug!(
            scopes = self.tree.scopes().len(),
            symbols = self.tree.symbols().len(),
            uses = uses.len(),
            errors = self.errors.len(),
            "resolved symbols"
        );
        Resolution {
            tree: self.tree,
            errors: self.errors,
        }
    }
}

impl Visitor for Resolver {
    fn visit_define(&mut self, define: &Define) {
        self.bind_global_assignment(define.assignment.as_ref());
    }

    fn visit_default(&mut self, default: &DefaultStatement) {
        self.bind_global_assignment(default.assignment.as_ref());
    }

    fn visit_label(&mut self, label: &Label) {
        let enclosing = self.current();
        if let Some(name) = &label.name {
            self.bind(enclosing, &name.name, SymbolKind::Function, name.range);
        }
        let scope = self.tree.open_scope(enclosing, label.range);
        self.stack.push(scope);
        for parameter in &label.parameters {
            self.bind(
                scope,
                &parameter.name.name,
                SymbolKind::Variable,
                parameter.name.range,
            );
        }
    }

    fn leave_label(&mut self, _label: &Label) {
        self.stack.pop();
    }

    fn visit_jump(&mut self, jump: &Jump) {
        self.record_target(jump.target.as_ref());
    }

    fn visit_call(&mut self, call: &Call) {
        self.record_target(call.target.as_ref());
    }

    fn visit_variable(&mut self, variable: &VariableReference) {
        self.record_use(&variable.name, SymbolKind::Variable, variable.range);
    }
}

/// Build the scope tree for `document` and link every use to its definition.
pub fn resolve(document: &Document, options: &AnalysisOptions) -> Resolution {
    let mut tree = ScopeTree::new(document.range);
    let global = tree.global();
    for builtin in &options.builtins {
        // duplicates in the builtin list are harmless
        let _ = tree.bind(global, builtin, SymbolKind::Variable, None);
    }
    let mut resolver = Resolver {
        tree,
        stack: Vec::new(),
        uses: Vec::new(),
        errors: Vec::new(),
    };
    document.walk(&mut resolver);
    resolver.finish(options.report_unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renpy::parsing::parse_document;

    fn resolve_source(source: &str) -> Resolution {
        let output = parse_document(source);
        resolve(&output.document, &AnalysisOptions::default())
    }

    fn names(resolution: &Resolution) -> Vec<&str> {
        resolution.errors.iter().map(|error| error.name()).collect()
    }

    #[test]
    fn test_forward_jump_resolves() {
        let resolution = resolve_source("label start:\n    jump ending\nlabel ending:\n    return\n");
        assert!(resolution.errors.is_empty(), "{:?}", resolution.errors);
        let ending = resolution
            .tree
            .symbols()
            .iter()
            .find(|symbol| symbol.name == "ending")
            .expect("ending");
        assert_eq!(ending.references.len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_first_definition() {
        let resolution = resolve_source("define x = 1\ndefault x = 2\n");
        assert_eq!(resolution.errors.len(), 1);
        match &resolution.errors[0] {
            ResolveError::DuplicateSymbol { first, range, .. } => {
                assert_eq!(first.start.line, 0);
                assert_eq!(range.start.line, 1);
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
        let x = resolution.tree.symbols().iter().find(|s| s.name == "x");
        assert_eq!(x.and_then(|s| s.definition).map(|r| r.start.line), Some(0));
    }

    #[test]
    fn test_unresolved_jump() {
        let resolution = resolve_source("label start:\n    jump nowhere\n");
        assert_eq!(names(&resolution), vec!["nowhere"]);
        assert!(matches!(
            resolution.errors[0],
            ResolveError::UnresolvedReference {
                kind: SymbolKind::Function,
                ..
            }
        ));
    }

    #[test]
    fn test_unresolved_reporting_can_be_disabled() {
        let output = parse_document("jump nowhere\n");
        let options = AnalysisOptions {
            report_unresolved: false,
            ..AnalysisOptions::default()
        };
        assert!(resolve(&output.document, &options).errors.is_empty());
    }

    #[test]
    fn test_parameters_are_scoped_to_label() {
        let source = "label greet(name):\n    return name\nlabel other:\n    return name\n";
        let resolution = resolve_source(source);
        assert_eq!(names(&resolution), vec!["name"]);
        assert_eq!(resolution.errors[0].range().start.line, 3);
    }

    #[test]
    fn test_nested_label_is_local_to_parent() {
        let source = "label outer:\n    label inner:\n        pass\n    jump inner\njump inner\n";
        let resolution = resolve_source(source);
        assert_eq!(names(&resolution), vec!["inner"]);
        assert_eq!(resolution.errors[0].range().start.line, 4);
    }

    #[test]
    fn test_dotted_use_falls_back_to_builtin_root() {
        let resolution = resolve_source("return persistent.seen\n");
        assert!(resolution.errors.is_empty());
        let persistent = resolution
            .tree
            .symbols()
            .iter()
            .find(|symbol| symbol.name == "persistent")
            .expect("builtin");
        assert!(persistent.is_builtin());
        assert_eq!(persistent.references.len(), 1);
    }

    #[test]
    fn test_define_claims_builtin_name() {
        let resolution = resolve_source("define config = 1\n");
        assert!(resolution.errors.is_empty());
        let config = resolution.tree.symbols().iter().find(|s| s.name == "config");
        assert!(config.is_some_and(|symbol| !symbol.is_builtin()));
    }

    #[test]
    fn test_references_in_source_order() {
        let source = "call a\nlabel a:\n    pass\njump a\ncall a\n";
        let resolution = resolve_source(source);
        let a = resolution.tree.symbols().iter().find(|s| s.name == "a").expect("a");
        let lines: Vec<usize> = a.references.iter().map(|r| r.start.line).collect();
        assert_eq!(lines, vec![0, 3, 4]);
    }
}
