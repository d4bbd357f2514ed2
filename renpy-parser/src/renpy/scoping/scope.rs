//! Scopes and symbols
//!
//!     Scopes live in an arena owned by [`ScopeTree`]; a scope refers to its parent by
//!     [`ScopeId`], so the tree has no reference cycles and is immutable once resolution has
//!     finished. Symbols live in a second arena and scopes map names to [`SymbolId`]s.
//!
//!     Each scope has two namespaces: functions (labels) and variables (everything else).
//!     A name can be bound at most once per namespace per scope.

use crate::renpy::ast::range::{Position, Range};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
        }
    }

    fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    /// `None` for builtins, which have no definition in the document.
    pub definition: Option<Range>,
    /// Use sites in source order.
    pub references: Vec<Range>,
}

impl Symbol {
    pub fn is_builtin(&self) -> bool {
        self.definition.is_none()
    }

    /// True if `position` is on the definition or on any reference.
    pub fn touches(&self, position: Position) -> bool {
        self.definition
            .iter()
            .chain(self.references.iter())
            .any(|range| range.contains(position))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub range: Range,
    variables: HashMap<String, SymbolId>,
    functions: HashMap<String, SymbolId>,
}

impl Scope {
    fn namespace(&self, kind: SymbolKind) -> &HashMap<String, SymbolId> {
        if kind.is_callable() {
            &self.functions
        } else {
            &self.variables
        }
    }

    fn namespace_mut(&mut self, kind: SymbolKind) -> &mut HashMap<String, SymbolId> {
        if kind.is_callable() {
            &mut self.functions
        } else {
            &mut self.variables
        }
    }

    /// The symbol bound to `name` in this scope only.
    pub fn get(&self, name: &str, kind: SymbolKind) -> Option<SymbolId> {
        self.namespace(kind).get(name).copied()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTree {
    /// A tree holding only the global scope, spanning `range`.
    pub fn new(range: Range) -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId(0),
                parent: None,
                range,
                variables: HashMap::new(),
                functions: HashMap::new(),
            }],
            symbols: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn open_scope(&mut self, parent: ScopeId, range: Range) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            range,
            variables: HashMap::new(),
            functions: HashMap::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// All symbols in definition order, builtins first.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Bind `name` in `scope`. If the name is already bound there, nothing changes and the
    /// existing symbol is returned as the error.
    pub fn bind(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        definition: Option<Range>,
    ) -> Result<SymbolId, SymbolId> {
        let id = SymbolId(self.symbols.len());
        let Some(target) = self.scopes.get_mut(scope.0) else {
            return Err(id);
        };
        if let Some(existing) = target.get(name, kind) {
            return Err(existing);
        }
        target.namespace_mut(kind).insert(name.to_string(), id);
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            scope,
            definition,
            references: Vec::new(),
        });
        Ok(id)
    }

    /// Give a builtin symbol its first in-document definition.
    pub(crate) fn claim_builtin(&mut self, id: SymbolId, definition: Range) -> bool {
        match self.symbols.get_mut(id.0) {
            Some(symbol) if symbol.is_builtin() => {
                symbol.definition = Some(definition);
                true
            }
            _ => false,
        }
    }

    /// Look `name` up from `scope` outwards, one parent at a time.
    pub fn lookup(&self, scope: ScopeId, name: &str, kind: SymbolKind) -> Option<SymbolId> {
        let mut current = self.scope(scope);
        while let Some(candidate) = current {
            if let Some(id) = candidate.get(name, kind) {
                return Some(id);
            }
            current = candidate.parent.and_then(|parent| self.scope(parent));
        }
        None
    }

    pub fn add_reference(&mut self, id: SymbolId, range: Range) {
        if let Some(symbol) = self.symbols.get_mut(id.0) {
            symbol.references.push(range);
        }
    }

    /// The symbol defined or referenced at `position`.
    pub fn symbol_at(&self, position: Position) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.touches(position))
    }

    /// The innermost scope whose range contains `position`.
    pub fn scope_at(&self, position: Position) -> ScopeId {
        self.scopes
            .iter()
            .filter(|scope| scope.range.contains(position))
            .max_by_key(|scope| scope.range.start)
            .map(|scope| scope.id)
            .unwrap_or(self.global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> Range {
        Range::new(Position::new(0, start, start), Position::new(0, end, end))
    }

    #[test]
    fn test_bind_twice_in_same_scope_fails() {
        let mut tree = ScopeTree::new(range(0, 100));
        let global = tree.global();
        let first = tree.bind(global, "x", SymbolKind::Variable, Some(range(0, 1)));
        let second = tree.bind(global, "x", SymbolKind::Variable, Some(range(5, 6)));
        assert_eq!(second, Err(first.expect("first binding")));
        assert_eq!(tree.symbols().len(), 1);
        assert_eq!(tree.symbols()[0].definition, Some(range(0, 1)));
    }

    #[test]
    fn test_namespaces_are_separate() {
        let mut tree = ScopeTree::new(range(0, 100));
        let global = tree.global();
        assert!(tree.bind(global, "start", SymbolKind::Variable, None).is_ok());
        assert!(tree.bind(global, "start", SymbolKind::Function, None).is_ok());
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let mut tree = ScopeTree::new(range(0, 100));
        let global = tree.global();
        let outer = tree.open_scope(global, range(10, 90));
        let inner = tree.open_scope(outer, range(20, 80));
        let x = tree
            .bind(global, "x", SymbolKind::Variable, Some(range(0, 1)))
            .expect("x");
        let shadow = tree
            .bind(outer, "x", SymbolKind::Variable, Some(range(11, 12)))
            .expect("shadow");
        assert_eq!(tree.lookup(inner, "x", SymbolKind::Variable), Some(shadow));
        assert_eq!(tree.lookup(global, "x", SymbolKind::Variable), Some(x));
        assert_eq!(tree.lookup(inner, "y", SymbolKind::Variable), None);
        assert_eq!(tree.scope_at(Position::new(0, 30, 30)), inner);
        assert_eq!(tree.scope_at(Position::new(0, 95, 95)), global);
    }

    #[test]
    fn test_symbol_at_definition_and_reference() {
        let mut tree = ScopeTree::new(range(0, 100));
        let global = tree.global();
        let id = tree
            .bind(global, "start", SymbolKind::Function, Some(range(6, 11)))
            .expect("start");
        tree.add_reference(id, range(40, 45));
        let at_definition = tree.symbol_at(Position::new(0, 8, 8)).map(|s| &s.name);
        let at_reference = tree.symbol_at(Position::new(0, 42, 42)).map(|s| &s.name);
        assert_eq!(at_definition, Some(&"start".to_string()));
        assert_eq!(at_reference, Some(&"start".to_string()));
        assert!(tree.symbol_at(Position::new(0, 30, 30)).is_none());
    }
}
