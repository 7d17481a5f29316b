// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use itertools::Itertools;
use vslc_symbol::{Symbol, SymbolArena, SymbolId};
use vslc_utils::bug;

use crate::scope::Scope;

/// Stack of lexical scopes over an arena of symbols.
///
/// The outermost scope has depth 0. Popping a scope forgets its names but
/// keeps its symbols alive, since bound tree nodes still point at them.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    arena: SymbolArena,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope_enter(&mut self) {
        self.scopes.push(Scope::default());
        tracing::trace!(depth = self.scopes.len() - 1, "scope entered");
    }

    pub fn scope_exit(&mut self) {
        if self.scopes.pop().is_none() {
            bug!("attempted to leave a scope while none is open");
        }
        tracing::trace!(open = self.scopes.len(), "scope exited");
    }

    /// Depth of the innermost open scope, or `None` when no scope is open.
    pub fn depth(&self) -> Option<usize> {
        self.scopes.len().checked_sub(1)
    }

    /// Number of currently open scopes.
    pub fn open_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `name` in the innermost scope, stamping the symbol with that
    /// scope's depth. Redeclaring a name in the same scope shadows the
    /// earlier declaration for all later lookups.
    pub fn insert(&mut self, name: &str, mut sym: Symbol) -> SymbolId {
        let Some(depth) = self.depth() else {
            bug!("cannot declare '{name}' outside of any scope");
        };
        sym.depth = depth;
        let id = self.arena.alloc(sym);

        let scope = &mut self.scopes[depth];
        if let Some(previous) = scope.add_sym(name, id) {
            tracing::warn!(
                name,
                depth,
                previous = previous.0,
                "redeclaration shadows an earlier declaration in the same scope"
            );
        }
        tracing::trace!(name, depth, id = id.0, "symbol inserted");
        id
    }

    /// Searches from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get_sym(name))
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.arena.get(id)
    }

    /// Every symbol ever declared, including those of closed scopes.
    pub fn symbols(&self) -> &SymbolArena {
        &self.arena
    }

    /// Human-readable listing of all declared symbols in declaration order.
    pub fn dump(&self) -> String {
        self.arena
            .iter_enumerated()
            .map(|(id, sym)| format!("#{:<4}{}{}", id.0, "  ".repeat(sym.depth), sym))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outwards() {
        let mut table = SymbolTable::new();
        table.scope_enter();
        let f = table.insert("f", Symbol::function("f"));
        table.scope_enter();
        let x = table.insert("x", Symbol::local("x", -4));

        assert_eq!(table.lookup("x"), Some(x));
        assert_eq!(table.lookup("f"), Some(f));
        assert_eq!(table.lookup("y"), None);
    }

    #[test]
    fn test_depth_is_stamped_on_insert() {
        let mut table = SymbolTable::new();
        assert_eq!(table.depth(), None);

        table.scope_enter();
        let f = table.insert("f", Symbol::function("f"));
        table.scope_enter();
        table.scope_enter();
        let x = table.insert("x", Symbol::local("x", -4));

        assert_eq!(table.get(f).unwrap().depth, 0);
        assert_eq!(table.get(x).unwrap().depth, 2);
    }

    #[test]
    fn test_nested_scope_shadows_outer() {
        let mut table = SymbolTable::new();
        table.scope_enter();
        let outer = table.insert("x", Symbol::local("x", -4));

        table.scope_enter();
        let inner = table.insert("x", Symbol::local("x", -8));
        assert_eq!(table.lookup("x"), Some(inner));

        table.scope_exit();
        assert_eq!(table.lookup("x"), Some(outer));
    }

    #[test]
    fn test_redeclaration_in_same_scope_wins() {
        let mut table = SymbolTable::new();
        table.scope_enter();
        let first = table.insert("x", Symbol::local("x", -4));
        let second = table.insert("x", Symbol::local("x", -8));

        assert_ne!(first, second);
        assert_eq!(table.lookup("x"), Some(second));
        // the shadowed symbol is still reachable by id
        assert_eq!(table.get(first).unwrap().stack_offset, -4);
    }

    #[test]
    fn test_symbols_outlive_their_scope() {
        let mut table = SymbolTable::new();
        table.scope_enter();
        table.scope_enter();
        let x = table.insert("x", Symbol::local("x", -4));
        table.scope_exit();
        table.scope_exit();

        assert_eq!(table.open_scopes(), 0);
        assert_eq!(table.lookup("x"), None);
        assert_eq!(table.get(x).unwrap().name, "x");
        assert_eq!(table.symbols().len(), 1);
    }

    #[test]
    fn test_dump_lists_symbols_in_order() {
        let mut table = SymbolTable::new();
        table.scope_enter();
        table.insert("main", Symbol::function("main"));
        table.scope_enter();
        table.insert("a", Symbol::parameter("a", 8));

        let dump = table.dump();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("main [function] offset=0 depth=0 label=main"));
        assert!(lines[1].contains("a [param] offset=8 depth=1"));
    }
}
