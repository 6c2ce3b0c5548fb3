//! Scope & Symbol Table (§4.2).
//!
//! A `ScopeTree` is an arena of `Rib`s. Each `Rib` holds an insertion-ordered
//! `name -> DefId` map, a parent link, and the bookkeeping the emitter needs
//! (`locals`, a running definition count used for `out_id` generation).

use faxc_util::{DefId, Idx, IndexVec, Symbol};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RibId(pub u32);

impl Idx for RibId {
    fn from_usize(idx: usize) -> Self {
        RibId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single lexical scope.
#[derive(Debug, Default)]
pub struct Rib {
    bindings: IndexMap<Symbol, DefId>,
    pub parent: Option<RibId>,
    /// Output ids the emitter should treat as locals declared in this scope.
    pub locals: Vec<String>,
}

/// Arena of scopes, extended per §4.2 with `get`/`define`/`count`/`add_local`
/// beyond what a plain resolve-by-walking-parents table needs.
pub struct ScopeTree {
    ribs: IndexVec<RibId, Rib>,
    pub current: RibId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib::default());
        Self { ribs, current: root }
    }

    pub fn enter_scope(&mut self) -> RibId {
        let id = self.ribs.push(Rib {
            parent: Some(self.current),
            ..Rib::default()
        });
        self.current = id;
        id
    }

    pub fn enter_child_of(&mut self, parent: RibId) -> RibId {
        let id = self.ribs.push(Rib {
            parent: Some(parent),
            ..Rib::default()
        });
        self.current = id;
        id
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    pub fn set_current(&mut self, id: RibId) {
        self.current = id;
    }

    /// Local-only lookup (§4.2 `get`).
    pub fn get(&self, scope: RibId, name: Symbol) -> Option<DefId> {
        self.ribs[scope].bindings.get(&name).copied()
    }

    /// Lookup that walks the enclosing chain (§4.2 `resolve`).
    pub fn resolve(&self, scope: RibId, name: Symbol) -> Option<DefId> {
        let mut current = scope;
        loop {
            if let Some(id) = self.get(current, name) {
                return Some(id);
            }
            match self.ribs[current].parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Local-only insert, fails if `name` is already present locally (§4.2).
    pub fn define(&mut self, scope: RibId, name: Symbol, def_id: DefId) -> Result<(), DefId> {
        let rib = &mut self.ribs[scope];
        if let Some(&existing) = rib.bindings.get(&name) {
            return Err(existing);
        }
        rib.bindings.insert(name, def_id);
        Ok(())
    }

    /// Number of symbols defined so far in `scope` (§4.2 `count`, used for
    /// `out_id` generation).
    pub fn count(&self, scope: RibId) -> usize {
        self.ribs[scope].bindings.len()
    }

    /// Record an emitter-visible local's output id (§4.2 `add_local`).
    pub fn add_local(&mut self, scope: RibId, out_id: impl Into<String>) {
        self.ribs[scope].locals.push(out_id.into());
    }

    pub fn locals(&self, scope: RibId) -> &[String] {
        &self.ribs[scope].locals
    }

    pub fn depth(&self, scope: RibId) -> usize {
        let mut current = scope;
        let mut depth = 0;
        while let Some(parent) = self.ribs[current].parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    pub fn global(&self) -> RibId {
        RibId(0)
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
