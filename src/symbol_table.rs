//! String interning for the RAM domain.
//!
//! Maps strings to dense integer ids so string constants can live in the
//! flat RAM domain. The table is logically append-only: interning never
//! invalidates an id, so a failed lowering leaves nothing to undo. The
//! mutex makes a shared `&SymbolTable` safe to intern through when the
//! surrounding compiler lowers clauses in parallel.

use crate::ram::RamDomain;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct Inner {
    str_to_id: FxHashMap<Box<str>, RamDomain>,
    id_to_str: Vec<Box<str>>,
}

/// Append-only two-way table between strings and their interned ids
#[derive(Debug, Default)]
pub struct SymbolTable {
    inner: Mutex<Inner>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Intern a string, returning its unique id
    pub fn intern(&self, text: &str) -> RamDomain {
        let mut inner = self.inner.lock();
        if let Some(&id) = inner.str_to_id.get(text) {
            return id;
        }
        let id = inner.id_to_str.len() as RamDomain;
        let boxed: Box<str> = text.into();
        inner.str_to_id.insert(boxed.clone(), id);
        inner.id_to_str.push(boxed);
        id
    }

    /// Look up the string for an id, if it was interned
    pub fn resolve(&self, id: RamDomain) -> Option<String> {
        let inner = self.inner.lock();
        usize::try_from(id)
            .ok()
            .and_then(|idx| inner.id_to_str.get(idx))
            .map(|s| s.to_string())
    }

    /// Number of interned symbols
    pub fn len(&self) -> usize {
        self.inner.lock().id_to_str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
