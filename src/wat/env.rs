//! Identifier environment: one dense index space per kind of definition.
//!
//! Definitions are allocated indices in order of appearance. A definition may
//! carry a symbolic name, which later references resolve to the first index
//! bound to it.

use std::fmt;

/// The kind of definition an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexSpace {
    Type,
    Func,
    Table,
    Memory,
    Global,
    Elem,
    Data,
}

impl IndexSpace {
    pub const ALL: [IndexSpace; 7] = [
        IndexSpace::Type,
        IndexSpace::Func,
        IndexSpace::Table,
        IndexSpace::Memory,
        IndexSpace::Global,
        IndexSpace::Elem,
        IndexSpace::Data,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            IndexSpace::Type => "type",
            IndexSpace::Func => "function",
            IndexSpace::Table => "table",
            IndexSpace::Memory => "memory",
            IndexSpace::Global => "global",
            IndexSpace::Elem => "elem segment",
            IndexSpace::Data => "data segment",
        }
    }
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference to a definition, either numeric or symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Index(u32),
    Name(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Index(idx) => write!(f, "{}", idx),
            Identifier::Name(name) => write!(f, "${}", name),
        }
    }
}

impl From<u32> for Identifier {
    fn from(idx: u32) -> Self {
        Identifier::Index(idx)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::Name(name.to_string())
    }
}

/// Per-module map from identifiers to dense indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierEnvironment {
    spaces: [Vec<Option<String>>; 7],
}

impl IdentifierEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition to `space` and return its index.
    pub fn allocate(&mut self, space: IndexSpace, name: Option<&str>) -> u32 {
        let entries = &mut self.spaces[space.slot()];
        let idx = entries.len() as u32;
        entries.push(name.map(str::to_string));
        idx
    }

    /// Resolve an identifier within `space`.
    ///
    /// Numeric indices are returned unchanged without a bounds check; names
    /// resolve to the first index bound to them.
    pub fn resolve(&self, space: IndexSpace, ident: &Identifier) -> Option<u32> {
        match ident {
            Identifier::Index(idx) => Some(*idx),
            Identifier::Name(name) => self.spaces[space.slot()]
                .iter()
                .position(|entry| entry.as_deref() == Some(name.as_str()))
                .map(|idx| idx as u32),
        }
    }

    /// The name bound to `index`, if it has one.
    pub fn name(&self, space: IndexSpace, index: u32) -> Option<&str> {
        self.spaces[space.slot()].get(index as usize)?.as_deref()
    }

    /// Number of indices allocated in `space`.
    pub fn len(&self, space: IndexSpace) -> usize {
        self.spaces[space.slot()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.iter().all(Vec::is_empty)
    }
}
