//! String interner producing [`Name`] handles.
//!
//! Single-shard: the core is single-threaded by contract, so there is no
//! need for sharded or lock-protected interning. State is owned by the
//! interpreter session, never stored in a process-wide global.

use rustc_hash::FxHashMap;

use crate::Name;

/// Interns strings to compact [`Name`] handles.
///
/// `Name::EMPTY` is pre-interned at index 0.
#[derive(Debug, Default)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    /// Create an interner with the empty string pre-interned.
    pub fn new() -> Self {
        let mut interner = StringInterner {
            map: FxHashMap::default(),
            strings: Vec::new(),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        interner
    }

    /// Intern a string, returning its handle.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.map.get(text) {
            return name;
        }
        let name = Name::from_raw(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        self.strings.push(text.into());
        self.map.insert(text.into(), name);
        name
    }

    /// Look up the text for a handle.
    ///
    /// Returns the empty string for handles this interner never produced.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.index()).map_or("", |s| s.as_ref())
    }

    /// Number of interned strings, not counting the pre-interned empty
    /// string.
    pub fn len(&self) -> usize {
        self.strings.len().saturating_sub(1)
    }

    /// Whether no strings beyond the pre-interned empty string exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
