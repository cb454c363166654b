//! Node and edge identifiers backed by a global string interner.
//!
//! Identifiers in diagram content are arbitrary strings (`"task-1712000000000"`,
//! `"erd-edge-1712000000000-k3j9a2"`). The [`Id`] type interns them so that
//! ids are `Copy` and cheap to hash and compare inside the graph store.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier of a node or an edge.
///
/// # Examples
///
/// ```
/// use flowboard_core::identifier::Id;
///
/// let task = Id::new("task-1");
/// assert_eq!(task, "task-1");
///
/// let generated = Id::fresh("relationship");
/// assert!(generated.to_string().starts_with("relationship-"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Generates a new identifier of the form `<prefix>-<unix millis>-<suffix>`,
    /// where the suffix is six random lowercase alphanumerics.
    ///
    /// The result is unique with overwhelming probability; callers that need a
    /// hard guarantee check it against their own id set.
    pub fn fresh(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let suffix: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(6)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        Self::new(&format!("{prefix}-{millis}-{suffix}"))
    }

    /// Returns an owned copy of the identifier text.
    pub fn to_name(self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_name())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_name())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns() {
        let id1 = Id::new("pool-1");
        let id2 = Id::new("pool-1");
        let id3 = Id::new("lane-1");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "pool-1");
        assert_eq!(id1.to_string(), "pool-1");
    }

    #[test]
    fn test_fresh_ids_differ() {
        let a = Id::fresh("node");
        let b = Id::fresh("node");
        assert_ne!(a, b);

        let text = a.to_name();
        let parts: Vec<&str> = text.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "node");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = Id::new("erd-edge-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"erd-edge-7\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
