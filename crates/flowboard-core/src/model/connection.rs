//! Connection kinds.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The semantic label of an edge; selects its visual descriptor.
///
/// Wire names follow the editor's `flowType` values. Short aliases
/// (`primary`, `conditional`, `message`, `compensation`, `structural`) are
/// accepted when parsing. Unrecognized names are preserved as
/// [`ConnectionKind::Other`] and styled like [`ConnectionKind::PRIMARY`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Sequence,
    Default,
    Conditional,
    Message,
    Association,
    DataAssociation,
    Compensation,
    /// Entity-relationship structure line.
    Structural,
    Other(String),
}

impl ConnectionKind {
    /// The kind used when none is chosen.
    pub const PRIMARY: ConnectionKind = ConnectionKind::Sequence;

    /// Every kind with its own descriptor.
    pub const KNOWN: [ConnectionKind; 8] = [
        ConnectionKind::Sequence,
        ConnectionKind::Default,
        ConnectionKind::Conditional,
        ConnectionKind::Message,
        ConnectionKind::Association,
        ConnectionKind::DataAssociation,
        ConnectionKind::Compensation,
        ConnectionKind::Structural,
    ];

    /// Returns the wire name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Sequence => "sequence-flow",
            Self::Default => "default-flow",
            Self::Conditional => "conditional-flow",
            Self::Message => "message-flow",
            Self::Association => "association",
            Self::DataAssociation => "data-association",
            Self::Compensation => "compensation-flow",
            Self::Structural => "erd",
            Self::Other(name) => name,
        }
    }

    /// Returns true if this kind has no descriptor of its own.
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl FromStr for ConnectionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sequence-flow" | "primary" | "sequence" => Self::Sequence,
            "default-flow" | "default" => Self::Default,
            "conditional-flow" | "conditional" => Self::Conditional,
            "message-flow" | "message" => Self::Message,
            "association" => Self::Association,
            "data-association" => Self::DataAssociation,
            "compensation-flow" | "compensation" => Self::Compensation,
            "erd" | "structural" | "relationship" => Self::Structural,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for ConnectionKind {
    fn from(name: &str) -> Self {
        let Ok(kind) = name.parse::<ConnectionKind>();
        kind
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ConnectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ConnectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}
