use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// On-disk serialization format for a stored context.
///
/// Each format maps to exactly one file extension, so a context name can have
/// at most one file per format under the store's base directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Versioned, checksummed binary envelope. Can hold any [`Value`](crate::Value).
    #[serde(alias = "bin", alias = "pickle")]
    Binary,
    /// Human-readable JSON. Limited to strings, numbers, lists and string-keyed maps.
    Json,
}

impl Format {
    /// Every format, in lookup-table order.
    pub const ALL: [Format; 2] = [Format::Binary, Format::Json];

    /// File extension used for this format (without the dot).
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }

    /// Position of this format in [`Format::ALL`] and in codec tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Binary => 0,
            Self::Json => 1,
        }
    }

    /// Resolve a file extension back to its format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::Binary
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Format {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" | "bin" | "pickle" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            other => Err(TypeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Conversion into a [`Format`], deferred until the format is actually needed.
///
/// Store operations take `impl IntoFormat` so that callers may pass either a
/// typed [`Format`] or a format name. A memory hit on load never resolves the
/// format, so an unknown name only fails when disk is consulted.
pub trait IntoFormat {
    fn into_format(self) -> Result<Format, TypeError>;
}

impl IntoFormat for Format {
    fn into_format(self) -> Result<Format, TypeError> {
        Ok(self)
    }
}

impl IntoFormat for &str {
    fn into_format(self) -> Result<Format, TypeError> {
        self.parse()
    }
}

impl IntoFormat for String {
    fn into_format(self) -> Result<Format, TypeError> {
        self.as_str().parse()
    }
}

impl IntoFormat for &String {
    fn into_format(self) -> Result<Format, TypeError> {
        self.as_str().parse()
    }
}
