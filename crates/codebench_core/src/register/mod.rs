//! Debugger register values, metadata and grouping.
//!
//! [`RegisterValue`] is the raw 128-bit storage with radix-aware parsing and
//! formatting. [`Register`] attaches debugger metadata and derives the
//! sub-views shown for vector-like registers, and [`RegisterFile`] tracks
//! registers by group across debugger stops.

mod file;
mod layout;
mod value;


pub use file::{RegisterEntry, RegisterFile, RegisterGroup};
pub use layout::{sub_type_name, Register, SubView};
pub use value::RegisterValue;

use crate::CoreError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Interpretation of a register's raw bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    Integer,
    Float,
    Vector,
    #[default]
    Unknown,
}

/// Textual radix used to display or edit a register value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterFormat {
    Binary,
    Octal,
    Decimal,
    SignedDecimal,
    #[default]
    Hexadecimal,
    Character,
}

impl RegisterKind {
    fn label(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Float => "float",
            Self::Vector => "vector",
            Self::Unknown => "unknown",
        }
    }
}

impl RegisterFormat {
    /// Every format, in menu order.
    pub const ALL: [RegisterFormat; 6] = [
        Self::Hexadecimal,
        Self::Decimal,
        Self::SignedDecimal,
        Self::Octal,
        Self::Binary,
        Self::Character,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Octal => "oct",
            Self::Decimal => "dec",
            Self::SignedDecimal => "sdec",
            Self::Hexadecimal => "hex",
            Self::Character => "char",
        }
    }

    /// Single-letter suffix used in sub-view names (`[i4x]`).
    pub fn suffix(self) -> char {
        match self {
            Self::Binary => 'b',
            Self::Octal => 'o',
            Self::Decimal => 'u',
            Self::SignedDecimal => 's',
            Self::Hexadecimal => 'x',
            Self::Character => 'c',
        }
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for RegisterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RegisterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "vec" | "vector" => Ok(Self::Vector),
            "unknown" => Ok(Self::Unknown),
            _ => Err(CoreError::UnknownName {
                what: "register kind",
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for RegisterFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bin" | "binary" => Ok(Self::Binary),
            "oct" | "octal" => Ok(Self::Octal),
            "dec" | "decimal" | "unsigned" => Ok(Self::Decimal),
            "sdec" | "signed" | "signed-decimal" => Ok(Self::SignedDecimal),
            "hex" | "hexadecimal" => Ok(Self::Hexadecimal),
            "char" | "character" => Ok(Self::Character),
            _ => Err(CoreError::UnknownName {
                what: "register format",
                name: s.to_string(),
            }),
        }
    }
}
