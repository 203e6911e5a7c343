use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw format code as it travels in Bind and RowDescription messages.
pub type FormatCode = i16;

pub const TEXT_FORMAT_CODE: FormatCode = 0;
pub const BINARY_FORMAT_CODE: FormatCode = 1;

/// Wire representation negotiated for a single parameter or result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Text,
    Binary,
}

impl Format {
    /// Returns `None` for any code the protocol does not define.
    pub fn from_code(code: FormatCode) -> Option<Self> {
        match code {
            TEXT_FORMAT_CODE => Some(Format::Text),
            BINARY_FORMAT_CODE => Some(Format::Binary),
            _ => None,
        }
    }

    pub fn code(self) -> FormatCode {
        match self {
            Format::Text => TEXT_FORMAT_CODE,
            Format::Binary => BINARY_FORMAT_CODE,
        }
    }
}

impl From<Format> for FormatCode {
    fn from(format: Format) -> Self {
        format.code()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Binary => write!(f, "binary"),
        }
    }
}
