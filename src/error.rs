use crate::args::ArgKind;

/// Contract violations reported by the formatter.
///
/// Each of these means the caller (normally the decode layer) handed over a
/// format string and argument list that do not belong together, or produced
/// a line longer than the output buffer can hold.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("output buffer overflow: {needed} bytes needed, capacity is {capacity}")]
    Overflow { capacity: usize, needed: usize },
    #[error("directive '{directive}' at offset {offset} expects {expected}, none left")]
    MissingArgument {
        directive: char,
        offset: usize,
        expected: ArgKind,
    },
    #[error("directive '{directive}' at offset {offset} expects {expected}, got {found}")]
    ArgumentMismatch {
        directive: char,
        offset: usize,
        expected: ArgKind,
        found: ArgKind,
    },
    #[error("{count} argument(s) left over after the format string")]
    TrailingArguments { count: usize },
}

/// A string that is not one of the fixed names of a closed enumeration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} name {name:?}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
}

pub type Result<T> = std::result::Result<T, FormatError>;
