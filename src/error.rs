use std::error;
use std::fmt;




#[derive(Debug, Clone, PartialEq)]


/**
 * Error to represent invalid arguments, unsupported grid mappings, and
 * arrays whose shape disagrees with the grid they are used with.
 */
pub enum Error {
    InvalidChoice {
        name: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    UnsupportedMapping {
        attribute: String,
        reason: &'static str,
    },
    InvalidOutput {
        constraint: &'static str,
        expected: String,
        found: String,
    },
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    IndexOutOfRange {
        what: String,
        index: i64,
        len: usize,
    },
    UnknownField {
        at: &'static str,
        name: String,
    },
    FieldExists {
        at: &'static str,
        name: String,
    },
    InvalidGrid(String),
}




// ============================================================================
impl Error {

    pub(crate) fn missing_table(attribute: impl Into<String>) -> Self {
        Self::UnsupportedMapping {
            attribute: attribute.into(),
            reason: "grid is missing",
        }
    }

    pub(crate) fn shape_mismatch(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            InvalidChoice { name, value, allowed } => {
                write!(fmt, "invalid value for {}: {:?} (expected one of {})", name, value, allowed.join(", "))
            }
            UnsupportedMapping { attribute, reason } => {
                write!(fmt, "unsupported mapping: {} {}", reason, attribute)
            }
            InvalidOutput { constraint, expected, found } => {
                write!(fmt, "invalid output buffer: {} must be {} (got {})", constraint, expected, found)
            }
            ShapeMismatch { what, expected, found } => {
                write!(fmt, "shape mismatch: {} has length {} (expected {})", what, found, expected)
            }
            IndexOutOfRange { what, index, len } => {
                write!(fmt, "index {} out of range for {} of length {}", index, what, len)
            }
            UnknownField { at, name } => write!(fmt, "no field named {:?} at {}", name, at),
            FieldExists { at, name } => write!(fmt, "field {:?} already exists at {}", name, at),
            InvalidGrid(reason) => write!(fmt, "invalid grid: {}", reason),
        }
    }
}

impl error::Error for Error {}




/// Result type returned by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;




/// Fail with `ShapeMismatch` unless an input array has the expected length.
pub(crate) fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::shape_mismatch(what, expected, found))
    }
}

/// Convert an entry of a grid's index array to a `usize`, failing with
/// `IndexOutOfRange` if it does not address one of `len` elements.
pub(crate) fn check_index(what: &str, index: i64, len: usize) -> Result<usize> {
    if index >= 0 && (index as usize) < len {
        Ok(index as usize)
    } else {
        Err(Error::IndexOutOfRange { what: what.to_string(), index, len })
    }
}

/// Fail with `InvalidOutput` unless a caller-supplied buffer has the
/// expected length.
pub(crate) fn check_out(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::InvalidOutput {
            constraint: "shape",
            expected: format!("({},)", expected),
            found: format!("({},)", found),
        })
    }
}
