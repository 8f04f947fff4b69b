//! Contains result and error type for the FBX tree reader.

use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::io;
use std::str;
use std::string;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse error.
///
/// Errors raised inside a node record end the sibling level being decoded
/// (the level keeps the nodes decoded so far); errors raised before the
/// first node record abort the whole parse.
#[derive(Debug)]
pub enum Error {
    /// Invalid magic binary detected.
    InvalidMagic,
    /// I/O operation error.
    Io(io::Error),
    /// Conversion of a node name from bytes to `String` failed.
    Utf8Error(str::Utf8Error),
    /// Reached unexpected EOF in the middle of a record.
    UnexpectedEof,
    /// Got a property type code out of the recognized set.
    UnknownPropertyType(u8),
    /// Node list storage could not be allocated.
    Alloc(TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidMagic => write!(f, "Invalid magic header: Non-FBX or corrupted data?"),
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
            Error::Utf8Error(ref err) => write!(f, "UTF-8 conversion error: {}", err),
            Error::UnexpectedEof => write!(f, "Unexpected EOF"),
            Error::UnknownPropertyType(code) => {
                write!(f, "Unknown property type code: {:#04x}", code)
            },
            Error::Alloc(ref err) => write!(f, "Allocation error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Utf8Error(ref err) => Some(err),
            Error::Alloc(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

impl From<string::FromUtf8Error> for Error {
    fn from(err: string::FromUtf8Error) -> Error {
        Error::Utf8Error(err.utf8_error())
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Error {
        Error::Alloc(err)
    }
}
