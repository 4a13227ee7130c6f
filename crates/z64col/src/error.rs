//! Error types for the command-line tool.

use std::fmt;
use std::path::PathBuf;

/// Result type for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing a collision file.
#[derive(Debug)]
pub enum Error {
    /// Reading the input file failed.
    Io {
        /// The file that could not be read.
        path: PathBuf,
        source: std::io::Error,
    },
    /// Collision decoding failed.
    Decode(z64col_decode::DecodeError),
    /// The file type could not be inferred from the file name.
    UnknownFileKind {
        /// The file whose type is unknown.
        path: PathBuf,
    },
    /// A command-line argument was unusable.
    InvalidArgument {
        /// The argument at fault.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// Serializing JSON output failed.
    Json(serde_json::Error),
    /// Writing to standard output failed.
    Output(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::UnknownFileKind { path } => {
                write!(
                    f,
                    "cannot determine file type (zscene/zobj) automatically from {}, set it with --file-type",
                    path.display()
                )
            }
            Error::InvalidArgument { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
            Error::Json(e) => write!(f, "failed to serialize json: {e}"),
            Error::Output(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Decode(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<z64col_decode::DecodeError> for Error {
    fn from(e: z64col_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
