//! Error handling for parameter extractors

use std::io;

/// Unified error to report failures while reading robot geometry and solver settings.
#[derive(Debug)]
pub enum ParameterError {
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    WrongAngle(String),
    InvalidLength { expected: usize, found: usize },
    InvalidValue(String),
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ParameterError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ParameterError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            ParameterError::WrongAngle(ref msg) =>
                write!(f, "Wrong angle representation: {}", msg),
            ParameterError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
            ParameterError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            ParameterError::InvalidValue(ref msg) =>
                write!(f, "Invalid Value: {}", msg),
        }
    }
}

impl std::error::Error for ParameterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParameterError {
    fn from(err: io::Error) -> Self {
        ParameterError::IoError(err)
    }
}
