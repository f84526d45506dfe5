#![allow(non_snake_case)]

use std::fmt;

use serde::Serialize;

/// Outcome of a single shell command, serialized as one JSON line.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Maybe<T> {
    Nothing(Error),
    Fine(Success<T>),
}

pub fn Fine<V>(v: V) -> Maybe<V>
where
    V: Serialize,
{
    Maybe::Fine(Success::of(v))
}

pub fn Nothing<V>(err: Error) -> Maybe<V> {
    Maybe::Nothing(err)
}

impl<T: Serialize> From<Result<T, Error>> for Maybe<T> {
    fn from(res: Result<T, Error>) -> Self {
        match res {
            Ok(v) => Fine(v),
            Err(err) => Nothing(err),
        }
    }
}

impl<T> Maybe<T> {
    pub fn is_fine(&self) -> bool {
        matches!(self, Maybe::Fine(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    #[serde(flatten)]
    value: V,
}

impl<V: Serialize> Success<V> {
    pub fn of(value: V) -> Self {
        Self {
            success: true,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    NotFound { message: String },
    Duplicate { message: String },
    Unauthorized { message: String },
    InvalidState { message: String },
    InvalidCredentials { message: String },
    InvalidPayload { message: String },
}

impl Error {
    pub fn not_found<S: Into<String>>(msg: S) -> Error {
        Error::NotFound {
            message: msg.into(),
        }
    }

    pub fn duplicate<S: Into<String>>(msg: S) -> Error {
        Error::Duplicate {
            message: msg.into(),
        }
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Error {
        Error::Unauthorized {
            message: msg.into(),
        }
    }

    pub fn invalid_state<S: Into<String>>(msg: S) -> Error {
        Error::InvalidState {
            message: msg.into(),
        }
    }

    pub fn invalid_payload<S: Into<String>>(msg: S) -> Error {
        Error::InvalidPayload {
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NotFound",
            Error::Duplicate { .. } => "Duplicate",
            Error::Unauthorized { .. } => "Unauthorized",
            Error::InvalidState { .. } => "InvalidState",
            Error::InvalidCredentials { .. } => "InvalidCredentials",
            Error::InvalidPayload { .. } => "InvalidPayload",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::NotFound { message }
            | Error::Duplicate { message }
            | Error::Unauthorized { message }
            | Error::InvalidState { message }
            | Error::InvalidCredentials { message }
            | Error::InvalidPayload { message } => message,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for Error {}
