use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// The thread doesn't exist in the store.
    ThreadNotFound,
    /// A message could not be converted to or from its stored form.
    Serialization,
    /// The backend failed.
    Backend,
}

impl Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::ThreadNotFound => write!(f, "Thread not found"),
            StoreErrorKind::Serialization => write!(f, "Serialization error"),
            StoreErrorKind::Backend => write!(f, "Backend error"),
        }
    }
}

/// Describes a store error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreError {
    kind: StoreErrorKind,
    reason: Option<String>,
}

impl StoreError {
    /// Creates a new error with the `ThreadNotFound` kind.
    #[inline]
    pub fn thread_not_found(thread_id: u64) -> Self {
        Self {
            kind: StoreErrorKind::ThreadNotFound,
            reason: Some(format!("no thread with id {thread_id}")),
        }
    }

    /// Creates a new error with the `Serialization` kind.
    #[inline]
    pub fn serialization(err: serde_json::Error) -> Self {
        Self {
            kind: StoreErrorKind::Serialization,
            reason: Some(err.to_string()),
        }
    }

    /// Creates a new error with the `Backend` kind.
    #[inline]
    pub fn backend<S: Into<String>>(reason: S) -> Self {
        Self {
            kind: StoreErrorKind::Backend,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of the error.
    #[inline]
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason())
    }
}

impl Error for StoreError {}
