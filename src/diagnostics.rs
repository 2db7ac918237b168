//! Diagnostics for strict-validation mode.
//!
//! Ingestion is tolerant: malformed content is skipped rather than raised.
//! When a reader runs in strict mode it records a [`Diagnostic`] for every
//! piece of discarded content, without changing which records are emitted.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::error::ValidationError;

/// Why a piece of input was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    /// Buffered text failed to parse and can never complete.
    #[error("malformed JSON discarded: {message}")]
    Malformed {
        /// Parser message.
        message: String,
    },

    /// A complete JSON document was parsed but it is not an object.
    #[error("non-object JSON document discarded ({found})")]
    NotAnObject {
        /// JSON type that was found.
        found: String,
    },

    /// An object was parsed but rejected by record coercion.
    #[error("record rejected: {0}")]
    Rejected(ValidationError),

    /// A partial record grew past the configured limit.
    #[error("partial record of {bytes} bytes exceeds limit of {limit}")]
    Oversized {
        /// Buffered size when discarded.
        bytes: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Input ended while a record was still incomplete.
    #[error("incomplete record of {bytes} bytes at end of input")]
    TrailingPartial {
        /// Buffered size when input ended.
        bytes: usize,
    },

    /// The underlying reader failed.
    #[error("read error: {message}")]
    Io {
        /// I/O error message.
        message: String,
    },
}

/// A single diagnostic, located by origin and 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the input came from (a file path, or `<memory>`).
    pub origin: String,
    /// 1-based physical line the discarded content starts at (or, for a
    /// rejected record, ends at). Zero when the input could not be opened.
    pub line: usize,
    /// What happened.
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.origin, self.line, self.kind)
    }
}

/// Shared collector for diagnostics.
///
/// Cloning yields another handle onto the same buffer, so a lazy record stream
/// can report into the source that created it.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    inner: Rc<RefCell<Vec<Diagnostic>>>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.inner.borrow_mut().push(diagnostic);
    }

    /// Number of diagnostics collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Returns a copy of the collected diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.inner.borrow().clone()
    }

    /// Drains the collected diagnostics.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}
