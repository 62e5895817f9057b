//! Error types for cppdecl.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::DeclId;

/// The main error type for cppdecl operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a "no declaration matched" error.
    #[must_use]
    pub fn not_found(criteria: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            criteria: criteria.into(),
        })
    }

    /// Creates a "more than one declaration matched" error.
    #[must_use]
    pub fn ambiguous(criteria: impl Into<String>, count: usize) -> Self {
        Self::new(ErrorKind::Ambiguous {
            criteria: criteria.into(),
            count,
        })
    }

    /// Creates a malformed bracket pattern error.
    #[must_use]
    pub fn invalid_pattern(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern {
            text: text.into(),
            reason: reason.into(),
        })
    }

    /// Creates a precondition violation error.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PreconditionViolation(message.into()))
    }

    /// Creates a declaration not found error for a handle.
    #[must_use]
    pub fn declaration_not_found(id: DeclId) -> Self {
        Self::new(ErrorKind::DeclarationNotFound(id))
    }

    /// Creates a stale declaration handle error.
    #[must_use]
    pub fn stale_declaration(id: DeclId) -> Self {
        Self::new(ErrorKind::StaleDeclaration(id))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a `NotFound` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns true if this is an `Ambiguous` error.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.kind, ErrorKind::Ambiguous { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A single-result query matched zero declarations, or a plural query
    /// matched nothing while empty results were not allowed.
    #[error("declaration not found: {criteria}")]
    NotFound {
        /// Description of the search criteria.
        criteria: String,
    },

    /// A single-result query matched more than one declaration.
    #[error("ambiguous declaration: {count} declarations match {criteria}")]
    Ambiguous {
        /// Description of the search criteria.
        criteria: String,
        /// Number of matching declarations.
        count: usize,
    },

    /// Malformed bracket nesting in a template or call pattern.
    #[error("invalid pattern '{text}': {reason}")]
    InvalidPattern {
        /// The offending text.
        text: String,
        /// Why the text was rejected.
        reason: String,
    },

    /// An operation was invoked on an input it is not defined for.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// A handle does not refer to any declaration slot.
    #[error("declaration not found: {0:?}")]
    DeclarationNotFound(DeclId),

    /// A handle refers to a destroyed declaration (generation mismatch).
    #[error("stale declaration handle: {0:?}")]
    StaleDeclaration(DeclId),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Snapshot file access failed.
    #[error("io error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Full name of the scope a query ran against.
    pub scope: Option<String>,
    /// Whether the query was recursive.
    pub recursive: Option<bool>,
    /// Chain of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Records whether the failing query was recursive.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "in scope {scope}")?;
            if let Some(recursive) = self.recursive {
                write!(f, " (recursive: {recursive})")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias using cppdecl's Error.
pub type Result<T> = std::result::Result<T, Error>;
