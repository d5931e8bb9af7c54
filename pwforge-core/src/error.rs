//! Error types for the reconciliation engines.

use std::fmt;

use thiserror::Error;

use crate::codec::CodecError;
use crate::convert::ConvertError;
use crate::model::ResourceKind;
use crate::remote::RemoteError;

/// Remote call that failed, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    Add,
    Get,
    Edit,
    Delete,
    Search,
}

impl RemoteOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Get => "get",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A remote failure together with what was being attempted.
#[derive(Debug, Error)]
#[error("{operation} {kind} {} failed: {source}", .id.as_deref().unwrap_or("(new)"))]
pub struct TransportError {
    pub kind: ResourceKind,
    pub operation: RemoteOperation,
    pub id: Option<String>,
    #[source]
    pub source: RemoteError,
}

impl TransportError {
    pub fn new(
        kind: ResourceKind,
        operation: RemoteOperation,
        id: Option<&str>,
        source: RemoteError,
    ) -> Self {
        Self {
            kind,
            operation,
            id: id.map(str::to_string),
            source,
        }
    }
}

/// Error type for lifecycle operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The desired model or query is malformed or contradictory.
    #[error("invalid {kind}: {message}")]
    Validation { kind: ResourceKind, message: String },

    /// A secret in a remote payload could not be decoded.
    #[error("failed to decode {kind} {field}: {source}")]
    Decode {
        kind: ResourceKind,
        field: &'static str,
        #[source]
        source: CodecError,
    },

    /// A remote payload or desired model lacks a required field.
    #[error("{kind} is missing required field {field}")]
    Incomplete {
        kind: ResourceKind,
        field: &'static str,
    },

    /// Secret material could not be generated.
    #[error("failed to generate secret material for {kind}: {source}")]
    Generate {
        kind: ResourceKind,
        #[source]
        source: CodecError,
    },

    /// The remote entity no longer exists.
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to create {kind}: {source}")]
    Create {
        kind: ResourceKind,
        #[source]
        source: TransportError,
    },

    #[error("failed to update {kind} {id}: {source}")]
    Update {
        kind: ResourceKind,
        id: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to delete {kind} {id}: {source}")]
    Delete {
        kind: ResourceKind,
        id: String,
        #[source]
        source: TransportError,
    },
}

impl ReconcileError {
    pub(crate) fn convert(kind: ResourceKind, error: ConvertError) -> Self {
        match error {
            ConvertError::Decode { field, source } => Self::Decode {
                kind,
                field,
                source,
            },
            ConvertError::Missing { field } => Self::Incomplete { kind, field },
        }
    }

    /// Rewrap a bare transport failure with operation context; other
    /// variants pass through.
    pub(crate) fn within(self, wrap: impl FnOnce(TransportError) -> Self) -> Self {
        match self {
            Self::Transport(source) => wrap(source),
            other => other,
        }
    }

    /// Whether this is the recoverable "entity is gone" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Resource kind the failure relates to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Validation { kind, .. }
            | Self::Decode { kind, .. }
            | Self::Incomplete { kind, .. }
            | Self::Generate { kind, .. }
            | Self::NotFound { kind, .. }
            | Self::Create { kind, .. }
            | Self::Update { kind, .. }
            | Self::Delete { kind, .. } => *kind,
            Self::Transport(source) => source.kind,
        }
    }
}
