//! Error types for the sync layer.

use bingads_model::ModelError;
use bingads_types::ExtensionKind;
use std::fmt;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Error type returned by the remote collaborators.
///
/// The sync layer does not interpret transport faults; it only records which
/// step produced them.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for remote collaborator calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// The remote step that was running when a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Fetch,
    Delete,
    Create,
    Update,
    Associate,
    Disassociate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Delete => "delete",
            Self::Create => "create",
            Self::Update => "update",
            Self::Associate => "associate",
            Self::Disassociate => "disassociate",
        };
        f.write_str(name)
    }
}

/// What a failed remote call was operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Extension(ExtensionKind),
    Campaign,
    AdGroup,
    NegativeKeywordList,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(kind) => write!(f, "{kind}"),
            Self::Campaign => f.write_str("campaign"),
            Self::AdGroup => f.write_str("ad group"),
            Self::NegativeKeywordList => f.write_str("negative keyword list"),
        }
    }
}

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The desired set is larger than the kind allows. Raised before any
    /// remote call.
    #[error("too many {kind} extensions for {scope}: {count} requested, at most {max} allowed")]
    QuotaExceeded {
        kind: ExtensionKind,
        scope: String,
        count: usize,
        max: usize,
    },

    /// Two desired extensions share a content key.
    #[error("duplicate {kind} content key in desired set: {key}")]
    DuplicateKey { kind: ExtensionKind, key: String },

    /// A desired extension is not of the kind being reconciled.
    #[error("expected {expected} extension, got {found}")]
    KindMismatch {
        expected: ExtensionKind,
        found: ExtensionKind,
    },

    /// A desired extension failed model validation.
    #[error("invalid {kind} extension: {source}")]
    InvalidExtension {
        kind: ExtensionKind,
        #[source]
        source: ModelError,
    },

    /// A remote call failed. Steps that completed before it are not rolled
    /// back.
    #[error("{step} step failed for {subject}: {source}")]
    RemoteCallFailed {
        subject: Subject,
        step: Step,
        #[source]
        source: RemoteError,
    },
}

impl SyncError {
    pub(crate) fn remote(subject: Subject, step: Step) -> impl FnOnce(RemoteError) -> Self {
        move |source| Self::RemoteCallFailed { subject, step, source }
    }

    /// The step that failed, for remote failures.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::RemoteCallFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Returns true if the error was raised before anything was sent to the
    /// remote service.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::RemoteCallFailed { .. })
    }
}
