use bingads_types::{AssociationType, ExtensionKind};
use serde::{Deserialize, Serialize};

/// What the reconciler does when a desired extension matches a remote one
/// by content key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Compare with the kind's content equality and update in place when
    /// they differ.
    UpdateOnChange,
    /// A key match is always kept. Used where the key is the whole content.
    KeepOnMatch,
}

/// Per-kind reconciliation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindPolicy {
    pub kind: ExtensionKind,
    /// Maximum number of desired extensions accepted in one pass.
    pub max_count: usize,
    pub update_mode: UpdateMode,
    /// Restricts the remote fetch to extensions associated at this level.
    /// `None` reads the whole account library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_filter: Option<AssociationType>,
}

impl KindPolicy {
    /// The defaults the service limits and the extension semantics call for.
    pub const fn for_kind(kind: ExtensionKind) -> Self {
        match kind {
            ExtensionKind::Sitelink => Self {
                kind,
                max_count: 10,
                update_mode: UpdateMode::UpdateOnChange,
                fetch_filter: None,
            },
            ExtensionKind::Callout | ExtensionKind::Review => Self {
                kind,
                max_count: 20,
                update_mode: UpdateMode::KeepOnMatch,
                fetch_filter: Some(AssociationType::Campaign),
            },
        }
    }

    #[must_use]
    pub const fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    #[must_use]
    pub const fn with_fetch_filter(mut self, filter: Option<AssociationType>) -> Self {
        self.fetch_filter = filter;
        self
    }
}
