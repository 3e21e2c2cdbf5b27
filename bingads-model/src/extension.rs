use crate::error::{ModelError, ModelResult};
use bingads_types::{AdExtensionId, ExtensionKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which devices a sitelink is shown on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePreference {
    #[default]
    All,
    Mobile,
}

impl DevicePreference {
    /// Numeric device criterion id used by the service (0 = all devices).
    pub const fn criterion_id(self) -> i64 {
        match self {
            Self::All => 0,
            Self::Mobile => 30001,
        }
    }

    /// Any non-zero criterion is treated as mobile.
    pub const fn from_criterion_id(id: i64) -> Self {
        if id == 0 { Self::All } else { Self::Mobile }
    }
}

/// Whether a review is quoted verbatim or paraphrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReviewFormat {
    #[serde(rename = "exact quote")]
    ExactQuote,
    #[serde(rename = "paraphrased")]
    Paraphrased,
}

impl ReviewFormat {
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::ExactQuote)
    }

    pub const fn from_exact(is_exact: bool) -> Self {
        if is_exact { Self::ExactQuote } else { Self::Paraphrased }
    }
}

/// A sitelink: a titled deep link shown under the ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sitelink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdExtensionId>,
    pub display_text: String,
    pub final_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description2: Option<String>,
    #[serde(default)]
    pub device_preference: DevicePreference,
}

impl Sitelink {
    pub fn new(display_text: impl Into<String>, final_url: impl Into<String>) -> Self {
        Self {
            id: None,
            display_text: display_text.into(),
            final_url: final_url.into(),
            description1: None,
            description2: None,
            device_preference: DevicePreference::All,
        }
    }

    /// Sets both description lines.
    #[must_use]
    pub fn with_descriptions(mut self, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        self.description1 = Some(line1.into());
        self.description2 = Some(line2.into());
        self
    }

    #[must_use]
    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device_preference = device;
        self
    }

    pub fn key(&self) -> ContentKey {
        ContentKey::Sitelink {
            display_text: self.display_text.clone(),
            final_url: self.final_url.clone(),
        }
    }

    /// Key fields plus descriptions and device preference.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.display_text == other.display_text
            && self.final_url == other.final_url
            && self.description1 == other.description1
            && self.description2 == other.description2
            && self.device_preference == other.device_preference
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.display_text.is_empty() {
            return Err(ModelError::MissingField { kind: "sitelink", field: "display_text" });
        }
        if self.final_url.is_empty() {
            return Err(ModelError::MissingField { kind: "sitelink", field: "final_url" });
        }
        let has_line1 = self.description1.as_deref().is_some_and(|d| !d.is_empty());
        let has_line2 = self.description2.as_deref().is_some_and(|d| !d.is_empty());
        if has_line1 != has_line2 {
            return Err(ModelError::IncompleteDescriptions { key: self.key().to_string() });
        }
        Ok(())
    }
}

/// A callout: a short free-text highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdExtensionId>,
    pub text: String,
}

impl Callout {
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: None, text: text.into() }
    }

    pub fn key(&self) -> ContentKey {
        ContentKey::Callout(self.text.clone())
    }
}

/// A third-party review quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdExtensionId>,
    pub format: ReviewFormat,
    pub text: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Review {
    pub fn new(format: ReviewFormat, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: None,
            format,
            text: text.into(),
            source: source.into(),
            source_url: None,
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn key(&self) -> ContentKey {
        ContentKey::Review {
            format: self.format,
            text: self.text.clone(),
            source: self.source.clone(),
            source_url: self.source_url.clone(),
        }
    }
}

/// One ad extension of any supported kind.
///
/// Kinds differ only in their fields, their [`ContentKey`] and their notion
/// of content equality; everything else (ids, reconciliation, association)
/// is handled uniformly through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdExtension {
    Sitelink(Sitelink),
    Callout(Callout),
    Review(Review),
}

impl AdExtension {
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Self::Sitelink(_) => ExtensionKind::Sitelink,
            Self::Callout(_) => ExtensionKind::Callout,
            Self::Review(_) => ExtensionKind::Review,
        }
    }

    /// Remote id, absent until the extension has been created.
    pub fn id(&self) -> Option<AdExtensionId> {
        match self {
            Self::Sitelink(s) => s.id,
            Self::Callout(c) => c.id,
            Self::Review(r) => r.id,
        }
    }

    pub fn set_id(&mut self, id: Option<AdExtensionId>) {
        match self {
            Self::Sitelink(s) => s.id = id,
            Self::Callout(c) => c.id = id,
            Self::Review(r) => r.id = id,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: AdExtensionId) -> Self {
        self.set_id(Some(id));
        self
    }

    pub fn content_key(&self) -> ContentKey {
        match self {
            Self::Sitelink(s) => s.key(),
            Self::Callout(c) => c.key(),
            Self::Review(r) => r.key(),
        }
    }

    /// Semantic equality for the kind, ignoring the remote id.
    ///
    /// Extensions of different kinds are never equal.
    pub fn content_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sitelink(a), Self::Sitelink(b)) => a.content_eq(b),
            (Self::Callout(a), Self::Callout(b)) => a.key() == b.key(),
            (Self::Review(a), Self::Review(b)) => a.key() == b.key(),
            _ => false,
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Sitelink(s) => s.validate(),
            Self::Callout(c) if c.text.is_empty() => {
                Err(ModelError::MissingField { kind: "callout", field: "text" })
            }
            Self::Review(r) if r.text.is_empty() => {
                Err(ModelError::MissingField { kind: "review", field: "text" })
            }
            _ => Ok(()),
        }
    }
}

impl From<Sitelink> for AdExtension {
    fn from(s: Sitelink) -> Self {
        Self::Sitelink(s)
    }
}

impl From<Callout> for AdExtension {
    fn from(c: Callout) -> Self {
        Self::Callout(c)
    }
}

impl From<Review> for AdExtension {
    fn from(r: Review) -> Self {
        Self::Review(r)
    }
}

impl fmt::Display for AdExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "[{id}] {}", self.content_key()),
            None => write!(f, "[new] {}", self.content_key()),
        }
    }
}

/// The fields that identify an extension independently of its remote id.
///
/// Ordering is only meaningful between keys of the same kind; it is what the
/// reconciler sorts both sides by before merging.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentKey {
    Sitelink {
        display_text: String,
        final_url: String,
    },
    Callout(String),
    Review {
        format: ReviewFormat,
        text: String,
        source: String,
        source_url: Option<String>,
    },
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sitelink { display_text, final_url } => {
                write!(f, "({display_text:?}, {final_url:?})")
            }
            Self::Callout(text) => write!(f, "{text:?}"),
            Self::Review { format, text, source, source_url } => write!(
                f,
                "({format:?}, {text:?}, {source:?}, {:?})",
                source_url.as_deref().unwrap_or("")
            ),
        }
    }
}
