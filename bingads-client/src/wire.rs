//! JSON payloads of the Campaign Management and Customer Management
//! services, and their mapping to model types.
//!
//! Field names follow the service (PascalCase). Unknown fields are ignored
//! on the way in.

use crate::error::{ClientError, ClientResult};
use bingads_model::{
    AdExtension, AdGroup, Callout, Campaign, DevicePreference, MatchType, NegativeKeyword,
    NegativeKeywordList, Review, ReviewFormat, Sitelink,
};
use bingads_types::{AdExtensionId, AdGroupId, CampaignId, SharedEntityId, Status};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) const NEGATIVE_KEYWORD_LIST: &str = "NegativeKeywordList";
pub(crate) const CAMPAIGN_ENTITY: &str = "Campaign";

// ── Faults ───────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireError {
    pub code: Option<i64>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    pub index: Option<i64>,
}

impl WireError {
    pub(crate) fn describe(&self) -> String {
        let mut out = match (&self.error_code, self.code) {
            (Some(name), Some(code)) => format!("{name} ({code})"),
            (Some(name), None) => name.clone(),
            (None, Some(code)) => code.to_string(),
            (None, None) => "error".to_string(),
        };
        if let Some(message) = &self.message {
            out.push_str(": ");
            out.push_str(message);
        }
        if let Some(index) = self.index {
            out.push_str(&format!(" [item {index}]"));
        }
        out
    }
}

/// Body of a non-success response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct ApiFault {
    pub tracking_id: Option<String>,
    pub message: Option<String>,
    pub operation_errors: Vec<WireError>,
    pub batch_errors: Vec<WireError>,
    pub errors: Vec<WireError>,
}

impl ApiFault {
    pub(crate) fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .operation_errors
            .iter()
            .chain(&self.batch_errors)
            .chain(&self.errors)
            .map(WireError::describe)
            .collect();
        if messages.is_empty() {
            if let Some(message) = &self.message {
                messages.push(message.clone());
            }
        }
        if let Some(tracking) = &self.tracking_id {
            debug!("Fault tracking id {tracking}");
        }
        messages
    }
}

/// Any response that may carry per-item errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct PartialErrors {
    pub partial_errors: Vec<Option<WireError>>,
    pub nested_partial_errors: Vec<Option<NestedError>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct NestedError {
    pub index: Option<i64>,
    pub batch_errors: Vec<WireError>,
}

impl PartialErrors {
    pub(crate) fn messages(&self) -> Vec<String> {
        let flat = self.partial_errors.iter().flatten().map(WireError::describe);
        let nested = self.nested_partial_errors.iter().flatten().flat_map(|n| {
            n.batch_errors.iter().map(move |e| match n.index {
                Some(index) => format!("{} [item {index}]", e.describe()),
                None => e.describe(),
            })
        });
        flat.chain(nested).collect()
    }
}

// ── Ad extensions ────────────────────────────────────────────────

/// Ad extension as the service represents it, discriminated by `Type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub(crate) enum WireAdExtension {
    #[serde(rename = "Sitelink2AdExtension", rename_all = "PascalCase")]
    Sitelink {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        #[serde(default)]
        display_text: String,
        #[serde(default)]
        final_urls: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description1: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description2: Option<String>,
        #[serde(default)]
        device_preference: Option<i64>,
    },
    #[serde(rename = "CalloutAdExtension", rename_all = "PascalCase")]
    Callout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "ReviewAdExtension", rename_all = "PascalCase")]
    Review {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        #[serde(default)]
        is_exact: bool,
        #[serde(default)]
        source: String,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl From<&AdExtension> for WireAdExtension {
    fn from(ext: &AdExtension) -> Self {
        match ext {
            AdExtension::Sitelink(s) => Self::Sitelink {
                id: s.id.map(|id| id.get()),
                display_text: s.display_text.clone(),
                final_urls: vec![s.final_url.clone()],
                description1: s.description1.clone(),
                description2: s.description2.clone(),
                device_preference: Some(s.device_preference.criterion_id()),
            },
            AdExtension::Callout(c) => Self::Callout {
                id: c.id.map(|id| id.get()),
                text: c.text.clone(),
            },
            AdExtension::Review(r) => Self::Review {
                id: r.id.map(|id| id.get()),
                is_exact: r.format.is_exact(),
                source: r.source.clone(),
                text: r.text.clone(),
                url: r.source_url.clone(),
            },
        }
    }
}

impl TryFrom<WireAdExtension> for AdExtension {
    type Error = ClientError;

    fn try_from(wire: WireAdExtension) -> ClientResult<Self> {
        let ext = match wire {
            WireAdExtension::Sitelink {
                id,
                display_text,
                final_urls,
                description1,
                description2,
                device_preference,
            } => {
                let final_url = final_urls.into_iter().next().ok_or_else(|| {
                    ClientError::UnexpectedResponse(format!(
                        "sitelink {display_text:?} has no final URL"
                    ))
                })?;
                AdExtension::Sitelink(Sitelink {
                    id: id.map(AdExtensionId::new),
                    display_text,
                    final_url,
                    description1: description1.filter(|d| !d.is_empty()),
                    description2: description2.filter(|d| !d.is_empty()),
                    device_preference: device_preference
                        .map_or(DevicePreference::All, DevicePreference::from_criterion_id),
                })
            }
            WireAdExtension::Callout { id, text } => AdExtension::Callout(Callout {
                id: id.map(AdExtensionId::new),
                text,
            }),
            WireAdExtension::Review { id, is_exact, source, text, url } => {
                AdExtension::Review(Review {
                    id: id.map(AdExtensionId::new),
                    format: ReviewFormat::from_exact(is_exact),
                    text,
                    source,
                    source_url: url.filter(|u| !u.is_empty()),
                })
            }
        };
        Ok(ext)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AdExtensionIdToEntityId {
    pub ad_extension_id: i64,
    pub entity_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct AdExtensionIdentity {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct AdExtensionAssociation {
    pub ad_extension: Option<WireAdExtension>,
    pub entity_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct AdExtensionAssociationCollection {
    pub ad_extension_associations: Vec<AdExtensionAssociation>,
}

// ── Campaigns and ad groups ──────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireCampaign {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WireCampaign {
    /// Campaigns in a status other than Active or Paused (deleted, budget
    /// paused, suspended) are not represented and yield `None`.
    pub(crate) fn into_model(self) -> Option<Campaign> {
        let status = parse_status(self.status.as_deref(), "campaign", self.id)?;
        Some(Campaign::new(
            CampaignId::new(self.id),
            self.name.unwrap_or_default(),
            status,
        ))
    }

    /// Status-only update payload.
    pub(crate) fn status_update(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id.get(),
            name: None,
            status: Some(campaign.status.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireAdGroup {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WireAdGroup {
    pub(crate) fn into_model(self, campaign_id: CampaignId) -> Option<AdGroup> {
        let status = parse_status(self.status.as_deref(), "ad group", self.id)?;
        Some(AdGroup::new(
            AdGroupId::new(self.id),
            self.name.unwrap_or_default(),
            status,
            campaign_id,
        ))
    }

    pub(crate) fn status_update(ad_group: &AdGroup) -> Self {
        Self {
            id: ad_group.id.get(),
            name: None,
            status: Some(ad_group.status.as_str().to_string()),
        }
    }
}

fn parse_status(status: Option<&str>, what: &str, id: i64) -> Option<Status> {
    match status.map(str::parse::<Status>) {
        Some(Ok(status)) => Some(status),
        other => {
            debug!("Skipping {what} {id} with status {other:?}");
            None
        }
    }
}

// ── Shared entities ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireSharedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub entity_type: String,
}

impl WireSharedEntity {
    pub(crate) fn negative_keyword_list(id: Option<SharedEntityId>, name: Option<&str>) -> Self {
        Self {
            id: id.map(|id| id.get()),
            name: name.map(str::to_string),
            entity_type: NEGATIVE_KEYWORD_LIST.to_string(),
        }
    }

    pub(crate) fn into_model(self) -> NegativeKeywordList {
        NegativeKeywordList {
            id: self.id.map(SharedEntityId::new),
            name: self.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireNegativeKeyword {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub match_type: MatchType,
    pub text: String,
    #[serde(rename = "Type", default = "negative_keyword_type")]
    pub item_type: String,
}

fn negative_keyword_type() -> String {
    "NegativeKeyword".to_string()
}

impl From<&NegativeKeyword> for WireNegativeKeyword {
    fn from(keyword: &NegativeKeyword) -> Self {
        Self {
            id: keyword.id.map(|id| id.get()),
            match_type: keyword.match_type,
            text: keyword.text.clone(),
            item_type: negative_keyword_type(),
        }
    }
}

impl From<WireNegativeKeyword> for NegativeKeyword {
    fn from(wire: WireNegativeKeyword) -> Self {
        Self {
            id: wire.id.map(SharedEntityId::new),
            text: wire.text,
            match_type: wire.match_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SharedEntityAssociation {
    pub entity_id: i64,
    pub entity_type: String,
    pub shared_entity_id: i64,
    pub shared_entity_type: String,
}

impl SharedEntityAssociation {
    pub(crate) fn campaign_list(list_id: SharedEntityId, campaign_id: CampaignId) -> Self {
        Self {
            entity_id: campaign_id.get(),
            entity_type: CAMPAIGN_ENTITY.to_string(),
            shared_entity_id: list_id.get(),
            shared_entity_type: NEGATIVE_KEYWORD_LIST.to_string(),
        }
    }
}

// ── Customer management ──────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireUser {
    pub id: i64,
}
