use bingads_types::{AdGroupId, CampaignId, Status};
use serde::{Deserialize, Serialize};

/// A campaign. Only the fields the sync layer reads or writes are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: Status,
}

impl Campaign {
    pub fn new(id: CampaignId, name: impl Into<String>, status: Status) -> Self {
        Self { id, name: name.into(), status }
    }
}

/// An ad group together with the campaign that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroup {
    pub id: AdGroupId,
    pub name: String,
    pub status: Status,
    pub campaign_id: CampaignId,
}

impl AdGroup {
    pub fn new(id: AdGroupId, name: impl Into<String>, status: Status, campaign_id: CampaignId) -> Self {
        Self { id, name: name.into(), status, campaign_id }
    }
}
