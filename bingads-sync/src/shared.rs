//! Negative keyword list helpers over the shared library.

use crate::error::{Step, Subject, SyncError, SyncResult};
use crate::library::SharedListLibrary;
use bingads_model::{NegativeKeyword, NegativeKeywordList};
use bingads_types::{CampaignId, SharedEntityId};
use tracing::{debug, info};

const SUBJECT: Subject = Subject::NegativeKeywordList;

pub async fn negative_keyword_lists(
    library: &dyn SharedListLibrary,
) -> SyncResult<Vec<NegativeKeywordList>> {
    library
        .negative_keyword_lists()
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Fetch))
}

/// Returns the list called `name`, creating it if the library has none.
pub async fn ensure_negative_keyword_list(
    library: &dyn SharedListLibrary,
    name: &str,
) -> SyncResult<NegativeKeywordList> {
    if let Some(existing) = negative_keyword_lists(library)
        .await?
        .into_iter()
        .find(|l| l.name == name)
    {
        debug!("Negative keyword list {name:?} already exists");
        return Ok(existing);
    }

    let id = library
        .create_negative_keyword_list(name)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Create))?;
    info!("Created negative keyword list {name:?} ({id})");
    Ok(NegativeKeywordList { id: Some(id), name: name.to_string() })
}

pub async fn delete_negative_keyword_lists(
    library: &dyn SharedListLibrary,
    list_ids: &[SharedEntityId],
) -> SyncResult<()> {
    if list_ids.is_empty() {
        return Ok(());
    }
    library
        .delete_negative_keyword_lists(list_ids)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Delete))
}

pub async fn add_negative_keywords(
    library: &dyn SharedListLibrary,
    list_id: SharedEntityId,
    keywords: &[NegativeKeyword],
) -> SyncResult<Vec<SharedEntityId>> {
    if keywords.is_empty() {
        return Ok(Vec::new());
    }
    library
        .add_negative_keywords(list_id, keywords)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Create))
}

pub async fn delete_negative_keywords(
    library: &dyn SharedListLibrary,
    list_id: SharedEntityId,
    keyword_ids: &[SharedEntityId],
) -> SyncResult<()> {
    if keyword_ids.is_empty() {
        return Ok(());
    }
    library
        .delete_negative_keywords(list_id, keyword_ids)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Delete))
}

/// Attaches every negative keyword list to every listed campaign. Returns
/// the number of pairs sent.
pub async fn assign_negative_keyword_lists(
    library: &dyn SharedListLibrary,
    campaign_ids: &[CampaignId],
) -> SyncResult<usize> {
    let lists = negative_keyword_lists(library).await?;
    let pairs: Vec<(SharedEntityId, CampaignId)> = campaign_ids
        .iter()
        .flat_map(|&campaign| {
            lists
                .iter()
                .filter_map(|l| l.id)
                .map(move |list| (list, campaign))
        })
        .collect();

    if pairs.is_empty() {
        return Ok(0);
    }
    library
        .associate_lists(&pairs)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Associate))?;
    info!("Assigned {} negative keyword lists to {} campaigns", lists.len(), campaign_ids.len());
    Ok(pairs.len())
}

/// Detaches a list from all of its campaigns without deleting it. Returns
/// the number of campaigns it was detached from.
pub async fn detach_negative_keyword_list(
    library: &dyn SharedListLibrary,
    list_id: SharedEntityId,
) -> SyncResult<usize> {
    let campaigns = library
        .list_associations(list_id)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Fetch))?;
    if campaigns.is_empty() {
        return Ok(0);
    }

    let pairs: Vec<(SharedEntityId, CampaignId)> =
        campaigns.iter().map(|&campaign| (list_id, campaign)).collect();
    library
        .disassociate_lists(&pairs)
        .await
        .map_err(SyncError::remote(SUBJECT, Step::Disassociate))?;
    debug!("Detached negative keyword list {list_id} from {} campaigns", pairs.len());
    Ok(pairs.len())
}
