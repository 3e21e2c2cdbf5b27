use bingads_types::SharedEntityId;
use serde::{Deserialize, Serialize};

/// A negative keyword list in the account's shared library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeKeywordList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SharedEntityId>,
    pub name: String,
}

impl NegativeKeywordList {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Phrase,
}

/// One item of a negative keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeKeyword {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SharedEntityId>,
    pub text: String,
    pub match_type: MatchType,
}

impl NegativeKeyword {
    pub fn new(text: impl Into<String>, match_type: MatchType) -> Self {
        Self { id: None, text: text.into(), match_type }
    }
}
