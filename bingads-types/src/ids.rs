//! Identifier types for remote entities.
//!
//! The remote service assigns 64-bit integer ids. Each entity family gets its
//! own newtype so a campaign id can never be passed where an ad extension id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw id as returned by the service.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

remote_id!(
    /// Identifier of an advertiser account.
    AccountId
);

remote_id!(
    /// Identifier of the customer that owns one or more accounts.
    CustomerId
);

remote_id!(
    /// Identifier of a campaign. Campaigns are the containers ad extensions
    /// get associated to.
    CampaignId
);

remote_id!(
    /// Identifier of an ad group within a campaign.
    AdGroupId
);

remote_id!(
    /// Identifier of an ad extension in the account library.
    AdExtensionId
);

remote_id!(
    /// Identifier of a shared entity (e.g. a negative keyword list) or one of
    /// its list items.
    SharedEntityId
);

remote_id!(
    /// Identifier of the signed-in user.
    UserId
);
