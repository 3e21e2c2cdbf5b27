use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The ad extension kinds the reconciler knows how to synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    Sitelink,
    Callout,
    Review,
}

impl ExtensionKind {
    /// All kinds, in a stable order.
    pub const ALL: [ExtensionKind; 3] = [Self::Sitelink, Self::Callout, Self::Review];

    /// The type name the service uses for this kind.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Sitelink => "Sitelink2AdExtension",
            Self::Callout => "CalloutAdExtension",
            Self::Review => "ReviewAdExtension",
        }
    }

    /// Resolves a service type name back to a kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sitelink => "sitelink",
            Self::Callout => "callout",
            Self::Review => "review",
        };
        f.write_str(name)
    }
}

impl FromStr for ExtensionKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sitelink" | "sitelinks" => Ok(Self::Sitelink),
            "callout" | "callouts" => Ok(Self::Callout),
            "review" | "reviews" => Ok(Self::Review),
            _ => Self::from_type_name(s).ok_or_else(|| crate::Error::InvalidValue {
                field: "extension kind",
                value: s.to_string(),
            }),
        }
    }
}

/// The entity level an ad extension can be associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationType {
    Account,
    Campaign,
    AdGroup,
}

impl AssociationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Campaign => "Campaign",
            Self::AdGroup => "AdGroup",
        }
    }
}

impl fmt::Display for AssociationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which API deployment a session talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(crate::Error::InvalidValue {
                field: "environment",
                value: s.to_string(),
            }),
        }
    }
}
