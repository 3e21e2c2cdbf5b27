use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serving status of a campaign or ad group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Paused,
}

impl Status {
    /// The status an entity has to be in for a flip to `self` to change anything.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Active" | "active" => Ok(Self::Active),
            "Paused" | "paused" => Ok(Self::Paused),
            _ => Err(crate::Error::InvalidValue {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}
