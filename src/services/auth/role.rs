use std::fmt;

use serde::Serialize;

/// Role claim carried by access tokens issued at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    HeadOffice,
    Agency,
    Logistic,
    Unknown,
}

impl Role {
    /// Unrecognized claim values fall back to `Unknown`, never an error.
    pub fn from_claim(value: &str) -> Self {
        match value {
            "head_office" => Self::HeadOffice,
            "agency" => Self::Agency,
            "logistic" => Self::Logistic,
            _ => Self::Unknown,
        }
    }

    pub fn authority(self) -> Authority {
        match self {
            Self::HeadOffice => Authority::Head,
            Self::Agency => Authority::Agency,
            Self::Logistic => Authority::Logistic,
            Self::Unknown => Authority::Guest,
        }
    }
}

/// Authority identifier checked by the authorization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Authority {
    #[serde(rename = "ROLE_HEAD")]
    Head,
    #[serde(rename = "ROLE_AGENCY")]
    Agency,
    #[serde(rename = "ROLE_LOGISTIC")]
    Logistic,
    #[serde(rename = "ROLE_GUEST")]
    Guest,
}

impl Authority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "ROLE_HEAD",
            Self::Agency => "ROLE_AGENCY",
            Self::Logistic => "ROLE_LOGISTIC",
            Self::Guest => "ROLE_GUEST",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
