use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub uid: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Who is on the other end of a session. Display-only: nothing downstream
/// re-verifies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Caller {
    SignedIn(Identity),
    #[default]
    Anonymous,
}

impl Caller {
    pub fn from_identity(identity: Option<Identity>) -> Self {
        identity.map(Caller::SignedIn).unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        match self {
            Caller::SignedIn(identity) => identity
                .display_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or("Candidate"),
            Caller::Anonymous => "Anonymous",
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match self {
            Caller::SignedIn(identity) => Some(&identity.uid),
            Caller::Anonymous => None,
        }
    }

    pub fn photo_url(&self) -> Option<&str> {
        match self {
            Caller::SignedIn(identity) => identity.photo_url.as_deref(),
            Caller::Anonymous => None,
        }
    }
}
