use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppSettings {
    pub api_url: String,
    pub token: String,
}

/// Connection details for the PostgREST profile store. `url` and `anon_key`
/// may be absent; the client reports that when it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub user_id: String,
}

impl ProfileSettings {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
            && self.anon_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
