use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProfilePreferences {
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_notifications")]
    pub notification_enabled: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for ProfilePreferences {
    fn default() -> Self {
        Self {
            preferred_name: None,
            theme: default_theme(),
            language: default_language(),
            notification_enabled: default_notifications(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProfileData {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub favorite_topics: Vec<String>,
    #[serde(default)]
    pub last_topics: Vec<String>,
}

/// A user row merged with its preference and data rows.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub interaction_count: u64,
    #[serde(default)]
    pub preferences: ProfilePreferences,
    #[serde(default)]
    pub data: ProfileData,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_topics: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.interests.is_none()
            && self.favorite_topics.is_none()
    }

    pub fn touches_user_row(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }

    pub fn touches_data_row(&self) -> bool {
        self.interests.is_some() || self.favorite_topics.is_some()
    }
}
