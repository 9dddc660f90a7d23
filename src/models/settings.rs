use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub enable_speech: bool,
    #[serde(default, rename = "enableWhatsApp")]
    pub enable_whatsapp: bool,
    #[serde(default, rename = "whatsAppNumber")]
    pub whatsapp_number: String,
}

/// Partial change to [`UserSettings`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub enable_speech: Option<bool>,
    pub enable_whatsapp: Option<bool>,
    pub whatsapp_number: Option<String>,
}

impl SettingsUpdate {
    pub fn speech(enabled: bool) -> Self {
        Self {
            enable_speech: Some(enabled),
            ..Default::default()
        }
    }

    pub fn whatsapp(enabled: bool) -> Self {
        Self {
            enable_whatsapp: Some(enabled),
            ..Default::default()
        }
    }

    pub fn number(number: impl Into<String>) -> Self {
        Self {
            whatsapp_number: Some(number.into()),
            ..Default::default()
        }
    }
}
