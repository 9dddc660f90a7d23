use crate::config::normalize_phone_number;
use crate::error::{IvoneError, Result};
use crate::models::{SettingsUpdate, UserSettings};
use std::fs;
use std::path::PathBuf;

/// Process-wide user settings. Changes go through [`update`](Self::update),
/// which merges only the fields that are set.
pub struct SettingsProvider {
    settings: UserSettings,
    path: Option<PathBuf>,
}

impl SettingsProvider {
    /// Settings that live for this process only.
    pub fn in_memory() -> Self {
        Self {
            settings: UserSettings::default(),
            path: None,
        }
    }

    /// Settings backed by a YAML file; a missing or unreadable file starts from defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(contents) => serde_yaml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                UserSettings::default()
            }),
            Err(_) => UserSettings::default(),
        };
        Self {
            settings,
            path: Some(path),
        }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn update(&mut self, update: SettingsUpdate) -> Result<&UserSettings> {
        let mut next = self.settings.clone();

        if let Some(number) = update.whatsapp_number {
            next.whatsapp_number = if number.trim().is_empty() {
                String::new()
            } else {
                normalize_phone_number(&number).ok_or_else(|| {
                    IvoneError::InvalidInput(format!("invalid WhatsApp number: {}", number))
                })?
            };
        }
        if let Some(enabled) = update.enable_speech {
            next.enable_speech = enabled;
        }
        if let Some(enabled) = update.enable_whatsapp {
            next.enable_whatsapp = enabled;
        }

        self.settings = next;
        self.save()?;
        Ok(&self.settings)
    }

    /// Destination for forwarded replies, when forwarding is on and a number is set.
    pub fn forward_target(&self) -> Option<&str> {
        if self.settings.enable_whatsapp && !self.settings.whatsapp_number.is_empty() {
            Some(&self.settings.whatsapp_number)
        } else {
            None
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(&self.settings)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn update_merges_partial_changes() {
        let mut provider = SettingsProvider::in_memory();

        provider.update(SettingsUpdate::speech(true)).unwrap();
        provider
            .update(SettingsUpdate::number("+55 11 98888-7777"))
            .unwrap();

        let settings = provider.settings();
        assert!(settings.enable_speech);
        assert!(!settings.enable_whatsapp);
        assert_eq!(settings.whatsapp_number, "+5511988887777");
        assert!(provider.forward_target().is_none());

        provider.update(SettingsUpdate::whatsapp(true)).unwrap();
        assert_eq!(provider.forward_target(), Some("+5511988887777"));
    }

    #[test]
    fn invalid_number_leaves_settings_untouched() {
        let mut provider = SettingsProvider::in_memory();
        let update = SettingsUpdate {
            enable_speech: Some(true),
            whatsapp_number: Some("not a number".to_string()),
            ..Default::default()
        };

        assert!(provider.update(update).is_err());
        assert_eq!(provider.settings(), &UserSettings::default());
    }

    #[test]
    fn settings_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ivone").join("settings.yaml");

        let mut provider = SettingsProvider::load(&path);
        provider.update(SettingsUpdate::speech(true)).unwrap();

        let reloaded = SettingsProvider::load(&path);
        assert!(reloaded.settings().enable_speech);
    }

    #[test]
    fn corrupt_settings_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "enableSpeech: [oops").unwrap();

        let provider = SettingsProvider::load(&path);
        assert_eq!(provider.settings(), &UserSettings::default());
    }
}
