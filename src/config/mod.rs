mod api;
mod defaults;
mod services;
mod validation;

use crate::cli::Args;
use crate::conversation::MAX_CONTEXT_MESSAGES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::{normalize_endpoint, ApiConfig, ApiSettings};
pub use services::{
    ProfileConfig, ProfileSettings, SpeechConfig, SpeechSettings, WhatsAppConfig,
    WhatsAppSettings,
};
pub use validation::{expand_with, normalize_phone_number};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub max_context: Option<usize>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub persist_settings: Option<bool>,
    #[serde(default)]
    pub history_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Contents of `.ivone.yaml` (or the JSON variant).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

pub struct Config {
    /// `None` until a key is provided; only chat turns need it.
    pub api: Option<ApiSettings>,
    pub system_prompt: String,
    pub max_context: usize,
    pub verbose: bool,
    pub persist_settings: bool,
    pub history_dir: Option<PathBuf>,
    pub speech: SpeechSettings,
    pub whatsapp: Option<WhatsAppSettings>,
    pub profile: ProfileSettings,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        let file_config = match FileConfig::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable config file");
                FileConfig::default()
            }
        };
        Self::resolve(args, file_config, |name| env::var(name).ok())
    }

    /// Merge sources with precedence CLI > environment > file > default.
    pub fn resolve(
        args: &Args,
        file: FileConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let expand = |value: String| expand_with(&value, &env_lookup);

        // Secrets never come from the config file.
        let api_key = env_lookup("IVONE_API_KEY")
            .or_else(|| env_lookup("HF_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        let endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_lookup("IVONE_API_ENDPOINT"))
            .or(file.api.endpoint.clone().map(expand))
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(defaults::default_endpoint);

        let model = args
            .model
            .clone()
            .or_else(|| env_lookup("IVONE_MODEL"))
            .or(file.api.model.clone())
            .unwrap_or_else(defaults::default_model);

        let max_tokens = env_lookup("IVONE_MAX_TOKENS")
            .and_then(|s| s.parse::<u32>().ok())
            .or(file.api.max_tokens)
            .unwrap_or_else(defaults::default_max_tokens);

        let timeout_secs = args
            .timeout_secs
            .or_else(|| env_lookup("IVONE_TIMEOUT").and_then(|s| s.parse::<u64>().ok()))
            .or(file.api.timeout_secs)
            .unwrap_or_else(defaults::default_timeout_secs);
        if timeout_secs == 0 {
            return Err("Request timeout must be at least one second".to_string());
        }

        let api = api_key.map(|api_key| ApiSettings {
            api_key,
            endpoint,
            model,
            max_tokens,
            timeout_secs,
        });

        let system_prompt = env_lookup("IVONE_SYSTEM_PROMPT")
            .or(file.model.system_prompt.clone())
            .unwrap_or_else(|| crate::prompts::SYSTEM_DIRECTIVE.to_string());

        let max_context = args
            .max_context
            .or_else(|| env_lookup("IVONE_MAX_CONTEXT").and_then(|s| s.parse::<usize>().ok()))
            .or(file.session.max_context)
            .unwrap_or(MAX_CONTEXT_MESSAGES);

        let verbose = args.verbose
            || env_lookup("IVONE_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.session.verbose)
                .unwrap_or(false);

        let persist_settings = file
            .session
            .persist_settings
            .unwrap_or_else(defaults::default_persist_settings);

        let history_dir = env_lookup("IVONE_HISTORY_DIR")
            .or(file.session.history_dir.clone().map(expand))
            .map(PathBuf::from);

        let speech = SpeechSettings {
            command: env_lookup("IVONE_SPEECH_COMMAND")
                .or(file.speech.command.clone())
                .unwrap_or_else(defaults::default_speech_command),
            args: file
                .speech
                .args
                .clone()
                .unwrap_or_else(defaults::default_speech_args),
        };

        let whatsapp = match (
            env_lookup("WHATSAPP_API_URL").or(file.whatsapp.api_url.clone().map(expand)),
            env_lookup("WHATSAPP_TOKEN"),
        ) {
            (Some(api_url), Some(token)) if !api_url.is_empty() && !token.is_empty() => {
                Some(WhatsAppSettings { api_url, token })
            }
            _ => None,
        };

        let profile = ProfileSettings {
            url: env_lookup("SUPABASE_URL").or(file.profile.url.clone().map(expand)),
            anon_key: env_lookup("SUPABASE_ANON_KEY"),
            user_id: env_lookup("IVONE_USER_ID")
                .or(file.profile.user_id.clone())
                .unwrap_or_else(defaults::default_user_id),
        };

        Ok(Config {
            api,
            system_prompt,
            max_context,
            verbose,
            persist_settings,
            history_dir,
            speech,
            whatsapp,
            profile,
        })
    }

    /// Completion settings, or the error to show when no key is configured.
    pub fn require_api(&self) -> Result<&ApiSettings, String> {
        self.api
            .as_ref()
            .ok_or_else(|| "IVONE_API_KEY environment variable not set".to_string())
    }

    /// Where user settings are kept between runs.
    pub fn settings_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("ivone").join("settings.yaml"))
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".ivone.yaml"),
            PathBuf::from(".ivone.yml"),
            PathBuf::from(".ivone.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("ivone");
            paths.push(config_dir.join("ivone.yaml"));
            paths.push(config_dir.join("ivone.yml"));
            paths.push(config_dir.join("ivone.json"));
        }

        paths
    }
}
