use crate::config::SpeechSettings;
use crate::error::{IvoneError, Result};
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

/// Reads replies aloud through an external text-to-speech command. The text
/// is written to the command's stdin; playback runs in the background.
pub struct SpeechService {
    settings: SpeechSettings,
    current: Mutex<Option<Child>>,
}

impl SpeechService {
    pub fn new(settings: SpeechSettings) -> Self {
        Self {
            settings,
            current: Mutex::new(None),
        }
    }

    /// Start reading `text`, interrupting anything still playing.
    /// Must be called from within a tokio runtime.
    pub fn speak(&self, text: &str) -> Result<()> {
        let spoken = speakable_text(text);
        if spoken.is_empty() {
            return Ok(());
        }
        self.stop();

        let mut child = Command::new(&self.settings.command)
            .args(&self.settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                tracing::warn!(command = %self.settings.command, error = %e, "speech command failed to start");
                IvoneError::Other(format!(
                    "Failed to start speech command '{}': {}",
                    self.settings.command, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(spoken.as_bytes()).await {
                    tracing::debug!(error = %e, "speech input closed early");
                }
            });
        }

        if let Ok(mut current) = self.current.lock() {
            *current = Some(child);
        }
        Ok(())
    }

    /// Interrupt the current utterance, if any.
    pub fn stop(&self) -> bool {
        let Ok(mut current) = self.current.lock() else {
            return false;
        };
        match current.take() {
            Some(mut child) => {
                let still_running = matches!(child.try_wait(), Ok(None));
                if still_running {
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(error = %e, "could not stop speech command");
                    }
                }
                still_running
            }
            None => false,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.current
            .lock()
            .ok()
            .and_then(|mut current| current.as_mut().map(|child| matches!(child.try_wait(), Ok(None))))
            .unwrap_or(false)
    }
}

/// Reply text with code blocks and markdown markers removed.
pub fn speakable_text(content: &str) -> String {
    let mut spoken = Vec::new();
    let mut in_code = false;
    for line in content.lines() {
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            continue;
        }
        let cleaned: String = line
            .trim_start_matches(|c: char| c == '#' || c == '>' || c.is_whitespace())
            .chars()
            .filter(|c| !matches!(c, '*' | '`' | '_'))
            .collect();
        if !cleaned.trim().is_empty() {
            spoken.push(cleaned.trim().to_string());
        }
    }
    spoken.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_markup_are_not_spoken() {
        let reply = "## Exemplo\nUse **isto**:\n```rust\nfn main() {}\n```\nPronto.";
        assert_eq!(speakable_text(reply), "Exemplo\nUse isto:\nPronto.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_interrupts_running_command() {
        let service = SpeechService::new(SpeechSettings {
            command: "sleep".to_string(),
            args: vec!["5".to_string()],
        });

        service.speak("Olá").unwrap();
        assert!(service.is_speaking());
        assert!(service.stop());
        assert!(!service.is_speaking());
    }

    #[tokio::test]
    async fn missing_command_is_an_error() {
        let service = SpeechService::new(SpeechSettings {
            command: "ivone-no-such-tts-binary".to_string(),
            args: Vec::new(),
        });
        assert!(service.speak("Olá").is_err());
    }
}
