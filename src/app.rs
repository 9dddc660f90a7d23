use crate::api::CompletionClient;
use crate::error::{IvoneError, Result};
use crate::models::{Message, SettingsUpdate};
use crate::profile::ProfileClient;
use crate::repl::{help_text, ReplCommand};
use crate::session::{ClearReport, SessionController, TurnOutcome};
use crate::settings::SettingsProvider;
use crate::speech::SpeechService;
use crate::storage::HistoryStore;
use crate::ui::{self, MarkdownRenderer};
use crate::whatsapp::WhatsAppClient;

/// Everything the terminal front-end drives: the session plus the
/// settings, speech, forwarding and profile collaborators.
pub struct App<C, S> {
    pub session: SessionController<C, S>,
    pub settings: SettingsProvider,
    speech: SpeechService,
    whatsapp: Option<WhatsAppClient>,
    profile: std::result::Result<ProfileClient, String>,
    profile_user: String,
    renderer: MarkdownRenderer,
}

/// What the front-end should do after handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ConfirmClear,
    Exit,
}

impl<C: CompletionClient, S: HistoryStore> App<C, S> {
    pub fn new(
        session: SessionController<C, S>,
        settings: SettingsProvider,
        speech: SpeechService,
        whatsapp: Option<WhatsAppClient>,
        profile: Result<ProfileClient>,
        profile_user: impl Into<String>,
    ) -> Self {
        Self {
            session,
            settings,
            speech,
            whatsapp,
            profile: profile.map_err(|e| e.user_message()),
            profile_user: profile_user.into(),
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run one turn. Ctrl-C while waiting abandons the request; a reply that
    /// arrives afterwards is ignored.
    pub async fn chat(&mut self, text: &str) -> Result<TurnOutcome> {
        let pending = self.session.begin_turn(text)?;
        if let Some(warning) = self.session.storage_warning() {
            ui::display_warning(warning);
        }

        let result = tokio::select! {
            result = self.session.client().send(pending.payload()) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        let outcome = match result {
            Some(result) => self.session.complete_turn(pending, result),
            None => {
                self.session.cancel_turn();
                self.session.complete_turn(pending, Err(IvoneError::Other("cancelled".to_string())))
            }
        };

        match &outcome {
            TurnOutcome::Replied(message) => {
                ui::display_message(&self.renderer, message);
                if let Some(warning) = self.session.storage_warning() {
                    ui::display_warning(warning);
                }
                self.after_reply(message).await;
            }
            TurnOutcome::Failed(error) => ui::display_error(error),
            TurnOutcome::Discarded => ui::display_warning("Pedido cancelado."),
        }
        Ok(outcome)
    }

    /// Speech and forwarding hooks for a fresh reply.
    async fn after_reply(&self, message: &Message) {
        if self.settings.settings().enable_speech {
            if let Err(e) = self.speech.speak(&message.content) {
                tracing::warn!(error = %e, "speech output failed");
            }
        }
        if let Some(number) = self.settings.forward_target() {
            if let Err(e) = self.forward(number, &message.content).await {
                ui::display_warning(&e.user_message());
            }
        }
    }

    async fn forward(&self, number: &str, content: &str) -> Result<()> {
        let client = self.whatsapp.as_ref().ok_or_else(|| {
            IvoneError::ForwardError("WHATSAPP_API_URL or WHATSAPP_TOKEN not set".to_string())
        })?;
        client.send_text(number, content).await?;
        Ok(())
    }

    /// Handle one REPL command. Clearing needs the caller to ask for
    /// confirmation and then call [`finish_clear`](Self::finish_clear).
    pub async fn handle(&mut self, command: ReplCommand) -> Result<Flow> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Exit => {
                self.speech.stop();
                return Ok(Flow::Exit);
            }
            ReplCommand::Help => println!("{}", help_text()),
            ReplCommand::Unknown(message) => ui::display_warning(&message),
            ReplCommand::Chat(text) => {
                self.chat(&text).await?;
            }
            ReplCommand::History => ui::display_history(&self.renderer, self.session.messages()),
            ReplCommand::Clear => {
                if self.session.messages().is_empty() {
                    ui::display_info("A conversa já está vazia.");
                } else {
                    self.session.request_clear()?;
                    return Ok(Flow::ConfirmClear);
                }
            }
            ReplCommand::Speak => match self.session.window().last_assistant() {
                Some(message) => self.speech.speak(&message.content)?,
                None => ui::display_warning("Ainda não há resposta para ler."),
            },
            ReplCommand::StopSpeech => {
                self.speech.stop();
            }
            ReplCommand::Forward => {
                let Some(message) = self.session.window().last_assistant() else {
                    ui::display_warning("Ainda não há resposta para enviar.");
                    return Ok(Flow::Continue);
                };
                let number = self.settings.settings().whatsapp_number.clone();
                if number.is_empty() {
                    ui::display_warning("Defina o número com /set number <telefone>.");
                    return Ok(Flow::Continue);
                }
                self.forward(&number, &message.content).await?;
                ui::display_info("Mensagem enviada por WhatsApp.");
            }
            ReplCommand::ShowSettings => ui::display_settings(self.settings.settings()),
            ReplCommand::SetSpeech(enabled) => {
                if !enabled {
                    self.speech.stop();
                }
                self.update_settings(SettingsUpdate::speech(enabled))?;
            }
            ReplCommand::SetWhatsApp(enabled) => {
                self.update_settings(SettingsUpdate::whatsapp(enabled))?;
            }
            ReplCommand::SetNumber(number) => {
                self.update_settings(SettingsUpdate::number(number))?;
            }
            ReplCommand::ShowProfile => {
                let profile = self.profile_client()?.fetch_profile(&self.profile_user).await?;
                ui::display_profile(&profile);
            }
            ReplCommand::CreateProfile { email, name } => {
                let profile = self.profile_client()?.create_profile(&email, &name).await?;
                ui::display_info(&format!(
                    "Perfil criado. Defina IVONE_USER_ID={} para usá-lo.",
                    profile.id
                ));
                ui::display_profile(&profile);
            }
            ReplCommand::UpdateProfile(update) => {
                self.profile_client()?
                    .update_profile(&self.profile_user, &update)
                    .await?;
                ui::display_info("Perfil atualizado.");
            }
        }
        Ok(Flow::Continue)
    }

    /// Second step of `/clear`: apply or drop the pending clear.
    /// Returns `None` when the clear was declined.
    pub async fn finish_clear(&mut self, confirmed: bool) -> Result<Option<ClearReport>> {
        if !confirmed {
            self.session.cancel_clear();
            ui::display_info("Limpeza cancelada.");
            return Ok(None);
        }

        let report = self.session.confirm_clear().await?;
        if report.is_complete() {
            ui::display_info("Conversa apagada.");
        } else if let ClearReport::Partial { failures } = &report {
            for failure in failures {
                ui::display_warning(&format!("Conversa apagada, mas {}.", failure));
            }
        }
        Ok(Some(report))
    }

    fn update_settings(&mut self, update: SettingsUpdate) -> Result<()> {
        let settings = self.settings.update(update)?;
        ui::display_settings(settings);
        Ok(())
    }

    fn profile_client(&self) -> Result<&ProfileClient> {
        self.profile
            .as_ref()
            .map_err(|message| IvoneError::ConfigError(message.clone()))
    }
}
