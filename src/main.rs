use clap::Parser;
use colored::*;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;
use std::process;

use ivone::api::HttpCompletionClient;
use ivone::app::{App, Flow};
use ivone::cli::Args;
use ivone::config::Config;
use ivone::profile::ProfileClient;
use ivone::repl::{complete_candidates, is_confirmation, parse_command};
use ivone::session::{SessionController, TurnOutcome};
use ivone::settings::SettingsProvider;
use ivone::speech::SpeechService;
use ivone::storage::{FilesystemHistoryStore, HistoryStore, MemoryHistoryStore};
use ivone::whatsapp::WhatsAppClient;
use ivone::{logging, ui};

type IvoneApp = App<HttpCompletionClient, Box<dyn HistoryStore>>;

#[derive(Default)]
struct ReplHelper;

impl Helper for ReplHelper {}
impl Hinter for ReplHelper {
    type Hint = String;
}
impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let pos = pos.min(line.len());
        let input = &line[..pos];
        let start = input
            .rfind(char::is_whitespace)
            .map_or(0, |last_ws| last_ws + 1);

        let pairs = complete_candidates(&input[start..])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };
    logging::init(config.verbose);

    let store: Box<dyn HistoryStore> = if args.no_history {
        Box::new(MemoryHistoryStore::new())
    } else {
        match &config.history_dir {
            Some(dir) => Box::new(FilesystemHistoryStore::with_dir(dir)),
            None => Box::new(FilesystemHistoryStore::new()),
        }
    };

    // Without a key there is no completion client, but history can still be cleared.
    if args.clear_history && config.api.is_none() {
        if !args.assume_yes && !confirm_on_stdin() {
            ui::display_info("Limpeza cancelada.");
            return;
        }
        match store.clear() {
            Ok(()) => ui::display_info("Conversa apagada."),
            Err(e) => {
                ui::display_error(&e.user_message());
                process::exit(1);
            }
        }
        return;
    }

    let mut app = match build_app(&config, store) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    if args.clear_history {
        let confirmed = args.assume_yes || confirm_on_stdin();
        if let Err(e) = app.session.request_clear() {
            ui::display_error(&e.user_message());
            process::exit(1);
        }
        if let Err(e) = app.finish_clear(confirmed).await {
            ui::display_error(&e.user_message());
            process::exit(1);
        }
        return;
    }

    if let Some(message) = args.joined_message() {
        match app.chat(&message).await {
            Ok(TurnOutcome::Replied(_)) => {}
            Ok(_) => process::exit(1),
            Err(e) => {
                ui::display_error(&e.user_message());
                process::exit(1);
            }
        }
        return;
    }

    run_repl(&mut app).await;
}

fn build_app(config: &Config, store: Box<dyn HistoryStore>) -> Result<IvoneApp, String> {
    let api = config.require_api()?;
    let client = HttpCompletionClient::new(api).map_err(|e| e.to_string())?;
    tracing::debug!(endpoint = client.endpoint(), model = client.model(), "completion client ready");

    let session = SessionController::restore(
        client,
        store,
        config.system_prompt.clone(),
        config.max_context,
    );

    let settings = match (config.persist_settings, Config::settings_path()) {
        (true, Some(path)) => SettingsProvider::load(path),
        _ => SettingsProvider::in_memory(),
    };

    let whatsapp = match &config.whatsapp {
        Some(settings) => match WhatsAppClient::new(settings) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "WhatsApp forwarding unavailable");
                None
            }
        },
        None => None,
    };

    Ok(App::new(
        session,
        settings,
        SpeechService::new(config.speech.clone()),
        whatsapp,
        ProfileClient::new(&config.profile),
        config.profile.user_id.clone(),
    ))
}

fn confirm_on_stdin() -> bool {
    use std::io::{self, Write};

    print!("Tem certeza que deseja apagar todo o histórico da conversa? (s/N) ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).is_ok() && is_confirmation(&answer)
}

async fn run_repl(app: &mut IvoneApp) {
    let mut editor = match Editor::<ReplHelper, rustyline::history::DefaultHistory>::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("{} failed to start REPL: {err}", "error:".red());
            process::exit(1);
        }
    };
    editor.set_helper(Some(ReplHelper));
    let history = history_file();
    let _ = editor.load_history(&history);

    println!("{}", "Bem-vindo à IVONE. Digite /help para ver os comandos.".bright_magenta());
    if !app.session.messages().is_empty() {
        println!(
            "{}",
            format!(
                "{} mensagens anteriores carregadas. Use /history para vê-las.",
                app.session.messages().len()
            )
            .dimmed()
        );
    }

    loop {
        match editor.readline("você> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                match app.handle(parse_command(trimmed)).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break,
                    Ok(Flow::ConfirmClear) => {
                        let confirmed = editor
                            .readline("Tem certeza que deseja apagar todo o histórico da conversa? (s/N) ")
                            .map(|answer| is_confirmation(&answer))
                            .unwrap_or(false);
                        if let Err(e) = app.finish_clear(confirmed).await {
                            ui::display_error(&e.user_message());
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "command failed");
                        ui::display_error(&e.user_message());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                eprintln!("{} {err}", "error:".red());
                break;
            }
        }
    }

    if let Err(err) = editor.save_history(&history) {
        eprintln!("{} failed to save history: {err}", "warning:".yellow());
    }
}

fn history_file() -> PathBuf {
    let dir = FilesystemHistoryStore::default_dir();
    let _ = std::fs::create_dir_all(&dir);
    dir.join("repl_history.txt")
}
