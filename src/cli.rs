use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "ivone")]
#[command(
    version,
    about = "IVONE: chat assistant for the terminal",
    long_about = "Send a message as arguments for a single reply, or run without arguments for an interactive session."
)]
pub struct Args {
    #[arg(long = "clear", help = "Clear the conversation history")]
    pub clear_history: bool,

    #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation when clearing")]
    pub assume_yes: bool,

    #[arg(
        long = "no-history",
        help = "Keep this session's history in memory only"
    )]
    pub no_history: bool,

    #[arg(short = 'm', long = "model", help = "Model identifier to request")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "timeout", help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(
        long = "max-context",
        help = "Number of previous messages sent with each request"
    )]
    pub max_context: Option<usize>,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic logs to stderr")]
    pub verbose: bool,

    #[arg(help = "Message to send to IVONE")]
    pub message: Vec<String>,
}

impl Args {
    /// The one-shot message, if any was given.
    pub fn joined_message(&self) -> Option<String> {
        let joined = self.message.join(" ");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}
