use std::fmt;

/// Shown whenever a completion request fails, whatever the cause.
pub const REPLY_FAILED_MESSAGE: &str =
    "Não foi possível obter uma resposta. Por favor, tente novamente.";
pub const HISTORY_SAVE_FAILED_MESSAGE: &str = "Não foi possível salvar o histórico da conversa.";
pub const FORWARD_FAILED_MESSAGE: &str = "Falha ao enviar mensagem no WhatsApp";
pub const UNEXPECTED_MESSAGE: &str = "Ocorreu um erro inesperado";

#[derive(Debug)]
pub enum IvoneError {
    ApiError {
        status: u16,
        message: String,
    },
    MalformedResponse(String),
    NetworkError(reqwest::Error),
    InvalidInput(String),
    Busy,
    InvalidState(String),
    ConfigError(String),
    StorageError(String),
    ProfileError(String),
    ForwardError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl IvoneError {
    /// Short localized text for the conversation view. Technical detail stays
    /// in `Display` and goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            IvoneError::ApiError { .. }
            | IvoneError::MalformedResponse(_)
            | IvoneError::NetworkError(_) => REPLY_FAILED_MESSAGE.to_string(),
            IvoneError::InvalidInput(_) => "Digite uma mensagem antes de enviar.".to_string(),
            IvoneError::Busy => "Aguarde a resposta anterior.".to_string(),
            IvoneError::StorageError(_) => HISTORY_SAVE_FAILED_MESSAGE.to_string(),
            IvoneError::ProfileError(msg) => format!("Erro ao carregar perfil: {}", msg),
            IvoneError::ForwardError(_) => FORWARD_FAILED_MESSAGE.to_string(),
            IvoneError::ConfigError(msg) | IvoneError::InvalidState(msg) => msg.clone(),
            _ => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    /// Whether the error belongs to the completion path (transport, status or body).
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            IvoneError::ApiError { .. }
                | IvoneError::MalformedResponse(_)
                | IvoneError::NetworkError(_)
        )
    }
}

impl fmt::Display for IvoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IvoneError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            IvoneError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            IvoneError::NetworkError(e) => write!(f, "Network error: {}", e),
            IvoneError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            IvoneError::Busy => write!(f, "A reply is already pending"),
            IvoneError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            IvoneError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            IvoneError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            IvoneError::ProfileError(msg) => write!(f, "Profile error: {}", msg),
            IvoneError::ForwardError(msg) => write!(f, "Forward error: {}", msg),
            IvoneError::IoError(e) => write!(f, "IO error: {}", e),
            IvoneError::JsonError(e) => write!(f, "JSON error: {}", e),
            IvoneError::YamlError(e) => write!(f, "YAML error: {}", e),
            IvoneError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for IvoneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IvoneError::NetworkError(e) => Some(e),
            IvoneError::IoError(e) => Some(e),
            IvoneError::JsonError(e) => Some(e),
            IvoneError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IvoneError {
    fn from(err: reqwest::Error) -> Self {
        IvoneError::NetworkError(err)
    }
}

impl From<std::io::Error> for IvoneError {
    fn from(err: std::io::Error) -> Self {
        IvoneError::IoError(err)
    }
}

impl From<serde_json::Error> for IvoneError {
    fn from(err: serde_json::Error) -> Self {
        IvoneError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for IvoneError {
    fn from(err: serde_yaml::Error) -> Self {
        IvoneError::YamlError(err)
    }
}

impl From<anyhow::Error> for IvoneError {
    fn from(err: anyhow::Error) -> Self {
        IvoneError::Other(err.to_string())
    }
}

impl From<String> for IvoneError {
    fn from(msg: String) -> Self {
        IvoneError::Other(msg)
    }
}

impl From<&str> for IvoneError {
    fn from(msg: &str) -> Self {
        IvoneError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IvoneError>;
