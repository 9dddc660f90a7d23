use crate::models::ProfileUpdate;

pub const REPL_COMMANDS: &[&str] = &[
    "/help", "/history", "/clear", "/speak", "/stop", "/forward", "/settings", "/set", "/profile",
    "/exit",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Chat(String),
    Help,
    History,
    Clear,
    Speak,
    StopSpeech,
    Forward,
    ShowSettings,
    SetSpeech(bool),
    SetWhatsApp(bool),
    SetNumber(String),
    ShowProfile,
    CreateProfile { email: String, name: String },
    UpdateProfile(ProfileUpdate),
    Exit,
    Empty,
    Unknown(String),
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "ligar" | "ligado" | "sim" | "true" | "1" => Some(true),
        "off" | "desligar" | "desligado" | "não" | "nao" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lines starting with `/` are commands; anything else is sent to IVONE.
pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if !line.starts_with('/') {
        return ReplCommand::Chat(line.to_string());
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let tail = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/exit" | "/quit" | "/sair" => ReplCommand::Exit,
        "/help" | "/ajuda" | "/?" => ReplCommand::Help,
        "/history" | "/historico" => ReplCommand::History,
        "/clear" | "/limpar" => ReplCommand::Clear,
        "/speak" | "/falar" => ReplCommand::Speak,
        "/stop" | "/parar" => ReplCommand::StopSpeech,
        "/forward" | "/enviar" => ReplCommand::Forward,
        "/settings" | "/config" => ReplCommand::ShowSettings,
        "/set" => parse_set(tail),
        "/profile" | "/perfil" => parse_profile(tail),
        _ => ReplCommand::Unknown(format!("comando desconhecido: {}", command)),
    }
}

fn parse_set(tail: &str) -> ReplCommand {
    let mut parts = tail.splitn(2, char::is_whitespace);
    let key = parts.next().unwrap_or_default();
    let value = parts.next().map(str::trim).unwrap_or_default();

    match key {
        "speech" | "voz" => parse_switch(value)
            .map(ReplCommand::SetSpeech)
            .unwrap_or_else(|| ReplCommand::Unknown("uso: /set speech on|off".to_string())),
        "whatsapp" => parse_switch(value)
            .map(ReplCommand::SetWhatsApp)
            .unwrap_or_else(|| ReplCommand::Unknown("uso: /set whatsapp on|off".to_string())),
        "number" | "numero" if !value.is_empty() => ReplCommand::SetNumber(value.to_string()),
        "number" | "numero" => ReplCommand::Unknown("uso: /set number <telefone>".to_string()),
        _ => ReplCommand::Unknown(
            "uso: /set speech|whatsapp on|off, /set number <telefone>".to_string(),
        ),
    }
}

fn parse_profile(tail: &str) -> ReplCommand {
    if tail.is_empty() {
        return ReplCommand::ShowProfile;
    }

    let mut parts = tail.splitn(2, char::is_whitespace);
    let field = parts.next().unwrap_or_default();
    let value = parts.next().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return ReplCommand::Unknown(format!("uso: /profile {} <valor>", field));
    }

    if field == "create" || field == "criar" {
        let mut words = value.splitn(2, char::is_whitespace);
        let email = words.next().unwrap_or_default();
        let name = words.next().map(str::trim).unwrap_or_default();
        if !email.contains('@') || name.is_empty() {
            return ReplCommand::Unknown("uso: /profile create <email> <nome>".to_string());
        }
        return ReplCommand::CreateProfile {
            email: email.to_string(),
            name: name.to_string(),
        };
    }

    let mut update = ProfileUpdate::default();
    match field {
        "name" | "nome" => update.name = Some(value.to_string()),
        "email" => update.email = Some(value.to_string()),
        "interests" | "interesses" => update.interests = Some(parse_list(value)),
        "topics" | "topicos" => update.favorite_topics = Some(parse_list(value)),
        _ => {
            return ReplCommand::Unknown(
                "uso: /profile [create|name|email|interests|topics <valor>]".to_string(),
            )
        }
    }
    ReplCommand::UpdateProfile(update)
}

pub fn help_text() -> String {
    [
        "Digite uma mensagem para conversar com a IVONE.",
        "Comandos:",
        "  /history                    Mostrar a conversa",
        "  /clear                      Apagar o histórico (pede confirmação)",
        "  /speak | /stop              Ler a última resposta em voz alta / parar",
        "  /forward                    Enviar a última resposta por WhatsApp",
        "  /settings                   Mostrar configurações",
        "  /set speech on|off          Resposta por voz",
        "  /set whatsapp on|off        Envio automático por WhatsApp",
        "  /set number <telefone>      Número de destino do WhatsApp",
        "  /profile                    Mostrar perfil",
        "  /profile create <email> <nome> Criar perfil",
        "  /profile name|email <valor> Alterar nome ou email",
        "  /profile interests a, b     Alterar interesses",
        "  /profile topics a, b        Alterar tópicos favoritos",
        "  /help                       Mostrar esta ajuda",
        "  /exit                       Sair",
    ]
    .join("\n")
}

/// Completion candidates for the word being typed.
pub fn complete_candidates(prefix: &str) -> Vec<&'static str> {
    if !prefix.starts_with('/') {
        return Vec::new();
    }
    REPL_COMMANDS
        .iter()
        .copied()
        .filter(|command| command.starts_with(prefix))
        .collect()
}

/// `s`/`sim`/`y`/`yes` confirm; anything else declines.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_chat_message() {
        assert_eq!(
            parse_command("  Olá, tudo bem? "),
            ReplCommand::Chat("Olá, tudo bem?".to_string())
        );
        assert_eq!(parse_command("   "), ReplCommand::Empty);
    }

    #[test]
    fn settings_commands_parse_switches() {
        assert_eq!(parse_command("/set speech on"), ReplCommand::SetSpeech(true));
        assert_eq!(parse_command("/set whatsapp desligar"), ReplCommand::SetWhatsApp(false));
        assert_eq!(
            parse_command("/set number +55 11 99999-0000"),
            ReplCommand::SetNumber("+55 11 99999-0000".to_string())
        );
        assert!(matches!(parse_command("/set speech maybe"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn profile_commands_build_updates() {
        assert_eq!(parse_command("/profile"), ReplCommand::ShowProfile);

        let ReplCommand::UpdateProfile(update) = parse_command("/profile interests rust, música ,")
        else {
            panic!("expected profile update");
        };
        assert_eq!(
            update.interests,
            Some(vec!["rust".to_string(), "música".to_string()])
        );
        assert!(update.name.is_none());

        assert!(matches!(parse_command("/profile name"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn profile_create_needs_email_and_name() {
        assert_eq!(
            parse_command("/profile create ana@example.org Ana Souza"),
            ReplCommand::CreateProfile {
                email: "ana@example.org".to_string(),
                name: "Ana Souza".to_string(),
            }
        );
        assert!(matches!(
            parse_command("/profile create Ana"),
            ReplCommand::Unknown(_)
        ));
    }

    #[test]
    fn unknown_and_aliases() {
        assert_eq!(parse_command("/sair"), ReplCommand::Exit);
        assert_eq!(parse_command("/limpar"), ReplCommand::Clear);
        assert!(matches!(parse_command("/voar"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn completion_and_confirmation() {
        assert_eq!(complete_candidates("/s"), vec!["/speak", "/stop", "/settings", "/set"]);
        assert!(complete_candidates("ola").is_empty());
        assert!(is_confirmation("S"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
    }
}
