use super::render::MarkdownRenderer;
use crate::models::{Message, Role, UserProfile, UserSettings};
use colored::*;

pub fn display_message(renderer: &MarkdownRenderer, message: &Message) {
    let label = match message.role {
        Role::User => "você".magenta().bold(),
        Role::Assistant => "IVONE".cyan().bold(),
    };
    println!("{} {}", label, message.time_label().dimmed());
    let rendered = renderer.render(&message.content);
    println!("{}", rendered.trim_end());
}

pub fn display_history(renderer: &MarkdownRenderer, messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", "Nenhuma mensagem ainda.".dimmed());
        return;
    }
    for message in messages {
        display_message(renderer, message);
        println!();
    }
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "erro:".red().bold(), message.red());
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "aviso:".yellow().bold(), message);
}

pub fn display_info(message: &str) {
    println!("{}", message.green());
}

pub fn display_settings(settings: &UserSettings) {
    let flag = |on: bool| if on { "ligado".green() } else { "desligado".dimmed() };
    println!("{}", "Configurações".bold());
    println!("  resposta por voz:  {}", flag(settings.enable_speech));
    println!("  envio por WhatsApp: {}", flag(settings.enable_whatsapp));
    let number = if settings.whatsapp_number.is_empty() {
        "(não definido)".dimmed()
    } else {
        settings.whatsapp_number.normal()
    };
    println!("  número WhatsApp:   {}", number);
}

pub fn display_profile(profile: &UserProfile) {
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    println!("{}", "Perfil".bold());
    println!("  nome:       {}", profile.name);
    println!("  email:      {}", profile.email);
    if let Some(created) = &profile.created_at {
        println!("  desde:      {}", created.dimmed());
    }
    println!("  interações: {}", profile.interaction_count);
    println!("  interesses: {}", list(&profile.data.interests));
    println!("  tópicos:    {}", list(&profile.data.favorite_topics));
    println!(
        "  preferências: tema {}, idioma {}, notificações {}",
        profile.preferences.theme,
        profile.preferences.language,
        if profile.preferences.notification_enabled {
            "sim"
        } else {
            "não"
        }
    );
}
