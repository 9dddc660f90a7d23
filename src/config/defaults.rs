pub fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models/Qwen/Qwen2.5-Coder-32B-Instruct/v1/chat/completions"
        .to_string()
}

pub fn default_model() -> String {
    "Qwen/Qwen2.5-Coder-32B-Instruct".to_string()
}

pub fn default_max_tokens() -> u32 {
    500
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

pub fn default_speech_args() -> Vec<String> {
    vec!["-v".to_string(), "pt-br".to_string()]
}

pub fn default_user_id() -> String {
    "demo-user-123".to_string()
}

pub fn default_persist_settings() -> bool {
    true
}
