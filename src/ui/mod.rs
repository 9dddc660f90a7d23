mod output;
mod render;

pub use output::{
    display_error, display_history, display_info, display_message, display_profile,
    display_settings, display_warning,
};
pub use render::MarkdownRenderer;
