mod message;
mod profile;
mod settings;
mod snapshot;

pub use message::{ChatMessage, Message, Role};
pub use profile::{ProfileData, ProfilePreferences, ProfileUpdate, UserProfile};
pub use settings::{SettingsUpdate, UserSettings};
pub use snapshot::PersistedHistorySnapshot;
