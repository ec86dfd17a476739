use std::sync::Arc;

use meetbot_db::Database;
use meetbot_storage::AudioStorage;

pub type AppState = Arc<AppStateInner>;

/// Built once at startup and handed to every request. Storage is optional:
/// without bucket configuration the audio endpoint serves placeholder
/// links instead of signed URLs.
pub struct AppStateInner {
    pub db: Database,
    pub storage: Option<AudioStorage>,
}
