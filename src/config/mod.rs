//! Process configuration read from the environment (and `.env` when present).

mod settings;

pub use settings::{AppConfig, StorageBackend};
