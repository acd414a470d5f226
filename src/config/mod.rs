mod config;

pub use config::{PushConfig, CONFIG_FILE_NAME};
