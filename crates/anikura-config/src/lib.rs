pub mod config;
pub mod paths;

pub use config::{Config, FetchOptions, TranslationOptions};
pub use paths::PathManager;
