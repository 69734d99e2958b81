pub mod clear;
pub mod export;
pub mod fetch;
pub mod list;
pub mod stats;
pub mod watch;

use anikura_core::App;
use color_eyre::Result;

/// Load shared state, mapping the anyhow error into eyre.
pub fn init_app() -> Result<App> {
    App::init().map_err(|e| color_eyre::eyre::eyre!("{}", e))
}
