use crate::commands::init_app;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use serde_json::json;

pub async fn run_watch(id: u64, output: &Output) -> Result<()> {
    let app = init_app()?;

    if !app.library.contains(id) {
        output.warn(format!("Record {} is not in the shelf", id));
    }

    let watched = app
        .watched
        .toggle(id)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let title = app
        .library
        .get(id)
        .map(|r| r.title)
        .unwrap_or_else(|| format!("#{}", id));

    match output.format() {
        OutputFormat::Human => {
            if watched {
                output.success(format!("Marked {} as watched", title));
            } else {
                output.success(format!("Unmarked {}", title));
            }
        }
        _ => {
            output.json(&json!({
                "type": "watch",
                "id": id,
                "watched": watched,
            }));
        }
    }
    Ok(())
}
