use crate::commands::init_app;
use crate::output::Output;
use anikura_core::App;
use color_eyre::Result;

pub async fn run_clear(
    all: bool,
    records: bool,
    watched: bool,
    translations: bool,
    output: &Output,
) -> Result<()> {
    let app = init_app()?;

    if all {
        clear_records(&app, output)?;
        clear_watched(&app, output)?;
        clear_translations(&app, output)?;
        output.success("All shelf data cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if records {
        clear_records(&app, output)?;
        cleared_anything = true;
    }

    if watched {
        clear_watched(&app, output)?;
        cleared_anything = true;
    }

    if translations {
        clear_translations(&app, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --records, --watched, --translations, or --all");
        output.println("\nExample: anikura clear --records");
    }

    Ok(())
}

fn clear_records(app: &App, output: &Output) -> Result<()> {
    let count = app.library.len();
    app.library
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear records: {}", e))?;
    output.success(format!("Cleared {} record(s)", count));
    Ok(())
}

fn clear_watched(app: &App, output: &Output) -> Result<()> {
    let count = app.watched.len();
    app.watched
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear watched marks: {}", e))?;
    output.success(format!("Cleared {} watched mark(s)", count));
    Ok(())
}

fn clear_translations(app: &App, output: &Output) -> Result<()> {
    match &app.translator {
        Some(translator) => {
            let count = translator.cache_len();
            translator
                .clear_cache()
                .map_err(|e| color_eyre::eyre::eyre!("Failed to clear translations: {}", e))?;
            output.success(format!("Cleared {} cached translation(s)", count));
        }
        None => {
            // Translation disabled; drop any snapshot left from earlier runs.
            app.storage
                .clear_translations()
                .map_err(|e| color_eyre::eyre::eyre!("Failed to clear translations: {}", e))?;
            output.success("Cleared translation cache");
        }
    }
    Ok(())
}
