use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, export, fetch, list, stats, watch};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "anikura")]
#[command(about = "Anikura - build and browse a Chinese-titled anime shelf")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file instead of stderr (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one release year from the catalog
    #[command(long_about = "Fetch top-scored anime for a single release year, store them in the shelf, and queue non-Chinese titles for translation. Defaults to the configured newest year and the light page count.")]
    Fetch {
        /// Release year to fetch (defaults to the configured newest year)
        #[arg(long)]
        year: Option<i32>,

        /// Number of pages to fetch (25 records each)
        #[arg(long)]
        pages: Option<u32>,
    },
    /// Fetch the whole configured year range
    #[command(long_about = "Walk every configured release year, newest first, fetching each into the shelf. A failed year is skipped; everything fetched before it stays stored.")]
    Prefetch {
        /// Fetch the deep page count per year instead of the light one
        #[arg(long, action = ArgAction::SetTrue)]
        deep: bool,
    },
    /// List shelf records
    #[command(long_about = "List stored records, best score first, with duplicate titles collapsed. Filters combine; all are optional.")]
    List {
        /// Only records from this release year
        #[arg(long)]
        year: Option<i32>,

        /// Only this media kind (tv, movie, ova, ona, special, music)
        #[arg(long)]
        kind: Option<String>,

        /// Only this airing status
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive title substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Toggle the watched mark on a record
    Watch {
        /// Record id
        id: u64,
    },
    /// Show shelf coverage statistics
    Stats,
    /// Export a per-year top-titles table
    #[command(long_about = "Render a table of the top-scored titles per release year, newest first, and write it to a file.")]
    Export {
        /// Destination file
        #[arg(long, value_name = "FILE", default_value = "anikura-shelf.txt")]
        out: PathBuf,

        /// Titles per year
        #[arg(long, default_value_t = 12)]
        columns: usize,
    },
    /// Clear stored data
    #[command(long_about = "Clear stored shelf data. Use --records for the record shelf, --watched for watched marks, --translations for the translation cache, or --all for everything.")]
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the record shelf
        #[arg(long, action = ArgAction::SetTrue)]
        records: bool,

        /// Clear watched marks
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Clear the translation cache
        #[arg(long, action = ArgAction::SetTrue)]
        translations: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Fetch { year, pages } => fetch::run_fetch(year, pages, &output).await,
        Commands::Prefetch { deep } => fetch::run_prefetch(deep, &output).await,
        Commands::List {
            year,
            kind,
            status,
            search,
        } => list::run_list(year, kind, status, search, &output).await,
        Commands::Watch { id } => watch::run_watch(id, &output).await,
        Commands::Stats => stats::run_stats(&output).await,
        Commands::Export { out, columns } => export::run_export(out, columns, &output).await,
        Commands::Clear {
            all,
            records,
            watched,
            translations,
        } => clear::run_clear(all, records, watched, translations, &output).await,
    }
}
