use clap::{Parser, Subcommand};
use masonry_gallery::api::HttpPhotoApi;
use masonry_gallery::config::{self, GalleryConfig};
use masonry_gallery::gallery::FetchOutcome;
use masonry_gallery::layout::{MasonryLayout, Size};
use masonry_gallery::output;
use masonry_gallery::presenter::{Cell, GalleryPresenter, GridHeightEstimator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that page through results.
#[derive(clap::Args, Clone)]
struct PagingArgs {
    /// Number of pages to load (the first, then one per scroll to the bottom)
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

#[derive(Parser)]
#[command(name = "masonry-gallery")]
#[command(about = "Browse and search a photo API as a masonry grid")]
#[command(long_about = "\
Browse and search a photo API as a masonry grid

Photos are fetched a page at a time and dealt into columns in order
(0, 1, 2, 0, 1, 2, ...). Every item is sized so that four rows fit the
viewport. Additional pages are loaded by scrolling to the bottom of the grid.

The API access key comes from config.toml ([api] client_id) or --client-id.
Set RUST_LOG=masonry_gallery=debug to see each request.

Run 'masonry-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Photo API access key (overrides config)
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Viewport width
    #[arg(long, default_value_t = 390.0, global = true)]
    width: f64,

    /// Viewport height
    #[arg(long, default_value_t = 844.0, global = true)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the latest photos
    Browse(PagingArgs),
    /// Search photos by text
    Search {
        query: String,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Lay out placeholder items without fetching anything
    Layout {
        /// Number of items
        #[arg(long, default_value_t = 20)]
        count: usize,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("masonry_gallery=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let viewport = Size::new(cli.width, cli.height);

    match cli.command {
        Command::Browse(paging) => {
            let config = load(&cli.config, cli.client_id)?;
            let mut presenter = connect(&config, viewport)?;
            let first = presenter.load().await;
            report(&presenter, &first);
            scroll_pages(&mut presenter, paging.pages).await;
            print_presenter_grid(&presenter, &config);
        }
        Command::Search { query, paging } => {
            let config = load(&cli.config, cli.client_id)?;
            let mut presenter = connect(&config, viewport)?;
            if let Some(first) = presenter.update_search(&query).await {
                report(&presenter, &first);
                scroll_pages(&mut presenter, paging.pages).await;
            }
            print_presenter_grid(&presenter, &config);
        }
        Command::Layout { count } => {
            let config = config::load_config(&cli.config)?;
            let mut layout = MasonryLayout::new(config.layout.to_masonry());
            layout.set_bounds(viewport);
            let estimator = GridHeightEstimator::new(viewport.height, &config.grid);
            layout.prepare(count, Some(&estimator));
            let cells: Vec<Cell> = layout
                .attributes()
                .iter()
                .map(|a| Cell {
                    index: a.index,
                    column: a.column,
                    frame: a.frame,
                    image_id: format!("item-{}", a.index),
                    url: None,
                })
                .collect();
            output::print_grid(&cells, config.layout.columns, layout.content_size());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and apply the `--client-id` override.
fn load(
    path: &std::path::Path,
    client_id: Option<String>,
) -> Result<GalleryConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    if let Some(id) = client_id {
        config.api.client_id = id;
    }
    config.require_client_id()?;
    Ok(config)
}

fn connect(
    config: &GalleryConfig,
    viewport: Size,
) -> Result<GalleryPresenter, Box<dyn std::error::Error>> {
    let api = HttpPhotoApi::new(&config.api)?;
    Ok(GalleryPresenter::new(Arc::new(api), config, viewport))
}

fn report(presenter: &GalleryPresenter, outcome: &FetchOutcome) {
    output::print_fetch(outcome, presenter.items().len());
}

/// Scroll to the bottom until `pages` pages have been requested or a fetch fails.
async fn scroll_pages(presenter: &mut GalleryPresenter, pages: u32) {
    for _ in 1..pages {
        let bottom = (presenter.content_size().height - presenter.viewport().size.height).max(0.0);
        match presenter.on_scroll(bottom).await {
            Some(outcome) => {
                report(presenter, &outcome);
                if !outcome.is_appended() {
                    break;
                }
            }
            None => break,
        }
    }
}

fn print_presenter_grid(presenter: &GalleryPresenter, config: &GalleryConfig) {
    output::print_grid(
        &presenter.cells(),
        config.layout.columns,
        presenter.content_size(),
    );
}
