use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use ns_client::NewsApiClient;
use ns_core::logging::init_logging;
use ns_core::{Article, ArticleSource, NewsApiConfig, SearchConfig, SortCriterion};
use ns_search::{PaginationController, SearchSession, SearchSnapshot, SearchStatus};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search news articles from NewsAPI", long_about = None)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    api_key: String,
    /// Search endpoint, for proxies or test servers
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, default_value_t = ns_core::config::DEFAULT_PAGE_SIZE)]
    page_size: u32,
    /// Quiet period before typed text is searched (interactive mode)
    #[arg(long, default_value_t = 300)]
    debounce_ms: u64,
    /// Stop loading pages once one comes back empty
    #[arg(long)]
    stop_on_empty_page: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run one search and print the results
    Search {
        query: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Sort order: date or title
        #[arg(long, default_value = "date")]
        sort: SortCriterion,
    },
    /// Read search text from stdin, one line per edit
    Interactive,
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum InputEvent {
    Text(String),
    More,
    Sort(usize),
    Open(usize),
    Quit,
}

impl InputEvent {
    fn parse(line: &str) -> std::result::Result<Self, String> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Text(line.to_string()));
        };
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("more"), None) => Ok(Self::More),
            (Some("quit"), None) | (Some("q"), None) => Ok(Self::Quit),
            (Some("sort"), Some(arg)) => arg
                .parse::<SortCriterion>()
                .map(|c| Self::Sort(c.index()))
                .map_err(|e| e.to_string()),
            (Some("open"), Some(arg)) => arg
                .parse::<usize>()
                .map(Self::Open)
                .map_err(|_| format!("Invalid result number: {}", arg)),
            _ => Err(format!("Unknown command: {}", line)),
        }
    }
}

fn build_source(cli: &Cli) -> Result<Arc<dyn ArticleSource>> {
    let mut config = NewsApiConfig::new(cli.api_key.clone())?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url)?;
    }
    let client = NewsApiClient::new(config)?;
    info!("🗞️ Using {} ({:?})", client.name(), client);
    Ok(Arc::new(client))
}

fn build_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = SearchConfig::default().with_page_size(cli.page_size)?;
    config.debounce = Duration::from_millis(cli.debounce_ms);
    config.stop_on_empty_page = cli.stop_on_empty_page;
    Ok(config)
}

fn result_row(index: usize, article: &Article) -> String {
    format!("{:>3}. {}", index, article.list_label().replace('\n', "\n     "))
}

fn print_results(results: &[Article]) {
    for (i, article) in results.iter().enumerate() {
        println!("{}", result_row(i, article));
    }
}

fn print_snapshot(snapshot: &SearchSnapshot) {
    match snapshot.status {
        SearchStatus::Idle => println!("(no search)"),
        SearchStatus::Searching => println!("⏳ Searching '{}' page {}...", snapshot.query, snapshot.page),
        SearchStatus::Ready => {
            print_results(&snapshot.results);
            println!(
                "-- '{}': {} articles, sorted by {}, next page {}{}",
                snapshot.query,
                snapshot.results.len(),
                snapshot.sort,
                snapshot.page,
                if snapshot.exhausted { " (end)" } else { "" }
            );
            if let Some(error) = &snapshot.last_error {
                println!("⚠️ {}", error);
            }
        }
    }
}

/// Loads up to `pages` pages, one attempt each. Stops at the first failed page.
async fn load_pages(controller: &PaginationController, query: &str, pages: u32) {
    controller.on_settled_query(query).await;
    for _ in 1..pages {
        if controller.snapshot().last_error.is_some() || !controller.fetch_next().await {
            break;
        }
    }
}

async fn run_search(
    source: Arc<dyn ArticleSource>,
    config: SearchConfig,
    query: &str,
    pages: u32,
    sort: SortCriterion,
) -> Result<()> {
    let controller = PaginationController::new(source, config);
    controller.set_sort_criterion(sort);
    load_pages(&controller, query, pages).await;

    let snapshot = controller.snapshot();
    if snapshot.results.is_empty() {
        if let Some(error) = snapshot.last_error {
            return Err(anyhow!(error));
        }
    }
    print_snapshot(&snapshot);
    Ok(())
}

async fn run_interactive(source: Arc<dyn ArticleSource>, config: SearchConfig) -> Result<()> {
    let session = SearchSession::new(source, config);
    let mut snapshots = session.controller().subscribe_channel();
    let printer = tokio::spawn(async move {
        let mut last_revision = 0;
        while let Some(snapshot) = snapshots.recv().await {
            if snapshot.revision > last_revision {
                last_revision = snapshot.revision;
                print_snapshot(&snapshot);
            }
        }
    });

    println!("Type to search. Commands: :more, :sort date|title, :open N, :quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match InputEvent::parse(&line) {
            Ok(InputEvent::Text(text)) => session.on_text_changed(text),
            Ok(InputEvent::More) => {
                if !session.on_scrolled_near_bottom().await? {
                    println!("(nothing to load)");
                }
            }
            Ok(InputEvent::Sort(index)) => session.on_sort_option_selected(index)?,
            Ok(InputEvent::Open(index)) => match session.on_result_selected(index) {
                Some(detail) => println!("{}\n", detail),
                None => println!("No result #{}", index),
            },
            Ok(InputEvent::Quit) => break,
            Err(message) => println!("{}", message),
        }
    }

    drop(session);
    printer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = build_source(&cli)?;
    let config = build_config(&cli)?;

    match cli.command {
        Commands::Search { query, pages, sort } => {
            run_search(source, config, &query, pages.max(1), sort).await
        }
        Commands::Interactive => run_interactive(source, config).await,
    }
}
