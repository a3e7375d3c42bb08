mod echo;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use excerpta_core::{
    DumpConfig, FallbackPolicy, FetchConfig, FileProvider, FullTextProvider, HttpProvider, Query, Store, find,
    prepare,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::echo::{print_banner, print_matches, print_step, print_strategy, print_success, print_timing, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Positional ordering failure kinds that can be kept from falling back
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FallbackKind {
    /// The article could not be fetched
    Fetch,
    /// The article had no text
    Empty,
    /// A highlight was not found in the article
    MissingQuote,
}

/// Dump the highlights of a saved article in reading order
#[derive(Parser, Debug)]
#[command(name = "excerpta")]
#[command(author = "Excerpta Contributors")]
#[command(version)]
#[command(about = "Dump saved-article highlights in reading order", long_about = None)]
struct Args {
    /// Title words to search for (joined with spaces)
    #[arg(value_name = "TITLE", conflicts_with = "title")]
    words: Vec<String>,

    /// JSON export of saved items
    #[arg(short, long, value_name = "FILE", required_unless_present = "completions")]
    data: Option<PathBuf>,

    /// Title to search for
    #[arg(short, long, value_name = "TITLE")]
    title: Option<String>,

    /// URL to search for
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Directory to write the dump to (default: <data dir>/excerpta/annotations)
    #[arg(long, value_name = "DIR")]
    dest_dir: Option<PathBuf>,

    /// Number of candidates to consider
    #[arg(short = 'n', long, default_value = "5", value_name = "NUM")]
    top_n: usize,

    /// List matching items instead of dumping
    #[arg(short, long)]
    list: bool,

    /// Print the dump to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Read the article from a saved HTML file instead of fetching it
    #[arg(long, value_name = "FILE")]
    article_html: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Fail instead of falling back to creation-time order for this kind of failure
    #[arg(long, value_name = "KIND", value_enum)]
    no_fallback_on: Vec<FallbackKind>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

impl Args {
    fn query(&self) -> Option<Query> {
        let words = (!self.words.is_empty()).then(|| self.words.join(" "));
        let title = self.title.clone().or(words);
        Query::new(title.as_deref(), self.url.as_deref()).ok()
    }

    fn fallback(&self) -> FallbackPolicy {
        let mut policy = FallbackPolicy::default();
        for kind in &self.no_fallback_on {
            match kind {
                FallbackKind::Fetch => policy.on_fetch_failure = false,
                FallbackKind::Empty => policy.on_empty_article = false,
                FallbackKind::MissingQuote => policy.on_missing_quote = false,
            }
        }
        policy
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "excerpta", &mut io::stdout());
        return Ok(());
    }

    let Some(query) = args.query() else {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "a title or a URL is required")
            .exit();
    };

    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
    }

    let data = args.data.clone().context("No export given")?;
    let mut builder = DumpConfig::builder(data)
        .top_n(args.top_n)
        .fallback(args.fallback())
        .fetch(FetchConfig {
            timeout: args.timeout,
            user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
        });
    if let Some(dir) = &args.dest_dir {
        builder = builder.dest_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    if args.list {
        return list(&config, &query);
    }

    match &args.article_html {
        Some(path) => run(&args, &config, &query, &FileProvider::new(path)).await,
        None => run(&args, &config, &query, &HttpProvider::new(config.fetch.clone())).await,
    }
}

fn list(config: &DumpConfig, query: &Query) -> anyhow::Result<()> {
    let store = Store::load(&config.data_path)
        .with_context(|| format!("Failed to load export: {}", config.data_path.display()))?;
    let matches = find(&store, query, config.top_n).context("Search failed")?;

    if matches.is_empty() {
        print_warning("No item found");
    } else {
        print_matches(&matches);
    }

    Ok(())
}

async fn run<P: FullTextProvider>(args: &Args, config: &DumpConfig, query: &Query, provider: &P) -> anyhow::Result<()> {
    let started = Instant::now();

    if args.verbose {
        print_step(1, 2, &format!("Matching {}", config.data_path.display().bright_white()));
    }

    let prepared = prepare(config, query, provider)
        .await
        .with_context(|| format!("Failed to dump highlights from {}", config.data_path.display()))?;

    let Some(prepared) = prepared else {
        let wanted = query.title().or(query.url()).unwrap_or_default();
        print_warning(&format!("No item found for {}", wanted));
        return Ok(());
    };

    if args.verbose {
        if let Some(title) = &prepared.title {
            eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
        }
        eprintln!("  {} {}", "Score:".dimmed(), format!("{:.1}", prepared.score).bright_white());
        eprintln!();
        print_step(2, 2, "Writing output");
    }

    print_strategy(prepared.strategy(), prepared.ordered.quotes.len());

    if args.stdout {
        println!("{}", prepared.render());
    } else {
        let path = prepared
            .write(&config.dest_dir)
            .with_context(|| format!("Failed to write to directory: {}", config.dest_dir.display()))?;
        print_success(&format!("Output written to {}", path.display().bright_white()));
    }

    if args.verbose {
        print_timing("Total", started.elapsed());
    }

    Ok(())
}
