use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use smoothie_core::config::Config;
use smoothie_core::preload::HttpPreloader;
use smoothie_core::storage::FileStorage;
use smoothie_core::{
    extract_tokens, title_case_hyphen_join, DictionarySource, Document, HttpLookup, Normalizer,
    Page, SubmissionController, SubmitOutcome,
};
use tracing_subscriber::EnvFilter;

/// Smoothie Mixer — look up smoothies and normalize their ingredients
#[derive(Parser)]
#[command(name = "smoothie", version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No stdout output; exit code only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a smoothie by name and render it
    Lookup {
        /// Smoothie name as typed by the user
        name: String,
        /// Animate progress, preload the image and remember the name
        #[arg(long)]
        progress: bool,
        /// Output the rendered page as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: Sources,
    },

    /// Resubmit the most recently stored name
    Replay {
        /// Output the rendered page as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        sources: Sources,
    },

    /// Replace ingredient names by their standard form
    Normalize {
        /// Ingredient names
        #[arg(required = true)]
        tokens: Vec<String>,
        /// Path or URL of the reference dictionary
        #[arg(long)]
        dictionary: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract recognized ingredients from free text
    Tokenize {
        /// Free-text ingredient field
        text: String,
        /// Path or URL of the reference dictionary
        #[arg(long)]
        dictionary: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format a name as a hyphen-joined title label
    Title {
        text: String,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct Sources {
    /// Path or URL of the reference dictionary
    #[arg(long)]
    dictionary: Option<String>,
    /// Base URL of the lookup endpoint
    #[arg(long)]
    api_url: Option<String>,
    /// File holding the last submitted name
    #[arg(long)]
    storage: Option<PathBuf>,
}

impl Sources {
    fn apply(self, mut config: Config) -> Config {
        if let Some(dictionary) = self.dictionary {
            config.dictionary = DictionarySource::parse(&dictionary);
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        if let Some(storage) = self.storage {
            config.storage_path = storage;
        }
        config
    }
}

// ── Terminal page ──────────────────────────────────────────

/// Page that also draws the progress overlay on stderr
struct TerminalPage {
    page: Page,
    live: bool,
}

impl Document for TerminalPage {
    fn set_headline(&mut self, text: &str) {
        self.page.set_headline(text);
    }

    fn set_image(&mut self, src: &str, label: &str) {
        self.page.set_image(src, label);
    }

    fn set_category(&mut self, text: &str) {
        self.page.set_category(text);
    }

    fn replace_ingredients(&mut self, items: &[String]) {
        self.page.replace_ingredients(items);
    }

    fn set_blank(&mut self, blank: bool) {
        self.page.set_blank(blank);
    }

    fn set_pulse(&mut self, on: bool) {
        self.page.set_pulse(on);
    }

    fn show_progress(&mut self, percent: u8) {
        if self.live && self.page.progress != Some(percent) {
            let filled = usize::from(percent) / 5;
            let bar = format!("{}{}", "#".repeat(filled), " ".repeat(20 - filled));
            eprint!("\r[{}] {:>3}%", bar.green(), percent);
            let _ = std::io::stderr().flush();
        }
        self.page.show_progress(percent);
    }

    fn hide_progress(&mut self) {
        if self.live && self.page.progress.is_some() {
            eprintln!();
        }
        self.page.hide_progress();
    }
}

// ── Commands ───────────────────────────────────────────────

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn load_normalizer(dictionary: Option<String>) -> Normalizer {
    let source = match dictionary {
        Some(location) => DictionarySource::parse(&location),
        None => Config::load().dictionary,
    };
    Normalizer::load(&source).await
}

/// Lookup (or replay when `name` is `None`) and print the rendered page
async fn run_submission(
    config: Config,
    name: Option<String>,
    progress: bool,
    json: bool,
    quiet: bool,
) -> i32 {
    let lookup = match HttpLookup::new(&config.api_url) {
        Ok(lookup) => lookup,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return 2;
        }
    };
    let normalizer = Normalizer::load(&config.dictionary).await;
    let document = TerminalPage {
        page: Page::new(),
        live: progress && !quiet && !json,
    };

    let mut controller = SubmissionController::new(normalizer, Box::new(lookup), document)
        .with_storage(Box::new(FileStorage::new(&config.storage_path)))
        .with_timing(config.timing);

    if progress {
        match HttpPreloader::new(config.timing.preload_timeout) {
            Ok(preloader) => controller = controller.with_preloader(Box::new(preloader)),
            Err(e) => tracing::warn!(error = %e, "image preloading disabled"),
        }
    }

    let outcome = match name {
        Some(name) if progress => controller.submit_with_progress(&name).await,
        Some(name) => controller.submit(&name).await,
        None => controller.replay().await,
    };

    let page = controller.into_document().page;
    match outcome {
        SubmitOutcome::Rendered { .. } => {
            if !quiet {
                print_page(&page, json);
            }
            0
        }
        SubmitOutcome::Ignored => {
            if !quiet {
                eprintln!("{} nothing to submit", "warning:".yellow().bold());
            }
            1
        }
        SubmitOutcome::Failed { error, .. } => {
            if json && !quiet {
                let output = serde_json::json!({ "rendered": false, "error": error.to_string() });
                println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            } else if !quiet {
                eprintln!("{} {}", "error:".red().bold(), error);
            }
            2
        }
    }
}

fn print_page(page: &Page, json: bool) {
    if json {
        match serde_json::to_string_pretty(page) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
        return;
    }

    println!("{}", page.headline.bold());
    println!("  {} {}", "taste:".dimmed(), page.category.cyan());
    println!("  {} {}", "image:".dimmed(), page.image.src);
    println!("  {}", "ingredients:".dimmed());
    for item in &page.ingredients {
        println!("    - {}", item);
    }
}

fn print_list(items: &[String], json: bool) {
    if json {
        println!("{}", serde_json::json!(items));
    } else {
        for item in items {
            println!("{}", item);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let quiet = cli.quiet;

    let exit_code = match cli.command {
        Commands::Lookup {
            name,
            progress,
            json,
            sources,
        } => {
            let config = sources.apply(Config::load());
            run_submission(config, Some(name), progress, json, quiet).await
        }
        Commands::Replay { json, sources } => {
            let config = sources.apply(Config::load());
            run_submission(config, None, true, json, quiet).await
        }
        Commands::Normalize {
            tokens,
            dictionary,
            json,
        } => {
            let normalizer = load_normalizer(dictionary).await;
            if !quiet {
                print_list(&normalizer.canonicalize(&tokens), json);
            }
            0
        }
        Commands::Tokenize {
            text,
            dictionary,
            json,
        } => {
            let normalizer = load_normalizer(dictionary).await;
            if !quiet {
                print_list(&extract_tokens(&text, &normalizer), json);
            }
            0
        }
        Commands::Title { text } => {
            if !quiet {
                println!("{}", title_case_hyphen_join(&text));
            }
            0
        }
        Commands::Version => {
            println!(
                "smoothie {} (smoothie-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            0
        }
    };

    process::exit(exit_code);
}
