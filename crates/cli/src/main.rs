mod echo;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use geolens_core::{
    AnalyzeOptions, FetchConfig, GeoAnalyzer, GeoConfig, JinaReader, OutputFormat, TextOptions, WorkersAiClient,
    formatters, read_file, read_stdin,
};
use owo_colors::OwoColorize;

use crate::echo::{
    format_size, print_analysis_summary, print_banner, print_comparison_summary, print_info, print_rewrite_summary,
    print_step, print_success, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Score content for how likely AI answer engines are to extract and cite it
#[derive(Parser, Debug)]
#[command(name = "geolens")]
#[command(author = "GeoLens Contributors")]
#[command(version)]
#[command(about = "Score content for AI answer-engine citation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format (json, markdown)
    #[arg(short, long, global = true, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip the model-backed semantic stage
    #[arg(long, global = true)]
    no_llm: bool,

    /// Workers AI model id
    #[arg(long, global = true, value_name = "MODEL")]
    model: Option<String>,

    /// Maximum characters of content sent to the model
    #[arg(long, global = true, value_name = "NUM")]
    max_chars: Option<usize>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for reader requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Jina API key
    #[arg(long, global = true, env = "JINA_API_KEY", hide_env_values = true, value_name = "KEY")]
    jina_key: Option<String>,

    /// Cloudflare account id for Workers AI
    #[arg(long, global = true, env = "CLOUDFLARE_ACCOUNT_ID", value_name = "ID")]
    account_id: Option<String>,

    /// Cloudflare API token for Workers AI
    #[arg(long, global = true, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    api_token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a URL, a local text/HTML/Markdown file, or "-" for stdin
    Analyze {
        /// URL, file path, or "-"
        #[arg(value_name = "INPUT")]
        input: String,

        /// Target search query
        #[arg(short, long)]
        query: String,

        /// Title for file or stdin input
        #[arg(long)]
        title: Option<String>,

        /// Competitor URL to analyze alongside (repeatable)
        #[arg(long = "competitor", value_name = "URL")]
        competitors: Vec<String>,

        /// Discover competitors by searching for the query
        #[arg(long)]
        discover: bool,
    },

    /// Analyze several URLs for the same query and rank them
    Compare {
        /// Pages to compare
        #[arg(value_name = "URL", num_args = 2.., required = true)]
        urls: Vec<String>,

        /// Target search query
        #[arg(short, long)]
        query: String,
    },

    /// Compare a live page with a rewritten draft
    Rewrite {
        /// URL of the existing page
        #[arg(long, value_name = "URL")]
        original: String,

        /// File holding the rewritten content, or "-" for stdin
        #[arg(long, value_name = "FILE")]
        optimized: String,

        /// Target search query
        #[arg(short, long)]
        query: String,
    },

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn build_analyzer(cli: &Cli) -> anyhow::Result<GeoAnalyzer> {
    let mut builder = GeoConfig::builder();
    if let Some(model) = &cli.model {
        builder = builder.model_id(model.clone());
    }
    if let Some(max_chars) = cli.max_chars {
        builder = builder.max_content_chars(max_chars);
    }

    let mut fetch = FetchConfig::default().with_timeout(cli.timeout);
    if let Some(key) = &cli.jina_key {
        fetch = fetch.with_api_key(key.clone());
    }
    if let Some(user_agent) = &cli.user_agent {
        fetch.user_agent = user_agent.clone();
    }

    let reader = JinaReader::new(fetch).context("Failed to build HTTP client")?;
    let analyzer = GeoAnalyzer::new(Arc::new(reader), builder.build());

    if cli.no_llm {
        if cli.verbose {
            print_info("Semantic stage disabled");
        }
        return Ok(analyzer);
    }

    match (&cli.account_id, &cli.api_token) {
        (Some(account), Some(token)) => {
            let client = WorkersAiClient::new(account.clone(), token.clone(), cli.timeout)
                .context("Failed to build Workers AI client")?;
            Ok(analyzer.with_model(Arc::new(client)))
        }
        _ => {
            if cli.verbose {
                print_warning("No Workers AI credentials; semantic stage skipped");
            }
            Ok(analyzer)
        }
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        read_stdin().context("Failed to read from stdin")
    } else {
        read_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn write_output(output: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("geolens_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "geolens", &mut std::io::stdout());
        return Ok(());
    }

    if cli.verbose {
        print_banner();
        init_tracing();
    }

    let analyzer = build_analyzer(&cli)?;

    let rendered = match &cli.command {
        Command::Analyze { input, query, title, competitors, discover } => {
            let envelope = if is_url(input) {
                if cli.verbose {
                    print_step(1, 2, &format!("Analyzing {}", input.bright_white().underline()));
                }
                let options = AnalyzeOptions {
                    competitor_urls: competitors.clone(),
                    auto_discover_competitors: *discover,
                    ..Default::default()
                };
                analyzer.analyze(input, query, options).await.context("Analysis failed")?
            } else {
                if !competitors.is_empty() || *discover {
                    bail!("Competitor analysis needs a URL input");
                }
                let text = read_input(input)?;
                if cli.verbose {
                    print_step(1, 2, &format!("Analyzing local input ({})", format_size(text.len())));
                }
                let options = TextOptions {
                    title: title.clone(),
                    url: (input != "-").then(|| format!("file://{}", input)),
                    ..Default::default()
                };
                analyzer.analyze_text(&text, query, options).await.context("Analysis failed")?
            };

            if cli.verbose {
                print_analysis_summary(&envelope);
                print_step(2, 2, "Writing output");
            }
            formatters::render(&envelope, cli.format)?
        }
        Command::Compare { urls, query } => {
            if cli.verbose {
                print_step(1, 2, &format!("Comparing {} pages", urls.len()));
            }
            let report = analyzer.compare(urls, query).await.context("Comparison failed")?;
            if cli.verbose {
                print_comparison_summary(&report);
                print_step(2, 2, "Writing output");
            }
            formatters::render(&report, cli.format)?
        }
        Command::Rewrite { original, optimized, query } => {
            let text = read_input(optimized)?;
            if cli.verbose {
                print_step(1, 2, &format!("Validating rewrite of {}", original.bright_white().underline()));
            }
            let validation =
                analyzer.validate_rewrite(original, &text, query).await.context("Rewrite validation failed")?;
            if cli.verbose {
                print_rewrite_summary(&validation);
                print_step(2, 2, "Writing output");
            }
            formatters::render(&validation, cli.format)?
        }
        Command::Completions { .. } => unreachable!("handled before the analyzer is built"),
    };

    write_output(cli.output.as_deref(), &rendered)
}
