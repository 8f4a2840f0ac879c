use std::{env, fs, path::PathBuf};

fn query_arg() -> clap::Arg {
    clap::arg!(-q --query <QUERY> "Target search query").required(true)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("geolens")
        .version("1.0.0")
        .author("GeoLens Contributors")
        .about("Score content for AI answer-engine citation")
        .subcommand_required(true)
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, markdown)")
                .global(true)
                .default_value("json")
                .value_parser(["json", "markdown"]),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"no-llm" "Skip the model-backed semantic stage").global(true))
        .arg(clap::arg!(--model <MODEL> "Workers AI model id").global(true))
        .arg(clap::arg!(--"max-chars" <NUM> "Maximum characters of content sent to the model").global(true))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").global(true).default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for reader requests").global(true))
        .arg(clap::arg!(--"jina-key" <KEY> "Jina API key").global(true))
        .arg(clap::arg!(--"account-id" <ID> "Cloudflare account id for Workers AI").global(true))
        .arg(clap::arg!(--"api-token" <TOKEN> "Cloudflare API token for Workers AI").global(true))
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("analyze")
                .about("Analyze a URL, a local text/HTML/Markdown file, or \"-\" for stdin")
                .arg(clap::arg!(<INPUT> "URL, file path, or '-'"))
                .arg(query_arg())
                .arg(clap::arg!(--title <TITLE> "Title for file or stdin input"))
                .arg(clap::arg!(--competitor <URL> "Competitor URL to analyze alongside").action(clap::ArgAction::Append))
                .arg(clap::arg!(--discover "Discover competitors by searching for the query")),
        )
        .subcommand(
            clap::Command::new("compare")
                .about("Analyze several URLs for the same query and rank them")
                .arg(clap::arg!(<URL> ... "Pages to compare").num_args(2..))
                .arg(query_arg()),
        )
        .subcommand(
            clap::Command::new("rewrite")
                .about("Compare a live page with a rewritten draft")
                .arg(clap::arg!(--original <URL> "URL of the existing page").required(true))
                .arg(
                    clap::arg!(--optimized <FILE> "File holding the rewritten content, or '-' for stdin")
                        .required(true),
                )
                .arg(query_arg()),
        )
        .subcommand(
            clap::Command::new("completions")
                .about("Generate a shell completion script")
                .arg(clap::arg!(<SHELL> "Shell").value_parser(["bash", "zsh", "fish", "powershell", "elvish"])),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "geolens", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "geolens", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "geolens", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "geolens", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
