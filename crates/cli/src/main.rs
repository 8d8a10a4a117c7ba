use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use import_graph_core::export::{self, ExportFormat};
use import_graph_core::{build_graph_with, BuildConfig, FileSetProvider, FsProvider, GraphError};

/// import-graph - File-level import graphs for JavaScript/TypeScript projects
#[derive(Parser)]
#[command(name = "import-graph")]
#[command(version)] // Auto-pull version from Cargo.toml
#[command(about = "Map which files of a project import which", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the import graph of a project and print it
    Build {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        #[command(flatten)]
        options: BuildOptions,
    },
    /// List the source files a build would scan
    Files {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,

        #[command(flatten)]
        options: BuildOptions,
    },
}

#[derive(clap::Args)]
struct BuildOptions {
    /// Configuration file (default: <root>/import-graph.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recognized extensions in resolution preference order, e.g. `ts,js`
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Extra glob patterns to exclude, relative to the root
    #[arg(long)]
    exclude: Vec<String>,

    /// Worker threads for reading and scanning files
    #[arg(long)]
    threads: Option<usize>,

    /// Do not honour .gitignore files
    #[arg(long)]
    no_gitignore: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Cytoscape,
    Dot,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Cytoscape => ExportFormat::Cytoscape,
            Format::Dot => ExportFormat::Dot,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<GraphError>() {
            Some(GraphError::NoFilesFound) => {
                eprintln!("{err:#}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Build {
            root,
            output,
            format,
            options,
        } => {
            let config = load_config(&root, options)?;
            let provider = FsProvider::discover(&root, &config)?;
            let graph = build_graph_with(&provider, &config)
                .with_context(|| format!("while scanning {}", provider.root().display()))?;

            let mut rendered = export::render(&graph, format.into())?;
            if !rendered.ends_with('\n') {
                rendered.push('\n');
            }

            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => std::io::stdout().write_all(rendered.as_bytes())?,
            }
        }
        Command::Files { root, options } => {
            let config = load_config(&root, options)?;
            let provider = FsProvider::discover(&root, &config)?;

            let mut stdout = std::io::stdout().lock();
            for path in provider.files() {
                writeln!(stdout, "{}", path.display())?;
            }
        }
    }

    Ok(())
}

/// Config file (explicit or at the root), then command-line overrides
fn load_config(root: &Path, options: BuildOptions) -> anyhow::Result<BuildConfig> {
    let mut config = match &options.config {
        Some(path) => BuildConfig::from_file(path)?,
        None => BuildConfig::load(root)?,
    };

    if !options.extensions.is_empty() {
        config.extensions = options
            .extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }
    config.exclude.extend(options.exclude);
    if options.threads.is_some() {
        config.threads = options.threads;
    }
    if options.no_gitignore {
        config.respect_gitignore = false;
    }

    Ok(config)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
