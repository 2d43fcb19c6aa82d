//! lintforge CLI
//!
//! Command-line interface for generating, addressing and inspecting ESLint
//! flat configuration artifacts

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use lintforge_core::init_tracing;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lintforge")]
#[command(about = "Generate ESLint flat configs for every combination of feature flags")]
#[command(version = lintforge_core::VERSION)]
#[command(
    long_about = "lintforge composes upstream ESLint presets into one configuration artifact per\n\
combination of feature flags and addresses each artifact by a short stable identifier.\n\
\n\
Examples:\n  \
lintforge generate                        # Write all artifacts to dist/configs\n  \
lintforge generate --format json          # Write JSON artifacts instead of ES modules\n  \
lintforge id react testing                # Identifier of one flag combination\n  \
lintforge show react --variant effective/js\n  \
lintforge catalog fetch -o biome.json     # Snapshot the Biome rule catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to settings file (.lintforgerc.json/.lintforgerc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for generation
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the artifact of every flag combination
    #[command(alias = "gen")]
    Generate {
        /// Directory artifacts are written to
        #[arg(short, long, help = "Output directory (default: dist/configs)")]
        output_dir: Option<PathBuf>,

        /// Artifact format
        #[arg(short, long, help = "Artifact format: esm or json (default: esm)")]
        format: Option<String>,

        /// File the base configuration is resolved for
        #[arg(long, help = "Base target file (default: index.tsx)")]
        base_target: Option<String>,

        /// External preset bundle
        #[arg(long, help = "Preset bundle replacing the built-in snapshot")]
        presets: Option<PathBuf>,

        /// Catalog endpoint
        #[arg(long, env = "LINTFORGE_CATALOG_URL", help = "Biome rule catalog URL")]
        catalog_url: Option<String>,

        /// Catalog snapshot on disk
        #[arg(long, help = "Biome rule catalog snapshot (skips fetching)")]
        catalog_path: Option<PathBuf>,

        /// Skip the catalog entirely
        #[arg(
            long,
            help = "Do not load a catalog; permutations with biome are reported as failures",
            conflicts_with_all = ["catalog_url", "catalog_path"]
        )]
        no_catalog: bool,

        /// Include rules Biome is only inspired by
        #[arg(long, help = "Also suppress rules Biome is only inspired by")]
        include_inspired: bool,

        /// Report format
        #[arg(long, default_value = "human", help = "Report format")]
        report: OutputFormat,
    },

    /// Print the identifier and vector of a flag combination
    Id {
        /// Enabled flags
        #[arg(help = "Enabled flags (node, react, strict, style, disabled, fast, biome, testing)")]
        flags: Vec<String>,

        /// Decode a flag vector instead of encoding flags
        #[arg(long, conflicts_with = "flags", help = "Flag vector to decode")]
        vector: Option<u32>,

        /// Output format
        #[arg(long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Load a generated artifact and print its configurations
    Show {
        /// Enabled flags
        #[arg(help = "Enabled flags of the artifact to load")]
        flags: Vec<String>,

        /// Directory the artifacts were written to
        #[arg(short, long, help = "Artifact directory (default: from settings)")]
        dir: Option<PathBuf>,

        /// Only print one named configuration
        #[arg(long, help = "Print a single configuration (base or effective/<kind>)")]
        variant: Option<String>,
    },

    /// Biome rule catalog operations
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Settings management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Fetch the catalog and store a snapshot for offline runs
    Fetch {
        /// Catalog endpoint
        #[arg(long, env = "LINTFORGE_CATALOG_URL", help = "Biome rule catalog URL")]
        url: Option<String>,

        /// Snapshot file
        #[arg(short, long, help = "Snapshot file path")]
        output: PathBuf,
    },

    /// List catalog entries with their suppressed ESLint rule
    List {
        /// Catalog snapshot on disk
        #[arg(long, help = "Catalog snapshot (default: from settings, else fetch)")]
        path: Option<PathBuf>,

        /// Include rules Biome is only inspired by
        #[arg(long, help = "Include rules Biome is only inspired by")]
        include_inspired: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new settings file
    Init {
        /// Settings file format
        #[arg(long, default_value = "json", help = "Settings file format")]
        format: ConfigFormat,

        /// Overwrite existing settings file
        #[arg(long, help = "Overwrite existing settings file")]
        force: bool,
    },

    /// Show resolved settings
    Show,

    /// Print the JSON Schema of the settings file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON settings format
    Json,
    /// TOML settings format
    Toml,
}

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async_main())
}

async fn async_main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "lintforge=error",
        1 => "lintforge=warn",
        2 => "lintforge=info",
        3 => "lintforge=debug",
        _ => "lintforge=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("{} Failed to set thread pool size: {e}", "error:".red().bold());
        std::process::exit(1);
    }

    match run_command(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Dispatch the parsed command; the returned value is the process exit code
async fn run_command(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Some(Commands::Generate {
            output_dir,
            format,
            base_target,
            presets,
            catalog_url,
            catalog_path,
            no_catalog,
            include_inspired,
            report,
        }) => {
            let overrides = commands::generate::GenerateOverrides {
                output_dir,
                format,
                base_target,
                presets,
                catalog_url,
                catalog_path,
                no_catalog,
                include_inspired,
            };
            commands::generate::generate_command(overrides, report, cli.config).await
        }

        Some(Commands::Id {
            flags,
            vector,
            format,
        }) => commands::id_command(flags, vector, format).map(|()| 0),

        Some(Commands::Show {
            flags,
            dir,
            variant,
        }) => commands::show_command(flags, dir, variant, cli.config).map(|()| 0),

        Some(Commands::Catalog { action }) => match action {
            CatalogAction::Fetch { url, output } => {
                commands::catalog::fetch_command(url, output, cli.config).await
            }
            CatalogAction::List {
                path,
                include_inspired,
            } => commands::catalog::list_command(path, include_inspired, cli.config).await,
        }
        .map(|()| 0),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config::init_command(format, force),
            ConfigAction::Show => commands::config::show_command(cli.config),
            ConfigAction::Schema => commands::config::schema_command(),
        }
        .map(|()| 0),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("lintforge {}", lintforge_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Flags: {}", lintforge_core::FLAGS.len());
            } else {
                println!("{}", lintforge_core::VERSION);
            }
            Ok(0)
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(0)
        }
    }
}
