mod commands;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use commands::generate::GenerateArgs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "pbxgen",
    version,
    about = "Generate Xcode project manifests (project.pbxproj) from blueprints"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    /// Without a subcommand, generates the default preset into the current directory.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Built-in preset to generate from.
    #[arg(long, conflicts_with = "blueprint")]
    preset: Option<String>,
    /// Path to a blueprint TOML file.
    #[arg(long)]
    blueprint: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a project manifest.
    Generate {
        #[command(flatten)]
        source: SourceArgs,
        /// Directory the .xcodeproj bundle is created in.
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
        /// Seed for reproducible object identifiers.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the manifest to stdout instead of writing it.
        #[arg(long, default_value_t = false)]
        stdout: bool,
    },
    /// Build and verify the object graph without writing anything.
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a blueprint file from a preset.
    New {
        /// Destination path.
        #[arg(default_value = commands::new::DEFAULT_BLUEPRINT)]
        path: PathBuf,
        /// Preset to start from.
        #[arg(long)]
        preset: Option<String>,
        /// Project name to put in the blueprint.
        #[arg(long)]
        name: Option<String>,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// List built-in presets.
    Presets,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PBXGEN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let current_dir = PathBuf::from(".");

    let result = match cli.command {
        None => commands::generate::run(
            &GenerateArgs {
                preset: None,
                blueprint: None,
                output_dir: &current_dir,
                seed: None,
                stdout: false,
            },
            json_output,
        ),
        Some(Commands::Generate {
            source,
            output_dir,
            seed,
            stdout,
        }) => commands::generate::run(
            &GenerateArgs {
                preset: source.preset.as_deref(),
                blueprint: source.blueprint.as_deref(),
                output_dir: &output_dir,
                seed,
                stdout,
            },
            json_output,
        ),
        Some(Commands::Check { source }) => commands::check::run(
            source.preset.as_deref(),
            source.blueprint.as_deref(),
            json_output,
        ),
        Some(Commands::New {
            path,
            preset,
            name,
            force,
        }) => commands::new::run(
            &path,
            preset.as_deref(),
            name.as_deref(),
            force,
            json_output,
        ),
        Some(Commands::Presets) => commands::presets::run(json_output),
        Some(Commands::Completions { shell }) => commands::completions::run::<Cli>(shell),
        Some(Commands::ManPages { dir }) => commands::man_pages::run::<Cli>(&dir, json_output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}
