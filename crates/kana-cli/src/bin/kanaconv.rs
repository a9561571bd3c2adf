use clap::{Parser, Subcommand};

use kana_cli::commands::{config_ops, convert_ops, explain_ops};

#[derive(Parser)]
#[command(name = "kanaconv", about = "Hankaku/zenkaku and kana conversion")]
struct Cli {
    /// Custom settings TOML (see `settings-export`)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Log conversion details to stderr (requires --features trace)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert stdin or a file to stdout
    Convert {
        /// Mode flags, e.g. "KV" or "rnsKV" (default: convert.default_mode)
        #[arg(short, long)]
        mode: Option<String>,
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
        /// Print character counts and display widths to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Convert a single argument
    Text {
        /// Mode flags
        mode: String,
        /// Text to convert
        text: String,
    },
    /// Show the rule chain a mode compiles to
    Explain {
        /// Mode flags
        mode: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

#[cfg(feature = "trace")]
fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kana_core=debug")),
            )
            .init();
    }
}

#[cfg(not(feature = "trace"))]
fn init_logging(_verbose: bool) {}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(ref file) = cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::Convert { mode, input, stats } => {
            convert_ops::convert_cmd(mode.as_deref(), input.as_deref(), stats);
        }
        Command::Text { mode, text } => convert_ops::text_cmd(&mode, &text),
        Command::Explain { mode, json } => explain_ops::explain_cmd(&mode, json),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
