//! VarLens DAP bridge — entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use varlens_dap::bridge::CaptureConfig;
use varlens_dap::capture::{visualize_image, visualize_variable, JsonLineSink};
use varlens_dap::config::{resolve_adapter_addr, resolve_output_dir, resolve_script_dir};
use varlens_dap::protocol::DapClient;
use varlens_dap::resolve::{resolve_expression, InteractivePrompt};
use varlens_dap::types::CaptureError;

#[derive(Parser)]
#[command(
    name = "varlens-dap",
    about = "Visualize a variable from a paused debug target, or an image file, as a canonical tensor",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a variable from the active debug session and emit it for
    /// rendering.
    Variable {
        /// Expression to evaluate. Prompted for interactively when omitted.
        expression: Option<String>,

        /// Debug adapter endpoint (host:port).
        /// Also reads from VARLENS_DAP_ADDR.
        #[arg(long)]
        connect: Option<String>,

        /// Directory holding the companion serialization script.
        #[arg(long)]
        script_dir: Option<String>,

        /// Directory for the transient output files.
        #[arg(long)]
        output_dir: Option<String>,

        /// Bound, in seconds, on each adapter round trip.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },

    /// Decode an image file and emit it for rendering.
    Image {
        /// Path to the image. Its format is sniffed from content, never from
        /// the extension.
        path: PathBuf,
    },

    /// Print supported formats and resolved defaults as JSON.
    Info,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Variable {
            expression,
            connect,
            script_dir,
            output_dir,
            timeout_secs,
        } => {
            let mut prompt = InteractivePrompt::new()?;
            let expr = match resolve_expression(expression.as_deref(), None, &mut prompt) {
                Ok(expr) => expr,
                Err(CaptureError::NoVariableSelected) => {
                    eprintln!("nothing to visualize");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let addr = resolve_adapter_addr(connect.as_deref())
                .ok_or(CaptureError::NoActiveSession)?;
            let mut session = DapClient::connect(&addr).await?;

            let mut config = CaptureConfig::new(
                resolve_script_dir(script_dir.as_deref()),
                resolve_output_dir(output_dir.as_deref()),
            );
            config.request_timeout = Duration::from_secs(timeout_secs);

            let mut sink = JsonLineSink::stdout();
            visualize_variable(&mut session, &expr, &config, &mut sink).await?;
        }

        Commands::Image { path } => {
            let mut sink = JsonLineSink::stdout();
            visualize_image(&path, &mut sink)?;
        }

        Commands::Info => {
            let formats: Vec<_> = varlens::ImageKind::ALL.iter().map(|k| k.mime()).collect();
            let info = serde_json::json!({
                "formats": formats,
                "adapter_addr": resolve_adapter_addr(None),
                "script_dir": resolve_script_dir(None),
                "output_dir": resolve_output_dir(None),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "varlens-dap", &mut std::io::stdout());
        }
    }

    Ok(())
}
