//! CLI binary for recurio.
//!
//! A thin shim over the library crate: `serve` runs the upload form,
//! `analyze` runs the same pipeline on local files and prints the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recurio::{
    config::{DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MODEL, DEFAULT_OCR_ENDPOINT},
    pipeline::upload::guess_content_type,
    AnalysisConfig, Analyzer, PromptVariant, ServerConfig, UploadedFile,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Find repeated exam questions across PDFs and images.
#[derive(Parser, Debug)]
#[command(
    name = "recurio",
    version,
    about = "Find repeated exam questions across PDFs and images with an LLM",
    long_about = "Extracts text from PDF papers (locally) and photographed papers (via an \
OCR API), sends everything to a chat-completion model in one prompt, and returns the \
repeated, similar and commonly asked questions as an HTML list.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "RECURIO_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, global = true, env = "RECURIO_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the upload form over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "RECURIO_LISTEN", default_value = "127.0.0.1:5000")]
        listen: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyse local files and print the resulting HTML list.
    Analyze {
        /// PDF (.pdf) or image (.png, .jpg, .jpeg) files, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the full AnalysisOutput as JSON instead of the HTML result.
        #[arg(long, env = "RECURIO_JSON")]
        json: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

#[derive(Args, Debug)]
struct AnalysisArgs {
    /// OCR.space API key.
    #[arg(long, env = "OCR_API_KEY", default_value = "", hide_env_values = true)]
    ocr_api_key: String,

    /// Completion API key (sent as a bearer token).
    #[arg(long, env = "OPENROUTER_API_KEY", default_value = "", hide_env_values = true)]
    completion_api_key: String,

    /// Model identifier.
    #[arg(long, env = "RECURIO_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat-completion endpoint.
    #[arg(long, env = "RECURIO_COMPLETION_ENDPOINT", default_value = DEFAULT_COMPLETION_ENDPOINT)]
    completion_endpoint: String,

    /// OCR endpoint.
    #[arg(long, env = "RECURIO_OCR_ENDPOINT", default_value = DEFAULT_OCR_ENDPOINT)]
    ocr_endpoint: String,

    /// OCR language code.
    #[arg(long, env = "RECURIO_OCR_LANGUAGE", default_value = "eng")]
    ocr_language: String,

    /// OCR engine version.
    #[arg(long, env = "RECURIO_OCR_ENGINE", default_value = "2")]
    ocr_engine: String,

    /// Instruction template: common (all repeated questions) or top-ten.
    #[arg(long, env = "RECURIO_PROMPT", value_enum, default_value = "common")]
    prompt: PromptArg,

    /// Use uploaded filenames verbatim instead of sanitising them.
    #[arg(long, env = "RECURIO_RAW_FILENAMES")]
    raw_filenames: bool,

    /// Files extracted at once (output order is unaffected).
    #[arg(long, env = "RECURIO_EXTRACT_CONCURRENCY", default_value_t = 1)]
    extract_concurrency: usize,

    /// OCR call timeout in seconds.
    #[arg(long, env = "RECURIO_OCR_TIMEOUT", default_value_t = 60)]
    ocr_timeout: u64,

    /// Completion call timeout in seconds.
    #[arg(long, env = "RECURIO_COMPLETION_TIMEOUT", default_value_t = 120)]
    completion_timeout: u64,

    /// Largest accepted upload request in MiB.
    #[arg(long, env = "RECURIO_MAX_UPLOAD_MB", default_value_t = 32)]
    max_upload_mb: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PromptArg {
    Common,
    TopTen,
}

impl From<PromptArg> for PromptVariant {
    fn from(v: PromptArg) -> Self {
        match v {
            PromptArg::Common => PromptVariant::CommonQuestions,
            PromptArg::TopTen => PromptVariant::TopTen,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve { listen, analysis } => {
            let config = build_config(&analysis)?;
            let analyzer = Arc::new(Analyzer::new(config).context("Failed to start analyzer")?);
            let server = ServerConfig {
                listen_addr: listen,
            };
            recurio::server::serve(&server, analyzer, shutdown_signal())
                .await
                .context("Server failed")?;
        }
        Command::Analyze {
            files,
            json,
            analysis,
        } => {
            let config = build_config(&analysis)?;
            let analyzer = Analyzer::new(config).context("Failed to start analyzer")?;
            let uploads = read_files(&files).await?;
            let output = analyzer.analyze(&uploads).await;

            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if json {
                let json =
                    serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
                writeln!(handle, "{json}").context("Failed to write to stdout")?;
            } else {
                writeln!(handle, "{}", output.html()).context("Failed to write to stdout")?;
            }

            if !cli.quiet {
                eprintln!(
                    "Extracted {}/{} files, {} bytes of text, {}ms",
                    output.stats.extracted,
                    output.stats.files,
                    output.stats.corpus_bytes,
                    output.stats.extraction_ms + output.stats.completion_ms
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(args: &AnalysisArgs) -> Result<AnalysisConfig> {
    AnalysisConfig::builder()
        .ocr_api_key(&args.ocr_api_key)
        .completion_api_key(&args.completion_api_key)
        .model(&args.model)
        .completion_endpoint(&args.completion_endpoint)
        .ocr_endpoint(&args.ocr_endpoint)
        .ocr_language(&args.ocr_language)
        .ocr_engine(&args.ocr_engine)
        .prompt_variant(args.prompt.into())
        .sanitize_filenames(!args.raw_filenames)
        .extract_concurrency(args.extract_concurrency)
        .ocr_timeout_secs(args.ocr_timeout)
        .completion_timeout_secs(args.completion_timeout)
        .max_upload_bytes(args.max_upload_mb.saturating_mul(1024 * 1024))
        .build()
        .context("Invalid configuration")
}

/// Read local files into uploads, guessing the content type from the name.
async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = guess_content_type(&filename);
        uploads.push(UploadedFile::new(filename, content_type, bytes));
    }
    Ok(uploads)
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
