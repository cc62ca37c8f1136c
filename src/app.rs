use std::path::{Path, PathBuf};
use std::pin::pin;

use anyhow::{Context, Result, bail, ensure};
use clap::{Args, Parser, Subcommand};
use cryptingtool::capability::{self, Algorithm, Mode};
use cryptingtool::config::DEFAULT_THREADS;
use cryptingtool::file::{self, FileInfo};
use cryptingtool::gateway::{Gateway, TransformEngine};
use cryptingtool::orchestrator::{Orchestrator, RunOutcome};
use cryptingtool::secret::Password;
use cryptingtool::settings::EncryptionConfig;
use cryptingtool::types::Operation;
use tracing::Level;

use crate::ui::display;
use crate::ui::progress::{self, Bar};
use crate::ui::prompt::Prompt;

#[derive(Args)]
pub struct RunArgs {
    /// Input file path.
    #[arg(short, long)]
    input: PathBuf,

    /// Algorithm name, e.g. `AES-256`, `chacha20` or `3des`.
    #[arg(short, long, default_value = "AES-256")]
    algorithm: String,

    /// Key size in bits (defaults to the algorithm's smallest).
    #[arg(short, long)]
    key_size: Option<u32>,

    /// Block mode (defaults to the algorithm's recommended one).
    #[arg(short, long)]
    mode: Option<String>,

    /// Password (prompted for when omitted).
    #[arg(short, long)]
    password: Option<String>,

    /// Compute threads for the transform (1-16).
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file.
    Encrypt(RunArgs),

    /// Decrypt a file produced by `encrypt`.
    Decrypt(RunArgs),

    /// List every algorithm with its key sizes and modes.
    Algorithms,

    /// Show the transform engine's version and run its self-test.
    Engine,

    /// Start the interactive wizard.
    Interactive,
}

#[derive(Parser)]
#[command(name = "cryptingtool", version, about = "Encrypt and decrypt files with a choice of 35 ciphers. Run without arguments for interactive mode.")]
pub struct App {
    /// Print debug diagnostics.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();
        let level = if app.verbose { Level::DEBUG } else { Level::WARN };
        let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_file(true).with_line_number(true).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(app)
    }

    pub async fn execute(self) -> Result<()> {
        let prompt = Prompt::new(password_min_length());
        match self.command {
            Some(Commands::Encrypt(args)) => Self::run_mode(args, Operation::Encrypt, &prompt).await,
            Some(Commands::Decrypt(args)) => Self::run_mode(args, Operation::Decrypt, &prompt).await,
            Some(Commands::Algorithms) => {
                display::show_algorithms();
                Ok(())
            }
            Some(Commands::Engine) => Self::show_engine().await,
            Some(Commands::Interactive) | None => Self::run_interactive(&prompt).await,
        }
    }

    async fn run_mode(args: RunArgs, operation: Operation, prompt: &Prompt) -> Result<()> {
        let algorithm = capability::algorithm_from_name(&args.algorithm).with_context(|| format!("unknown algorithm: {}", args.algorithm))?;
        let mut config = EncryptionConfig::default().with_algorithm_defaults(algorithm).with_threads(args.threads);
        if let Some(bits) = args.key_size {
            config = config.with_key_size(bits);
        }
        if let Some(name) = &args.mode {
            config = config.with_mode(Mode::from_name(name).with_context(|| format!("unknown mode: {name}"))?);
        }

        let password = match args.password {
            Some(password) => Password::from_string(password),
            None => Password::from_string(prompt.password(operation)?),
        };

        let orchestrator = Self::start_orchestrator().await?;
        orchestrator.update_config(config.with_password(password));
        orchestrator.select_input(&args.input).await?;

        let output = Self::process(&orchestrator, operation).await?;
        display::show_success(operation, &output);

        Ok(())
    }

    async fn run_interactive(prompt: &Prompt) -> Result<()> {
        display::clear_screen()?;
        display::print_banner()?;

        let orchestrator = Self::start_orchestrator().await?;
        let operation = prompt.select_operation()?;

        let files = FileInfo::capture_all(file::discover(Path::new("."), operation)).await;
        ensure!(!files.is_empty(), "no eligible files found for {} operation", operation.label().to_lowercase());

        display::show_files(&files);
        let path = prompt.select_file(&files)?;
        file::validate_input(&path).await?;

        let output = file::output_path(&path, operation);
        if tokio::fs::try_exists(&output).await? && !prompt.confirm_overwrite(&output)? {
            bail!("operation canceled");
        }

        let algorithm = prompt.select_algorithm(&Self::available_algorithms(&orchestrator))?;
        let key_size = prompt.select_key_size(algorithm)?;
        let mode = prompt.select_mode(algorithm)?;
        let password = Password::from_string(prompt.password(operation)?);

        let config = EncryptionConfig::new(algorithm, key_size, mode, password, DEFAULT_THREADS);
        orchestrator.update_config(config);
        orchestrator.select_input(&path).await?;

        let result = Self::process(&orchestrator, operation).await;
        display::show_log(orchestrator.snapshot().log());

        display::show_success(operation, &result?);
        Ok(())
    }

    async fn show_engine() -> Result<()> {
        let gateway = Gateway::initialize(engine())?;
        let self_test = {
            let gateway = gateway.clone();
            tokio::task::spawn_blocking(move || gateway.self_test()).await?
        };

        display::show_engine(gateway.version(), gateway.algorithm_ids().as_deref(), gateway.mode_ids().as_deref(), &self_test);
        Ok(())
    }

    async fn start_orchestrator() -> Result<Orchestrator> {
        let orchestrator = Orchestrator::new(engine());
        ensure!(orchestrator.initialize().await, "transform engine unavailable");
        Ok(orchestrator)
    }

    /// Runs `operation` with a live progress bar. Ctrl-C cancels the run.
    async fn process(orchestrator: &Orchestrator, operation: Operation) -> Result<PathBuf> {
        let handle = orchestrator.start(operation)?;
        let total = orchestrator.snapshot().progress().total_bytes;
        let bar = Bar::new(total, &format!("{}...", operation.progress_label()))?;

        let run = async {
            let mut wait = pin!(handle.wait());
            tokio::select! {
                outcome = &mut wait => outcome,
                _ = tokio::signal::ctrl_c() => {
                    orchestrator.cancel();
                    wait.await
                }
            }
        };

        let (status, outcome) = tokio::join!(progress::follow(orchestrator.subscribe(), &bar), run);
        bar.finish(status);

        match outcome {
            RunOutcome::Succeeded(output) => Ok(output),
            RunOutcome::Failed(message) => bail!("{} failed: {message}", operation.noun()),
            RunOutcome::Cancelled => bail!("operation cancelled"),
        }
    }

    /// Algorithms the engine reports, or the whole matrix when it reports none.
    fn available_algorithms(orchestrator: &Orchestrator) -> Vec<Algorithm> {
        match orchestrator.algorithm_ids() {
            Some(ids) => capability::algorithms().filter(|&algorithm| ids.contains(&capability::native_id(algorithm))).collect(),
            None => capability::algorithms().collect(),
        }
    }
}

#[cfg(not(feature = "native"))]
fn engine() -> impl TransformEngine + 'static {
    cryptingtool::engine::ReferenceEngine::new()
}

#[cfg(feature = "native")]
fn engine() -> impl TransformEngine + 'static {
    cryptingtool::gateway::NativeEngine
}

const fn password_min_length() -> usize {
    if cfg!(feature = "native") { cryptingtool::config::NATIVE_PASSWORD_MIN_LENGTH } else { cryptingtool::config::PASSWORD_MIN_LENGTH }
}
