//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use passgen_core::request::MAX_PASS_COUNT;
use passgen_core::session::ACCESS_DENIED_MESSAGE;
use passgen_core::{
    AccessGate, ConsoleCollector, ConsoleDelivery, DownloadDelivery, ExportFormat, FormCollector,
    FormSubmission, GateStatus, GenerationOutcome, PassType, Pipeline, Session, Settings,
};

/// Pass type as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PassTypeArg {
    /// Front of house
    Foh,
    /// Back of house
    Boh,
    /// Load/unload, with entry time and deck
    LoadUnload,
}

impl From<PassTypeArg> for PassType {
    fn from(arg: PassTypeArg) -> Self {
        match arg {
            PassTypeArg::Foh => PassType::Foh,
            PassTypeArg::Boh => PassType::Boh,
            PassTypeArg::LoadUnload => PassType::LoadUnload,
        }
    }
}

/// Export format as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Word document
    #[default]
    Docx,
    /// PDF, falling back to DOCX when no converter works
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Docx => ExportFormat::Docx,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Parser)]
#[command(name = "passgen")]
#[command(author, version, about = "Printable event passes from DOCX templates", long_about = None)]
struct Cli {
    /// Configuration file path (default: passgen.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer prompts one by one and save the passes
    Console {
        /// Do not ask for an export format; always write DOCX
        #[arg(long)]
        no_format_prompt: bool,
    },

    /// Generate from typed fields, behind the shared access key
    Form(FormArgs),
}

#[derive(Debug, clap::Args)]
struct FormArgs {
    /// Pass type
    #[arg(long, value_enum)]
    pass_type: PassTypeArg,

    /// Event name
    #[arg(long)]
    event_name: String,

    /// Dates (e.g. 07/24/2025)
    #[arg(long, default_value = "")]
    dates: String,

    /// Cell phone number
    #[arg(long, default_value = "")]
    cell_phone: String,

    /// Number of passes
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_PASS_COUNT as i64))]
    count: u32,

    /// BOH entry time (load/unload passes)
    #[arg(long)]
    time_entered: Option<String>,

    /// Deck (load/unload passes)
    #[arg(long)]
    deck: Option<String>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "docx")]
    format: FormatArg,

    /// Access key (prompted for on stdin when omitted)
    #[arg(long)]
    key: Option<String>,
}

impl FormArgs {
    fn submission(&self) -> FormSubmission {
        FormSubmission {
            pass_type: self.pass_type.into(),
            event_name: self.event_name.clone(),
            dates: self.dates.clone(),
            cell_phone: self.cell_phone.clone(),
            pass_count: self.count,
            time_entered: self.time_entered.clone(),
            deck: self.deck.clone(),
            export_format: self.format.into(),
        }
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Console { no_format_prompt } => {
            let stdin = io::stdin();
            console_command(settings, stdin.lock(), io::stdout(), io::stdout(), !no_format_prompt)?;
        }
        Commands::Form(args) => {
            let key = match &args.key {
                Some(key) => key.clone(),
                None => read_key(io::stdin().lock(), io::stderr())?,
            };
            let gate = AccessGate::from_env(&settings.access);
            let mut session = Session::new();
            form_command(settings, &gate, &mut session, &key, args.submission(), io::stdout())?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise the level follows `-v`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load settings from `--config` or the working directory
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let settings = Settings::discover(&cwd, config).with_context(|| match config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;
    Ok(settings)
}

/// Execute the console flow: prompts on `prompts`, result line on `results`
pub fn console_command<R: BufRead, W1: Write, W2: Write>(
    settings: Settings,
    input: R,
    prompts: W1,
    results: W2,
    ask_format: bool,
) -> Result<GenerationOutcome> {
    let mut collector = ConsoleCollector::new(input, prompts);
    if !ask_format {
        collector = collector.without_format_prompt();
    }
    let mut delivery = ConsoleDelivery::new(results);

    let outcome = Pipeline::new(settings)
        .run(&mut collector, &mut delivery)
        .context("❌ Could not generate passes")?;
    Ok(outcome)
}

/// Execute the form flow: unlock the session, generate, print a download descriptor
pub fn form_command<W: Write>(
    settings: Settings,
    gate: &AccessGate,
    session: &mut Session,
    key: &str,
    submission: FormSubmission,
    output: W,
) -> Result<GenerationOutcome> {
    match gate.unlock(session, key)? {
        GateStatus::Granted => {}
        GateStatus::Prompt => bail!("An access key is required. Pass --key or enter it when prompted."),
        GateStatus::Denied => bail!(ACCESS_DENIED_MESSAGE),
    }

    let mut collector = FormCollector::new(session, submission);
    let mut delivery = DownloadDelivery::new(output);

    let outcome = Pipeline::new(settings)
        .run(&mut collector, &mut delivery)
        .context("Could not generate passes")?;
    Ok(outcome)
}

/// Prompt for the access key on `prompt` and read it from `input`
fn read_key<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> Result<String> {
    write!(prompt, "Enter Access Key: ")?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read the access key")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
