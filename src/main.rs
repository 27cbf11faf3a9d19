//! CLI entry point for `mailnote`.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use mailnote::config::{self, Config};
use mailnote::joplin::client::JoplinClient;
use mailnote::joplin::file_note::{upload_file_as_note, FileUploadRequest};
use mailnote::mailbox::imap::ImapMailbox;
use mailnote::pipeline::{Pipeline, PipelineSettings};

#[derive(Parser)]
#[command(
    name = "mailnote",
    version,
    about = "Turn unread IMAP messages into Joplin notes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to $MAILNOTE_CONFIG, then the user config dir)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn every unseen message into a note (default)
    Run,
    /// Upload a single file as a note
    Upload {
        /// File to upload; removed after a successful upload
        #[arg(short, long)]
        file: PathBuf,
        /// Target notebook (defaults to joplin.notebook_name)
        #[arg(short, long)]
        notebook: Option<String>,
        /// Tags to add, comma separated
        #[arg(long, value_delimiter = ',')]
        tag: Vec<String>,
        /// Extra extensions imported as text, comma separated
        #[arg(long, value_delimiter = ',', value_name = "EXT")]
        as_plain: Vec<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // These two never need a configuration file
    match cli.command {
        Some(Commands::Completions { shell }) => return cmd_completions(shell),
        Some(Commands::Manpage) => return cmd_manpage(),
        _ => {}
    }

    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let config = config::load_config(&config_path)?;

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);
    tracing::info!(path = %config_path.display(), "Loaded config");

    match cli.command {
        None | Some(Commands::Run) => cmd_run(&config),
        Some(Commands::Upload {
            file,
            notebook,
            tag,
            as_plain,
        }) => cmd_upload(&config, file, notebook, tag, as_plain),
        Some(Commands::Completions { .. }) | Some(Commands::Manpage) => Ok(()),
    }
}

fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailnote.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// One pass over the unseen messages, then a summary on stdout.
fn cmd_run(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    let client = JoplinClient::new(&config.joplin)?;
    let pipeline = Pipeline::new(&client, PipelineSettings::from_config(config));
    let stats = pipeline.run(|| ImapMailbox::connect(&config.imap))?;

    println!("Unseen emails: {}", stats.unseen);
    println!("Notes created: {}", stats.created);
    if stats.failed > 0 {
        println!("Failed: {}", stats.failed);
    }
    Ok(())
}

fn cmd_upload(
    config: &Config,
    file: PathBuf,
    notebook: Option<String>,
    tags: Vec<String>,
    as_plain: Vec<String>,
) -> anyhow::Result<()> {
    config.validate_joplin()?;

    let notebook = notebook.unwrap_or_else(|| config.joplin.notebook_name.clone());
    if notebook.trim().is_empty() {
        anyhow::bail!("no notebook given: pass --notebook or set joplin.notebook_name");
    }
    if !file.is_file() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let mut request = FileUploadRequest::new(file, notebook);
    request.tags = tags;
    request.plain_extensions.extend(as_plain);

    let client = JoplinClient::new(&config.joplin)?;
    let note_id = upload_file_as_note(&client, &request)?;
    println!("Created note {note_id} from {}", request.path.display());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailnote", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
