use anyhow::{Context, Result};
use argh::FromArgs;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use transcript_replay::command::ExitCode;
use transcript_replay::config::Settings;
use transcript_replay::env::Environment;
use transcript_replay::{DEFAULT_TRANSCRIPT, Session, logging, shell};

#[derive(FromArgs)]
/// Rebuild the directory tree described by a shell transcript in a temporary
/// directory and open an interactive shell inside it.
struct Args {
    #[argh(positional)]
    /// transcript to replay; the bundled sample is used when omitted.
    input: Option<PathBuf>,
}

fn main() {
    let args: Args = argh::from_env();
    let env = Environment::new();
    let settings = Settings::from_env(&env);

    if let Err(e) = logging::init_logging(&settings.log_filter) {
        eprintln!("Failed to initialize logging: {e:#}");
        process::exit(1);
    }

    // `run` owns the session, so the temporary root is gone before we exit.
    let code = match run(&args, &env, &settings) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            1
        }
    };
    process::exit(code);
}

fn run(args: &Args, env: &Environment, settings: &Settings) -> Result<ExitCode> {
    let interactive = shell::interactive_shell(settings, env)?;
    let session = Session::create(settings)?;

    let summary = session
        .materialize(open_input(args.input.as_deref())?)
        .context("failed to replay transcript")?;
    info!(files = summary.files, directories = summary.directories, "tree ready");

    let mut stdout = std::io::stdout();
    stdout.write_all(shell::banner(session.root()).as_bytes())?;
    stdout.flush()?;

    let code = session.launch(Box::new(interactive), env)?;
    session.close()?;
    Ok(code)
}

/// The transcript at `input`, or the bundled one when no path was given.
fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match input {
        Some(path) => {
            info!(input = %path.display(), "reading transcript");
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("reading bundled transcript");
            Ok(Box::new(Cursor::new(DEFAULT_TRANSCRIPT)))
        }
    }
}
