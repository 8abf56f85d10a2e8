use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use sandbox_prep::{
    SandboxConfig, SandboxFile,
    host::JsonLinesChannel,
    orchestrator::process_and_deliver,
    transpile::{PassthroughTranspiler, compile_files},
};

/// Prepare JavaScript files for the sandboxed preview.
#[derive(Parser, Debug)]
#[command(name = "sandbox-prep", version, about)]
struct Cli {
    /// Files of the batch; each file's stem becomes its name
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file with names, helper imports and default options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Format each file before the other transformers run
    #[arg(long)]
    pre_format: bool,

    /// Export top-level functions of non-entry files too
    #[arg(long)]
    export_functions: bool,

    /// Do not instrument top-level loops
    #[arg(long)]
    no_loop_protection: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Returns whether the batch was prepared without errors.
fn run(cli: &Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    config.options.pre_format |= cli.pre_format;
    config.options.export_functions |= cli.export_functions;
    config.options.infinite_loop_protection = !cli.no_loop_protection;

    let files = cli
        .files
        .iter()
        .map(|path| read_file(path))
        .collect::<Result<Vec<_>>>()?;
    let files = compile_files(files, &PassthroughTranspiler);

    let stdout = io::stdout().lock();
    let mut channel = JsonLinesChannel::new(stdout);
    let prepared = process_and_deliver(&files, &config, &mut channel)?;

    if prepared.iter().any(|file| file.error.is_some()) {
        // Only the error-display file is left; emit it for the caller to run.
        let mut stdout = channel.into_inner();
        serde_json::to_writer(&mut stdout, &prepared)
            .context("failed to write error report")?;
        writeln_flush(&mut stdout)?;
        return Ok(false);
    }

    info!("Delivered {} file(s)", prepared.len());
    Ok(true)
}

fn read_file(path: &Path) -> Result<SandboxFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(SandboxFile::new(name, content))
}

fn writeln_flush(writer: &mut impl io::Write) -> Result<()> {
    writeln!(writer).context("failed to write output")?;
    writer.flush().context("failed to flush output")
}
