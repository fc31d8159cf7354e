use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{error, info};

use mzsplash::io::{
    open_text_source, DuplicateFinder, LogSink, ParseMode, PeakListLineReader, RecordReader,
    SplashRecord, StreamSink, TextRecordWriter,
};
use mzsplash::prelude::*;

/// Read peak lists and find duplicated SPLASH records
#[derive(Debug, Parser)]
#[command(version, about)]
struct App {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse `[id,]mz:intensity ...` lines and summarize each spectrum
    Peaks {
        /// The file to read, or `-` for standard input. May be gzip compressed.
        #[arg(default_value = "-")]
        inpath: PathBuf,

        /// Fail on the first malformed peak token instead of skipping it
        #[arg(long)]
        strict: bool,
    },
    /// Write every member of a duplicated SPLASH from records sorted by SPLASH
    Duplicates {
        /// The sorted `splash,origin[,payload]` file to read, or `-` for standard input
        #[arg(default_value = "-")]
        inpath: PathBuf,

        /// Where to write the duplicated records, standard output by default
        #[arg(short, long)]
        outpath: Option<PathBuf>,

        /// Send status reports to the log instead of standard error
        #[arg(long)]
        log_status: bool,
    },
}

fn summarize_peaks(inpath: &Path, mode: ParseMode) -> Result<(), Box<dyn Error>> {
    let source = open_text_source(inpath)?;
    let mut reader = PeakListLineReader::new(source, mode);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut n = 0;
    let mut write_result: io::Result<()> = Ok(());
    reader.read_into(&mut |spectrum: mzsplash::Spectrum| {
        if write_result.is_err() {
            return;
        }
        let id = spectrum.id().unwrap_or("-");
        let (bp_mz, bp_int) = spectrum
            .peaks()
            .base_peak()
            .map(|p| (p.mz(), p.intensity()))
            .unwrap_or_default();
        write_result = writeln!(
            out,
            "{id}\t{}\t{bp_mz}\t{bp_int}\t{}",
            spectrum.len(),
            spectrum.peaks().tic()
        );
        n += 1;
    })?;
    write_result?;
    out.flush()?;
    info!("Read {n} spectra");
    Ok(())
}

fn run_duplicates<S: DiagnosticSink>(
    inpath: &Path,
    output: Box<dyn Write>,
    sink: S,
) -> Result<u64, Box<dyn Error>> {
    let source = open_text_source(inpath)?;
    let mut finder: DuplicateFinder<SplashRecord, _, S> =
        DuplicateFinder::new(TextRecordWriter::new(output), sink);
    finder.init()?;
    for record in RecordReader::new(source) {
        let step = record
            .map_err(io::Error::from)
            .and_then(|record| finder.write_owned(record));
        if let Err(e) = step {
            finder.abort();
            return Err(e.into());
        }
    }
    finder.close()?;
    info!(
        "Found {} duplicates among {} records",
        finder.duplicates_found(),
        finder.records_seen()
    );
    Ok(finder.duplicates_found())
}

fn find_duplicates_in(
    inpath: &Path,
    outpath: Option<&Path>,
    log_status: bool,
) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let output: Box<dyn Write> = match outpath {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout()),
    };
    if log_status {
        run_duplicates(inpath, output, LogSink)?;
    } else {
        run_duplicates(inpath, output, StreamSink::stderr())?;
    }
    info!("Finished in {:0.3?}", start.elapsed());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let app = App::parse();
    let result = match &app.command {
        Command::Peaks { inpath, strict } => {
            let mode = if *strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            };
            summarize_peaks(inpath, mode)
        }
        Command::Duplicates {
            inpath,
            outpath,
            log_status,
        } => find_duplicates_in(inpath, outpath.as_deref(), *log_status),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
