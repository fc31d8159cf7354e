use std::io::{self, BufRead, BufReader, Read};

use log::{debug, trace};
use thiserror::Error;

use crate::peaks::{Peak, PeakList};
use crate::spectrum::Spectrum;

/// How the reader treats a token that is not a well-formed `mz:intensity` pair
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Skip the token and keep reading the rest of the line
    #[default]
    Lenient,
    /// Abort the read at the first malformed token
    Strict,
}

#[derive(Debug, Error)]
pub enum PeakListError {
    #[error("Encountered a malformed peak token {token:?} at position {position}")]
    MalformedToken { token: String, position: usize },
    #[error("Encountered an IO error: {0}")]
    IOError(
        #[from]
        #[source]
        io::Error,
    ),
}

impl From<PeakListError> for io::Error {
    fn from(value: PeakListError) -> Self {
        match value {
            PeakListError::IOError(e) => e,
            e => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// Receives each spectrum the reader produces. Ownership of the spectrum
/// passes to the handler.
pub trait SpectrumHandler {
    fn handle(&mut self, spectrum: Spectrum);
}

impl<F: FnMut(Spectrum)> SpectrumHandler for F {
    fn handle(&mut self, spectrum: Spectrum) {
        (self)(spectrum)
    }
}

/// The result of parsing a single peak list, with the number of tokens that
/// were dropped along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPeakList {
    pub spectrum: Spectrum,
    pub skipped: usize,
}

/// Parse one `mz:intensity` token, splitting on the first `:`.
pub fn parse_peak_token(token: &str) -> Option<Peak> {
    let (mz, intensity) = token.split_once(':')?;
    let mz = mz.parse::<f64>().ok()?;
    let intensity = intensity.parse::<f64>().ok()?;
    let peak = Peak::new(mz, intensity);
    peak.is_valid().then_some(peak)
}

/// Parse a whitespace separated list of `mz:intensity` tokens.
///
/// In [`ParseMode::Lenient`] this never fails: malformed tokens are counted in
/// [`ParsedPeakList::skipped`] and an input without any valid token produces an
/// empty spectrum.
pub fn parse_peak_list(text: &str, mode: ParseMode) -> Result<ParsedPeakList, PeakListError> {
    let mut peaks = PeakList::default();
    let mut skipped = 0;
    for (position, token) in text.split_whitespace().enumerate() {
        match parse_peak_token(token) {
            Some(peak) => peaks.push(peak),
            None => match mode {
                ParseMode::Lenient => {
                    debug!("Skipping malformed peak token {token:?} at position {position}");
                    skipped += 1;
                }
                ParseMode::Strict => {
                    return Err(PeakListError::MalformedToken {
                        token: token.to_string(),
                        position,
                    })
                }
            },
        }
    }
    Ok(ParsedPeakList {
        spectrum: Spectrum::from(peaks),
        skipped,
    })
}

/// Reads a single peak list from a character stream and hands the resulting
/// [`Spectrum`] to a [`SpectrumHandler`].
///
/// The reader holds nothing but its [`ParseMode`], so one instance may be used
/// for any number of reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeakListReader {
    mode: ParseMode,
}

impl PeakListReader {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(ParseMode::Strict)
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Read the whole stream as one peak list and deliver exactly one spectrum
    /// to `handler`.
    ///
    /// Returns the number of tokens that were skipped. On error the handler is
    /// not invoked.
    pub fn read_spectrum<R: Read, H: SpectrumHandler + ?Sized>(
        &self,
        mut stream: R,
        handler: &mut H,
    ) -> Result<usize, PeakListError> {
        let mut buffer = String::new();
        stream.read_to_string(&mut buffer)?;
        let parsed = parse_peak_list(&buffer, self.mode)?;
        trace!(
            "Read a spectrum with {} peaks, skipping {} tokens",
            parsed.spectrum.len(),
            parsed.skipped
        );
        handler.handle(parsed.spectrum);
        Ok(parsed.skipped)
    }

    /// Parse a string as one peak list, returning the spectrum directly
    pub fn read_str(&self, text: &str) -> Result<Spectrum, PeakListError> {
        parse_peak_list(text, self.mode).map(|p| p.spectrum)
    }
}

const BUFFER_SIZE: usize = 8192;

/// Reads a file of peak lists, one spectrum per line.
///
/// Each line is either a bare peak list or `id,peaks`, where everything before
/// the first comma is taken as the spectrum identifier. Blank lines are
/// ignored. Reading stops at the first error, which is available through
/// [`PeakListLineReader::error`].
pub struct PeakListLineReader<R: Read> {
    handle: BufReader<R>,
    reader: PeakListReader,
    line: String,
    line_number: usize,
    error: Option<PeakListError>,
}

impl<R: Read> PeakListLineReader<R> {
    pub fn new(stream: R, mode: ParseMode) -> Self {
        Self::with_buffer_capacity(stream, mode, BUFFER_SIZE)
    }

    pub fn with_buffer_capacity(stream: R, mode: ParseMode, capacity: usize) -> Self {
        Self {
            handle: BufReader::with_capacity(capacity, stream),
            reader: PeakListReader::new(mode),
            line: String::new(),
            line_number: 0,
            error: None,
        }
    }

    /// Get the error if reading stopped early
    pub fn error(&self) -> Option<&PeakListError> {
        self.error.as_ref()
    }

    /// The number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next non-blank line into a spectrum
    pub fn read_next(&mut self) -> Option<Result<Spectrum, PeakListError>> {
        loop {
            self.line.clear();
            match self.handle.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (id, peaks) = match trimmed.split_once(',') {
                Some((id, peaks)) => (Some(id.trim().to_string()), peaks),
                None => (None, trimmed),
            };
            return Some(self.reader.read_str(peaks).map(|mut spectrum| {
                spectrum.id = id;
                spectrum
            }));
        }
    }

    /// Feed every remaining spectrum to `handler`, returning how many were
    /// delivered.
    pub fn read_into<H: SpectrumHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<usize, PeakListError> {
        let mut n = 0;
        while let Some(result) = self.read_next() {
            handler.handle(result?);
            n += 1;
        }
        Ok(n)
    }
}

impl<R: Read> Iterator for PeakListLineReader<R> {
    type Item = Spectrum;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        match self.read_next()? {
            Ok(spectrum) => Some(spectrum),
            Err(e) => {
                debug!("Stopping at line {}: {e}", self.line_number);
                self.error = Some(e);
                None
            }
        }
    }
}
