//! Records identified by a SPLASH, read from `splash,origin[,payload]` lines.
use std::cmp;
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value that carries an identity key to compare and order by, and a
/// description of where it came from.
pub trait Identified {
    /// The fingerprint that decides whether two values are duplicates
    fn identity_key(&self) -> &str;

    /// Provenance of the value, e.g. a file name or a database accession
    fn origin(&self) -> &str;
}

impl<T: Identified + ?Sized> Identified for &T {
    fn identity_key(&self) -> &str {
        (**self).identity_key()
    }

    fn origin(&self) -> &str {
        (**self).origin()
    }
}

static SPLASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^splash[0-9a-z]{2}(-[0-9a-z]+){2,3}$").unwrap());

/// Check whether `key` has the block layout of a SPLASH, e.g.
/// `splash10-0udi-0900000000-4f7c7d9d2a94e7ba0e5f`. The hash blocks themselves
/// are not verified.
pub fn is_splash(key: &str) -> bool {
    SPLASH_PATTERN.is_match(key)
}

/// A hashed spectrum record.
///
/// Equality and ordering consider only the SPLASH, so records from different
/// origins with the same fingerprint compare equal.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplashRecord {
    pub splash: String,
    pub origin: String,
    /// Any remaining columns, carried through untouched
    pub payload: Option<String>,
}

impl SplashRecord {
    pub fn new(splash: String, origin: String, payload: Option<String>) -> Self {
        Self {
            splash,
            origin,
            payload,
        }
    }

    pub fn splash(&self) -> &str {
        &self.splash
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl Identified for SplashRecord {
    fn identity_key(&self) -> &str {
        &self.splash
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}

impl PartialEq for SplashRecord {
    fn eq(&self, other: &Self) -> bool {
        self.splash == other.splash
    }
}

impl Eq for SplashRecord {}

impl PartialOrd for SplashRecord {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplashRecord {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.splash.cmp(&other.splash)
    }
}

impl fmt::Display for SplashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.splash, self.origin)?;
        if let Some(payload) = &self.payload {
            write!(f, ",{payload}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("Record line has no identity key: {0:?}")]
    MissingIdentityKey(String),
    #[error("Record line has no origin column: {0:?}")]
    MissingOrigin(String),
}

impl FromStr for SplashRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(3, ',');
        let splash = parts.next().map(str::trim).unwrap_or_default();
        if splash.is_empty() {
            return Err(RecordParseError::MissingIdentityKey(line.to_string()));
        }
        let origin = match parts.next() {
            Some(origin) => origin.trim(),
            None => return Err(RecordParseError::MissingOrigin(line.to_string())),
        };
        let payload = parts.next().map(|p| p.to_string());
        Ok(SplashRecord::new(
            splash.to_string(),
            origin.to_string(),
            payload,
        ))
    }
}

#[derive(Debug, Error)]
pub enum RecordReadError {
    #[error("Failed to parse record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: RecordParseError,
    },
    #[error("Encountered an IO error: {0}")]
    IOError(
        #[from]
        #[source]
        io::Error,
    ),
}

impl From<RecordReadError> for io::Error {
    fn from(value: RecordReadError) -> Self {
        match value {
            RecordReadError::IOError(e) => e,
            e => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// Reads one [`SplashRecord`] per non-blank line of a buffered stream.
pub struct RecordReader<R: BufRead> {
    handle: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(handle: R) -> Self {
        Self {
            handle,
            line: String::new(),
            line_number: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn into_inner(self) -> R {
        self.handle
    }

    pub fn read_next(&mut self) -> Option<Result<SplashRecord, RecordReadError>> {
        loop {
            self.line.clear();
            match self.handle.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            if self.line.trim().is_empty() {
                continue;
            }
            let record = match self.line.parse::<SplashRecord>() {
                Ok(record) => record,
                Err(source) => {
                    return Some(Err(RecordReadError::Parse {
                        line: self.line_number,
                        source,
                    }))
                }
            };
            if !is_splash(&record.splash) {
                warn!(
                    "Line {} has an identity key that does not look like a SPLASH: {}",
                    self.line_number, record.splash
                );
            }
            return Some(Ok(record));
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<SplashRecord, RecordReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}
