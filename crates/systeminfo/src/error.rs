use core::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    path: Option<PathBuf>,
    source: ErrorSource,
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, source: ErrorSource, path: Option<PathBuf>) -> Self {
        Self { kind, source, path }
    }

    pub(crate) fn with_path(
        kind: ErrorKind,
        source: impl Into<ErrorSource>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(kind, source.into(), Some(path.into()))
    }

    pub(crate) fn without_path(kind: ErrorKind, source: impl Into<ErrorSource>) -> Self {
        Self::new(kind, source.into(), None)
    }

    pub(crate) fn unreadable(error: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::with_path(ErrorKind::Unreadable, error, path)
    }

    pub(crate) fn unparseable(source: impl Into<ErrorSource>, path: impl Into<PathBuf>) -> Self {
        Self::with_path(ErrorKind::Unparseable, source, path)
    }

    /// A helper program could not be run or exited unsuccessfully.
    pub(crate) fn command(source: impl Into<ErrorSource>, program: &str) -> Self {
        Self::with_path(ErrorKind::Command, source, program)
    }

    /// The output of a helper program could not be parsed.
    pub(crate) fn output(source: impl Into<ErrorSource>, program: &str) -> Self {
        Self::with_path(ErrorKind::Output, source, program)
    }

    pub(crate) fn invalid_block_name() -> Self {
        Self::without_path(ErrorKind::InvalidBlockName, ErrorSource::None)
    }

    /// The SMBIOS decode error behind this error, if any.
    pub fn smbios(&self) -> Option<&crate::smbios::Error> {
        match &self.source {
            ErrorSource::Smbios(e) => Some(e),
            _ => None,
        }
    }

    /// True if the failure came from a missing program, file or table.
    pub fn is_not_found(&self) -> bool {
        match &self.source {
            ErrorSource::Io(e) => e.kind() == io::ErrorKind::NotFound,
            ErrorSource::Smbios(crate::smbios::Error::NotFound) => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ErrorSource {
    Io(io::Error),
    Smbios(crate::smbios::Error),
    Json(serde_json::Error),
    ParseInt(ParseIntError),
    Status(ExitStatus, String),
    None,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ErrorKind {
    Smbios,
    Unreadable,
    Unparseable,
    Command,
    Output,
    InvalidBlockName,
}

impl From<io::Error> for ErrorSource {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ErrorSource {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ParseIntError> for ErrorSource {
    fn from(value: ParseIntError) -> Self {
        Self::ParseInt(value)
    }
}

impl From<crate::smbios::Error> for Error {
    fn from(value: crate::smbios::Error) -> Self {
        Self::without_path(ErrorKind::Smbios, ErrorSource::Smbios(value))
    }
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Smbios(e) => e.fmt(f),
            Self::Json(e) => e.fmt(f),
            Self::ParseInt(e) => e.fmt(f),
            Self::Status(status, stderr) if stderr.is_empty() => status.fmt(f),
            Self::Status(status, stderr) => write!(f, "{status}: {stderr}"),
            Self::None => f.write_str("<no source error>"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match self.kind {
            ErrorKind::Smbios => write!(f, "smbios error: {}", self.source),
            ErrorKind::Unreadable => write!(f, "unable to read {path}: {}", self.source),
            ErrorKind::Unparseable => write!(f, "unable to parse {path}: {}", self.source),
            ErrorKind::Command => write!(f, "failed to run {path}: {}", self.source),
            ErrorKind::Output => write!(f, "unexpected output from {path}: {}", self.source),
            ErrorKind::InvalidBlockName => f.write_str("block device name is not valid utf-8"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            ErrorSource::Io(e) => Some(e),
            ErrorSource::Smbios(e) => Some(e),
            ErrorSource::Json(e) => Some(e),
            ErrorSource::ParseInt(e) => Some(e),
            ErrorSource::Status(..) | ErrorSource::None => None,
        }
    }
}
