use std::path::Path;
use std::process::Command;

use walkdir::DirEntry;

use crate::error::ErrorSource;
use crate::{Error, Result};

pub(crate) fn read_u64(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();

    let raw = std::fs::read_to_string(path).map_err(|e| Error::unreadable(e, path))?;
    let raw = raw.trim();

    raw.parse().map_err(|e| Error::unparseable(e, path))
}

/// Read a sysfs attribute, `None` if it is missing or empty.
pub(crate) fn read_optional_string(path: impl AsRef<Path>) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let raw = raw.trim();

    (!raw.is_empty()).then(|| raw.to_string())
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Run `program` to completion and return its stdout.
pub(crate) fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!("running {program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::command(e, program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::command(
            ErrorSource::Status(output.status, stderr),
            program,
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Render a byte count as whole gigabytes the way disk sizes are reported.
pub(crate) fn gigabytes(bytes: u64) -> String {
    format!("{} GB", bytes / 1024 / 1024 / 1000)
}
