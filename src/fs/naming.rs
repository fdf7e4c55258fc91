//! Filename sanitization.

use crate::error::{Error, Result};

fn reject_special(name: &str, sanitized: &str) -> Result<()> {
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(format!(
            "Name cannot be empty or whitespace-only: '{}'",
            name
        )));
    }

    if sanitized == "." || sanitized == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    Ok(())
}

/// Turn a display title into a file name.
///
/// Spaces become `_`, path separators are removed and characters that are
/// reserved on common filesystems become `_`.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let sanitized: String = name
        .trim()
        .chars()
        .filter(|c| *c != '/' && *c != '\\')
        .map(|c| match c {
            ' ' => '_',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    reject_special(name, &sanitized)?;
    Ok(sanitized)
}

/// Sanitize one path component (course, folder or file name).
///
/// Separators and reserved characters become `_`; spaces are kept.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    reject_special(name, &sanitized)?;
    Ok(sanitized)
}
