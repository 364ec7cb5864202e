use crate::constants::{FORBIDDEN_PATH_CHARS, MAX_PATH_LENGTH};
use crate::core_storage::storage::Storage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("Path too long")]
    TooLong,

    #[error("Illegal character in {0:?}")]
    IllegalName(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl PathError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            PathError::TooLong => "500 Command line too long".to_string(),
            PathError::IllegalName(_) => "553 File name not allowed".to_string(),
            PathError::NotFound(path) => format!("550 {} not found.", path),
        }
    }
}

fn is_legal_char(c: char) -> bool {
    (' '..='~').contains(&c) && !FORBIDDEN_PATH_CHARS.contains(c)
}

/// Collapses "." and ".." segments and repeated separators. Never climbs above "/".
fn collapse(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Builds the absolute path named by `param` relative to `cwd`.
///
/// An empty parameter or "/" names the root. The result has no trailing
/// separator except for the root itself.
pub fn make_path(cwd: &str, param: &str) -> Result<String, PathError> {
    if param.chars().any(|c| !is_legal_char(c)) {
        return Err(PathError::IllegalName(param.to_string()));
    }
    let joined = if param.starts_with('/') {
        param.to_string()
    } else {
        format!("{}/{}", cwd, param)
    };
    let path = collapse(&joined);
    if path.len() >= MAX_PATH_LENGTH {
        return Err(PathError::TooLong);
    }
    Ok(path)
}

/// Like `make_path`, and the result must name something that exists.
pub fn make_exists_path(storage: &dyn Storage, cwd: &str, param: &str) -> Result<String, PathError> {
    let path = make_path(cwd, param)?;
    if storage.exists(&path) {
        Ok(path)
    } else {
        Err(PathError::NotFound(path))
    }
}

/// Parent of a canonical path; the root is its own parent.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}
