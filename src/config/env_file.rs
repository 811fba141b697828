//! `.env` file support
//!
//! Parsing is left to `dotenvy`, which handles quoting, escapes, `export`
//! prefixes and trailing comments. Variables are collected into a map rather
//! than written into the process environment, so the caller decides
//! precedence.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{BlogError, Result};

/// Load variables from a `.env` file. A missing file yields an empty map.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(env_error(path, e)),
    };

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(dotenvy::Error::LineParse(line, _)) => {
                tracing::warn!("Ignoring malformed .env line: {}", line);
            }
            Err(e) => return Err(env_error(path, e)),
        }
    }

    tracing::debug!("Loaded environment file {:?}", path);
    Ok(vars)
}

fn env_error(path: &Path, error: dotenvy::Error) -> BlogError {
    match error {
        dotenvy::Error::Io(source) => BlogError::io(path, source),
        other => BlogError::Config(format!("{:?}: {}", path, other)),
    }
}
