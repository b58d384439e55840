use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse an `--input` request file (an invoice, payroll run, schedule policy
/// and so on) into the command's input type.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let request = resolve_path(path)?;
    let contents = fs::read_to_string(&request)
        .map_err(|e| format!("Cannot read request file '{}': {}", request.display(), e))?;
    let parsed = serde_json::from_str(&contents)
        .map_err(|e| format!("Request file '{}' is not valid: {}", request.display(), e))?;
    Ok(parsed)
}

/// Locate a request or `--config` rate-table file relative to the working
/// directory. Directories and missing paths are reported before any parsing.
pub fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let given = Path::new(path);
    let located = if given.is_absolute() {
        given.to_path_buf()
    } else {
        std::env::current_dir()?.join(given)
    };

    if !located.is_file() {
        let problem = if located.exists() { "is not a file" } else { "does not exist" };
        return Err(format!("{} {}", located.display(), problem).into());
    }
    Ok(located)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_request_file() {
        let err = read_json::<serde_json::Value>("no-such-invoice.json").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_is_not_a_rate_table() {
        let dir = std::env::temp_dir();
        let err = resolve_path(dir.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
