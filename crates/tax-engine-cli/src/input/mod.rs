pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a command's JSON input: an explicit `--input` file wins, then
/// piped stdin. `Ok(None)` means the caller should fall back to flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        tracing::debug!(path, "reading input file");
        return Ok(Some(file::read_json(path)?));
    }
    if let Some(value) = stdin::read_stdin()? {
        tracing::debug!("reading input from stdin");
        return Ok(Some(serde_json::from_value(value)?));
    }
    Ok(None)
}
