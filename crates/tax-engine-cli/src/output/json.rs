use serde_json::Value;
use std::io::Write;

/// Write a computation envelope (or the rate table) to stdout as indented
/// JSON, so it can be piped back in with `--input` or `--config`.
pub fn print_json(value: &Value) {
    let mut out = std::io::stdout().lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(|e| e.to_string())
        .and_then(|()| writeln!(out).map_err(|e| e.to_string()));
    if let Err(e) = written {
        eprintln!("Could not write JSON output: {}", e);
    }
}
