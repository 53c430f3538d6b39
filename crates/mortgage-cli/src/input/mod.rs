pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a typed input from `--input <file>` or piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    missing: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_file(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(missing.into())
    }
}
