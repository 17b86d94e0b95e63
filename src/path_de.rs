use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages. `origin` names the
/// source (file, `file:line`) for the error.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<T> {
    let json_error = |path: String, message: String| Error::Json {
        origin: origin.to_owned(),
        path,
        message,
    };
    let de = &mut serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize(&mut *de)
        .map_err(|err| json_error(err.path().to_string(), err.into_inner().to_string()))?;
    de.end().map_err(|err| json_error(".".to_owned(), err.to_string()))?;
    Ok(value)
}

/// One value per non-blank line.
pub fn values_from_ndjson(src: &str, origin: &str) -> Result<Vec<Value>> {
    src.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| from_str_with_path(line, &format!("{origin}:{}", i + 1)))
        .collect()
}

pub fn values_from_str(src: &str, origin: &str, ndjson: bool) -> Result<Vec<Value>> {
    if ndjson {
        values_from_ndjson(src, origin)
    } else {
        from_str_with_path(src, origin).map(|v| vec![v])
    }
}
