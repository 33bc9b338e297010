//! Key layout and value encoding.
//!
//! ```text
//! status/<id>        -> [1] valid | [0] invalid
//! log/<u64 BE>       -> JSON PublicationRecord
//! meta/next_log_id   -> u64 BE
//! ```

use super::errors::StatusError;

/// Prefix of every status row.
pub const STATUS_PREFIX: &[u8] = b"status/";

/// Prefix of every publication log row.
pub const LOG_PREFIX: &[u8] = b"log/";

/// Key holding the next publication log id.
pub const NEXT_LOG_ID_KEY: &[u8] = b"meta/next_log_id";

/// Key of the status row for `id`.
pub fn status_key(id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(STATUS_PREFIX.len() + id.len());
    key.extend_from_slice(STATUS_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Id encoded in a status key, if the key belongs to the status prefix.
pub fn id_from_status_key(key: &[u8]) -> Option<String> {
    key.strip_prefix(STATUS_PREFIX)
        .and_then(|id| std::str::from_utf8(id).ok())
        .map(str::to_string)
}

/// Key of the publication log row `log_id`. Big-endian so scans are ordered.
pub fn log_key(log_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(LOG_PREFIX.len() + 8);
    key.extend_from_slice(LOG_PREFIX);
    key.extend_from_slice(&log_id.to_be_bytes());
    key
}

/// Encode a status as a single byte.
pub fn encode_status(status: bool) -> [u8; 1] {
    [u8::from(status)]
}

/// Decode a stored status.
///
/// Accepts the canonical single byte and, for rows imported from older
/// deployments, the strings `valid`/`invalid`/`1`/`0` in any case.
pub fn decode_status(id: &str, value: &[u8]) -> Result<bool, StatusError> {
    match value {
        [1] => return Ok(true),
        [0] => return Ok(false),
        _ => {}
    }

    let text = std::str::from_utf8(value).map_err(|e| StatusError::Corrupt {
        key: id.to_string(),
        message: e.to_string(),
    })?;
    match text.trim().to_ascii_lowercase().as_str() {
        "valid" | "1" | "true" => Ok(true),
        "invalid" | "0" | "false" => Ok(false),
        other => Err(StatusError::Corrupt {
            key: id.to_string(),
            message: format!("unrecognized status value {:?}", other),
        }),
    }
}
