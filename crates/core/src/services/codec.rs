//! Cursor token codec.
//!
//! A token is standard base64 (padded) of the decimal form of the
//! ordering key, so `3` becomes `"Mw=="`. Tokens already handed to clients
//! depend on this format; change it only behind a versioned prefix.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{PaginationError, PaginationResult};
use crate::ports::Cursor;

/// Encode an ordering key as a cursor token.
pub fn encode_cursor(key: i64) -> Cursor {
    Cursor {
        value: STANDARD.encode(key.to_string()),
    }
}

/// Decode a cursor token into an ordering key.
///
/// The empty token yields `default_for_empty`. Any other token that is not
/// base64 of a decimal `i64` is rejected with
/// [`PaginationError::InvalidCursor`].
pub fn decode_cursor(cursor: &Cursor, default_for_empty: i64) -> PaginationResult<i64> {
    if cursor.is_empty() {
        return Ok(default_for_empty);
    }

    let bytes = STANDARD.decode(cursor.as_str()).map_err(|e| {
        PaginationError::InvalidCursor(format!("'{}' is not base64: {}", cursor, e))
    })?;

    let text = String::from_utf8(bytes).map_err(|_| {
        PaginationError::InvalidCursor(format!("'{}' does not decode to text", cursor))
    })?;

    text.parse::<i64>().map_err(|e| {
        PaginationError::InvalidCursor(format!("'{}' does not hold a numeric key: {}", cursor, e))
    })
}
