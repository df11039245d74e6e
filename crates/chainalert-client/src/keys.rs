//! VAPID application-server key handling.
//!
//! The push platform wants the key as raw bytes while servers hand it out
//! as base64url text, so the conversion pads to a multiple of four with
//! `=`, maps `-`/`_` back to the standard alphabet, and decodes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ClientError;

pub fn decode_application_server_key(raw: &str) -> Result<Vec<u8>, ClientError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::EmptyKey);
    }

    let padding = "=".repeat((4 - trimmed.len() % 4) % 4);
    let standard: String = trimmed
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    Ok(STANDARD.decode(format!("{standard}{padding}"))?)
}
