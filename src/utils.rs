use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::TimeDelta;
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::{
    Res,
    error::SpottiError,
    types::{PkceCodes, PlaybackState},
};

const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
// Largest multiple of 62 that fits in a byte; bytes at or above it are
// rejected so every character stays equally likely.
const ACCEPT_BELOW: u8 = 248;

pub const STATE_LENGTH: usize = 11;
pub const CODE_VERIFIER_LENGTH: usize = 64;

/// Draws `length` characters from `[a-zA-Z0-9]` using the OS random source.
///
/// # Errors
///
/// [`SpottiError::EntropyFailure`] when the OS random source fails.
pub fn generate_random_string(length: usize) -> Res<String> {
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while out.len() < length {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| SpottiError::EntropyFailure(e.to_string()))?;

        for &byte in buf.iter().filter(|b| **b < ACCEPT_BELOW) {
            if out.len() == length {
                break;
            }
            out.push(ALPHABET[(byte % 62) as usize] as char);
        }
    }

    Ok(out)
}

/// PKCE code verifier: [`CODE_VERIFIER_LENGTH`] random characters.
///
/// # Errors
///
/// [`SpottiError::EntropyFailure`] when the OS random source fails.
pub fn generate_code_verifier() -> Res<String> {
    generate_random_string(CODE_VERIFIER_LENGTH)
}

/// S256 challenge for `verifier`: SHA-256, then base64url without padding.
///
/// # Arguments
///
/// * `verifier` - The code verifier sent later with the token request
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Fresh state, verifier and matching challenge for one authorization attempt.
pub fn generate_pkce() -> Res<PkceCodes> {
    let state = generate_random_string(STATE_LENGTH)?;
    let code_verifier = generate_code_verifier()?;
    let code_challenge = generate_code_challenge(&code_verifier);
    Ok(PkceCodes {
        state,
        code_verifier,
        code_challenge,
    })
}

/// Formats a millisecond count as `m:ss` (or `h:mm:ss`), rounded to the second.
pub fn format_millis(ms: u64) -> String {
    let delta = TimeDelta::milliseconds(ms.saturating_add(500).min(i64::MAX as u64) as i64);
    let secs = delta.num_seconds();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Artist names of the current item joined with `, `; empty without an item.
pub fn format_artists(state: &PlaybackState) -> String {
    state.artist_names().join(", ")
}
