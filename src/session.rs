//! Session nonces guarding mutating requests against replay.
//!
//! This is advisory replay protection. Wallet signature verification sits
//! in front of the engine and is not part of it.

use rand::Rng;

use crate::error::{EngineError, EngineResult};
use crate::profile::PlayerProfile;

/// Replace the profile's nonce with a fresh random token and return it.
pub fn rotate<R: Rng + ?Sized>(profile: &mut PlayerProfile, rng: &mut R) -> String {
    let token: u128 = rng.r#gen();
    profile.nonce = format!("{token:032x}");
    profile.nonce.clone()
}

/// Check a supplied nonce against the profile's current one.
///
/// # Errors
///
/// Returns `Unauthorized` if the nonce is missing, empty, or stale, or if
/// the profile has never started a session.
pub fn authenticate(profile: &PlayerProfile, supplied: Option<&str>) -> EngineResult<()> {
    match supplied {
        Some(nonce) if !profile.nonce.is_empty() && constant_time_eq(nonce, &profile.nonce) => {
            Ok(())
        }
        _ => Err(EngineError::Unauthorized),
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
