//! ID generation utilities for warmtree
//!
//! Provides placeholder session names for spare worktrees built ahead of demand.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Generate a placeholder session name for a spare worktree
///
/// Format: `warmtree-temp-{timestamp_ms}-{random_hex}`
/// Example: `warmtree-temp-1738300800123-a1b2`
///
/// The fixed prefix keeps placeholders out of the namespace real sessions
/// use; the timestamp plus random suffix keeps concurrent spares distinct.
pub fn placeholder_session_name() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("warmtree-temp-{}-{:04x}", timestamp, random)
}
