//! Timeout policy: which configured group governs a user and how long they may idle.

pub mod model;

pub use model::{TimeoutGroup, TimeoutPolicy};

/// System presences that never accrue an inactivity deadline.
pub const TTL_EXEMPT_PRESENCES: [&str; 3] = ["offline", "idle", "on_queue"];

/// Check whether a presence is exempt from the inactivity deadline.
///
/// Matching is case-insensitive and treats `-` and `_` alike, so
/// `ON_QUEUE`, `on-queue` and `On_Queue` are all exempt.
pub fn is_presence_exempt(presence: &str) -> bool {
    let normalized = presence.trim().to_ascii_lowercase().replace('-', "_");
    TTL_EXEMPT_PRESENCES.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_presences() {
        assert!(is_presence_exempt("OFFLINE"));
        assert!(is_presence_exempt("Idle"));
        assert!(is_presence_exempt("on-queue"));
        assert!(is_presence_exempt("ON_QUEUE"));
        assert!(!is_presence_exempt("available"));
        assert!(!is_presence_exempt("busy"));
        assert!(!is_presence_exempt(""));
    }
}
