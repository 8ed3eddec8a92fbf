//! Shared constants for end-to-end tests
//!
//! When the seeded catalog changes, update only this file.

// ============================================================================
// Server Timing
// ============================================================================

/// Maximum time to wait for a spawned server to answer `GET /`
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout applied to every request of the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Seeded Catalog
// ============================================================================

/// Releases dated in the past (release N is N days old, ids 1..=15)
pub const PAST_RELEASES_COUNT: usize = 15;

/// Releases dated in the future (ids 16 and 17)
pub const UPCOMING_RELEASES_COUNT: usize = 2;

pub const TOTAL_RELEASES_COUNT: usize = PAST_RELEASES_COUNT + UPCOMING_RELEASES_COUNT;

/// Artist linked to the newest past release
pub const SEEDED_ARTIST_ID: i64 = 1;
pub const SEEDED_ARTIST_NAME: &str = "The Test Band";

/// Newest past release, owns the seeded album
pub const SEEDED_RELEASE_ID: i64 = 1;
pub const SEEDED_RELEASE_NAME: &str = "Past Release 01";

pub const SEEDED_ALBUM_NAME: &str = "First Album";
pub const SEEDED_ALBUM_DURATION: i64 = 42;

/// A past release with no album and no artists
pub const BARE_RELEASE_ID: i64 = 2;
pub const BARE_RELEASE_NAME: &str = "Past Release 02";
