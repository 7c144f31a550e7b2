// =============================================================================
// Swipe Service Constants
// =============================================================================
// Tunables used throughout the backend, kept in one place.

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "kissrug=info,tower_http=debug,server=debug";

// =============================================================================
// DATABASE CONFIGURATION
// =============================================================================

/// Default connection pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a pooled connection before reporting storage as unavailable
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;

/// Upper bound on a single request's storage work
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// MATCH NOTIFICATIONS
// =============================================================================

/// Notifications buffered per event stream before slow listeners start skipping
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// SSE event name for newly created matches
pub const MATCH_CREATED_EVENT: &str = "match_created";

// =============================================================================
// PAGINATION
// =============================================================================

/// Matches returned when the client does not pass `limit`
pub const DEFAULT_MATCHES_PAGE_SIZE: i64 = 50;

/// Largest `limit` honored for match listings
pub const MAX_MATCHES_PAGE_SIZE: i64 = 100;

// =============================================================================
// AUTH
// =============================================================================

/// Prefix of the Authorization header value
pub const BEARER_PREFIX: &str = "Bearer ";

/// Lifetime of development tokens minted locally
pub const DEV_TOKEN_TTL_HOURS: i64 = 24;

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// Clamps client-supplied pagination into the supported window
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit
        .unwrap_or(DEFAULT_MATCHES_PAGE_SIZE)
        .clamp(1, MAX_MATCHES_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}
