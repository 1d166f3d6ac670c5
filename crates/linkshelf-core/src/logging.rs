//! Structured logging schema and field name constants for linkshelf.
//!
//! `tracing` macros take field names as identifiers, so call sites spell the
//! names out literally. This module is the list they must agree with; each
//! constant names the events that emit it.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, best-effort step skipped |
//! | INFO  | Lifecycle events (startup, shutdown, seeding), writes |
//! | DEBUG | Decision points, query shapes, auth outcomes |
//! | TRACE | Per-row iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "schema", "bookmarks", "users", "auth", "batch_import"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "search", "seed", "update_role"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Bookmark id being operated on. Emitted on bookmark creation.
pub const BOOKMARK_ID: &str = "bookmark_id";

/// User id (owner or authenticated caller). Emitted by login, role changes,
/// user creation, and batch import.
pub const USER_ID: &str = "user_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds. Emitted by search and pool startup.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned or created. Emitted by search and batch import.
pub const RESULT_COUNT: &str = "result_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of open connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator. Emitted when seeding finishes.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
