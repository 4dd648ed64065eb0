//! Shared numeric constants for the canvas crate.

// ── Field ───────────────────────────────────────────────────────

/// Width of the drawn field rectangle in field units.
pub const FIELD_WIDTH: f64 = 800.0;

/// Height of the drawn field rectangle in field units.
pub const FIELD_HEIGHT: f64 = 500.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Radius of a player marker in field units.
pub const PLAYER_RADIUS: f64 = 15.0;

/// Radius of the ball marker in field units.
pub const BALL_RADIUS: f64 = 8.0;

/// Maximum distance from an arrow's shaft that still counts as a hit.
pub const ARROW_HIT_THRESHOLD: f64 = 10.0;

/// Width of the hit box anchored at a text label's position.
pub const TEXT_HIT_WIDTH: f64 = 80.0;

/// Height of the hit box anchored at a text label's position.
pub const TEXT_HIT_HEIGHT: f64 = 20.0;

// ── Gestures ────────────────────────────────────────────────────

/// Arrow gestures that stay within this many units of the start on both
/// axes are discarded on release.
pub const MIN_ARROW_DELTA: f64 = 5.0;

// ── Animation ───────────────────────────────────────────────────

/// A player within this distance of an arrow's start rides that arrow.
pub const ANIMATION_MATCH_RADIUS: f64 = 20.0;

/// Upper bound of the animation progress scale.
pub const PROGRESS_MAX: f64 = 100.0;

/// Default playback speed in progress units per second (a four second sweep).
pub const DEFAULT_PLAYBACK_SPEED: f64 = 25.0;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 10.0;
