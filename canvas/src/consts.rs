//! Shared numeric constants for the canvas crate.

// ── Notes ───────────────────────────────────────────────────────

/// Smallest width a note can be resized to, in world units.
pub const MIN_NOTE_WIDTH: f64 = 150.0;

/// Smallest height a note can be resized to, in world units.
pub const MIN_NOTE_HEIGHT: f64 = 120.0;

/// Width of a freshly created note, in world units.
pub const DEFAULT_NOTE_WIDTH: f64 = 240.0;

/// Height of a freshly created note, in world units.
pub const DEFAULT_NOTE_HEIGHT: f64 = 180.0;

/// Maximum absolute jitter applied to each axis when spawning a note.
pub const SPAWN_JITTER: f64 = 20.0;

// ── Viewport ────────────────────────────────────────────────────

/// Lower bound on the view scale.
pub const MIN_SCALE: f64 = 0.1;

/// Upper bound on the view scale.
pub const MAX_SCALE: f64 = 5.0;

/// Scale change per wheel unit for modifier-qualified scrolling.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

/// Screen position of the world origin after a board is opened.
pub const HOME_PAN_X: f64 = 300.0;

/// Screen position of the world origin after a board is opened.
pub const HOME_PAN_Y: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the bottom-right resize handle, in screen pixels.
pub const RESIZE_HANDLE_PX: f64 = 16.0;

// ── Auto-arrange ────────────────────────────────────────────────

/// Margin kept between arranged notes, in world units.
pub const ARRANGE_GAP: f64 = 20.0;

/// Notes whose `y` differs by at most this much are ordered by `x`.
pub const ARRANGE_ROW_TOLERANCE: f64 = 10.0;

/// Row width never drops below this, in world units.
pub const ARRANGE_MIN_ROW_WIDTH: f64 = 1000.0;

/// Width-to-height ratio the packer aims for (3:2).
pub const ARRANGE_ASPECT: f64 = 1.5;

/// Slack multiplier on the ideal row width.
pub const ARRANGE_SLACK: f64 = 1.2;

// ── Minimap ─────────────────────────────────────────────────────

/// Minimap box width in pixels.
pub const MINIMAP_WIDTH: f64 = 240.0;

/// Minimap box height in pixels.
pub const MINIMAP_HEIGHT: f64 = 160.0;

/// Padding added around the minimap content, in world units.
pub const MINIMAP_PADDING: f64 = 20.0;
