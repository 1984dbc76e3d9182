//! Plan-wide constants shared between crates.

/// Margin in pixels around the plan bounds.
pub const MARGIN: f32 = 40.0;

/// Initial plan scale (pixels per centimeter).
pub const DEFAULT_SCALE: f32 = 0.5;

/// Smallest scale reachable with zoom out.
pub const MIN_SCALE: f32 = 0.01;

/// Largest scale reachable with zoom in.
pub const MAX_SCALE: f32 = 10.0;

/// Factor applied by one zoom step.
pub const ZOOM_STEP: f32 = 1.5;

/// Stand-off in pixels between an alignment guide and the aligned point.
pub const ALIGNMENT_LINE_OFFSET: f32 = 25.0;

/// Snap margin in pixels, converted to model units with `1 / scale`.
pub const ALIGNMENT_MARGIN_PIXELS: f32 = 0.5;

/// Minimum room area (cm²) for the area label to be painted.
pub const MINIMUM_VISIBLE_AREA: f32 = 0.01;

/// Default extent of an empty plan, in centimeters.
pub const DEFAULT_PLAN_EXTENT: f32 = 1000.0;
