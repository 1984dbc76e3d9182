//! # Plankit Render
//!
//! Rendering and geometric feedback engine of a floor plan editor.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Viewport**: model to pixel conversion, zoom and scrolling
//! - **Derived Geometry Cache**: plan bounds, walls unioned by pattern, ghosts
//!   of other levels, door and window cutouts, text bounds and icons
//! - **Regions**: polygon boolean operations over walls and rooms
//!
//! ### Painting
//! - **Plan Painter**: fixed layer order in paint, print, clipboard and
//!   export modes, each layer isolated from the failures of the others
//! - **Surfaces**: anti-aliased raster, SVG and recording targets
//! - **Textures and Icons**: asynchronous texture loading, top view icons
//!   shared between identical pieces
//!
//! ### Interaction
//! - **Indicators**: pixel sized glyphs advertising the gestures of the
//!   selected item
//! - **Alignment**: magnetism of edited points toward nearby items
//! - **Plan Component**: feedback state, invalidation on plan events and
//!   paint scheduling
//!
//! ## Architecture
//!
//! ```text
//! Home ── EventBus ──> invalidation ──> DerivedGeometryCache
//!                                  └──> PaintScheduler
//! PlanComponent ── PlanPainter ──> Surface (raster | svg | recording)
//! ```

pub mod alignment;
pub mod cache;
pub mod component;
pub mod export;
pub mod feedback;
pub mod font_manager;
pub mod geometry;
pub mod icons;
pub mod indicators;
pub mod interaction;
pub mod invalidation;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod text;
pub mod textures;
pub mod viewport;

pub use alignment::{AlignedObject, AlignmentFeedback};
pub use cache::{CacheScope, CacheStats, DerivedGeometryCache};
pub use component::PlanComponent;
pub use export::{clipboard_image, export_svg, render_png, ExportContext};
pub use feedback::PlanFeedback;
pub use geometry::{Rect, Region};
pub use icons::{IconRenderer, TopViewIcon, TopViewIconKey};
pub use indicators::{indicator, IndicatorGlyph, IndicatorSubject, IndicatorType};
pub use interaction::{Modifiers, PlanInteractionController, PlanPointerEvent, PointerEvent, PointerKind};
pub use invalidation::{Invalidation, UpdateAction};
pub use model::{
    Camera, Compass, DimensionLine, Furniture, Home, Label, Level, PlanItem, Polyline, Room, Wall,
};
pub use render::{
    CancellationFlag, Layer, PaintMode, PaintReport, PlanPainter, RasterSurface, RecordingSurface,
    Surface, SvgSurface,
};
pub use scheduler::{PaintScheduler, PaintSchedulerConfig};
pub use textures::{TextureLoad, TextureManager, TextureProvider};
pub use viewport::PlanViewport;
