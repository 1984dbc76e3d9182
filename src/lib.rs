//! # Plankit
//!
//! Rendering and geometric feedback engine of a floor plan editor.
//!
//! ## Architecture
//!
//! Plankit is organized as a workspace with multiple crates:
//!
//! 1. **plankit-core** - Identifiers, styles, units, errors and the plan event bus
//! 2. **plankit-settings** - User preferences with TOML persistence
//! 3. **plankit-render** - Home model, derived geometry, painter, surfaces and
//!    the plan component
//! 4. **plankit** - Demo binary exporting a sample plan
//!
//! ## Features
//!
//! - **Layered Painting**: fixed layer order in paint, print, clipboard and export modes
//! - **Output Targets**: anti-aliased raster, PNG, SVG and recording surfaces
//! - **Interactive Feedback**: alignment guides, angles, selection rectangles and indicators
//! - **Event-Driven Invalidation**: derived geometry recomputed only for what changed

pub use plankit_core::{
    Color, EventBus, EventFilter, ItemId, ItemKind, LengthUnit, PlanEvent, RenderError,
    WallPattern,
};
pub use plankit_render::{
    AlignedObject, AlignmentFeedback, Camera, Compass, DimensionLine, Furniture, Home, Label,
    Level, PaintMode, PlanComponent, PlanInteractionController, PlanItem, Polyline, Room, Wall,
};
pub use plankit_settings::{Preferences, PreferencesManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, leaving stdout to exported documents
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Small furnished apartment used by the demo binary.
pub fn sample_home() -> anyhow::Result<Home> {
    use lyon::math::point;

    let mut home = Home::default();
    let corners = [(0.0, 0.0), (600.0, 0.0), (600.0, 400.0), (0.0, 400.0)];
    let walls: Vec<ItemId> = corners
        .iter()
        .zip(corners.iter().cycle().skip(1))
        .map(|(&(x0, y0), &(x1, y1))| home.add_item(Wall::new(x0, y0, x1, y1, 15.0)))
        .collect();
    for (i, &wall) in walls.iter().enumerate() {
        home.join_walls(wall, walls[(i + 1) % walls.len()])?;
    }
    home.add_item(Wall::new(350.0, 0.0, 350.0, 400.0, 10.0));

    home.add_item(
        Room::new(vec![
            point(0.0, 0.0),
            point(350.0, 0.0),
            point(350.0, 400.0),
            point(0.0, 400.0),
        ])
        .with_name("Living room"),
    );
    home.add_item(
        Room::new(vec![
            point(350.0, 0.0),
            point(600.0, 0.0),
            point(600.0, 400.0),
            point(350.0, 400.0),
        ])
        .with_name("Bedroom"),
    );
    home.add_item(Furniture::new("Sofa", 175.0, 320.0, 200.0, 90.0, 80.0));
    home.add_item(Furniture::new("Bed", 475.0, 150.0, 160.0, 200.0, 50.0));
    home.add_item(DimensionLine::new(0.0, 0.0, 600.0, 0.0, -40.0));
    home.add_item(Label::new("Apartment", 300.0, 460.0));
    Ok(home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_home_has_closed_outline() {
        let home = sample_home().expect("home");
        let walls: Vec<_> = home.items().iter().filter_map(PlanItem::as_wall).collect();
        assert_eq!(walls.len(), 5);
        assert!(walls[..4]
            .iter()
            .all(|w| w.wall_at_start.is_some() && w.wall_at_end.is_some()));
    }
}
