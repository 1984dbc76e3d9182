use lyon::math::{point, Transform};
use parking_lot::Mutex;
use plankit_core::event_bus::RenderEvent;
use plankit_core::{EventCategory, EventFilter, PlanEvent, RenderError};
use plankit_render::render::recording::{DrawOp, FillKind};
use plankit_render::{
    CancellationFlag, DerivedGeometryCache, Home, Label, Layer, PaintMode, PaintReport, PlanPainter,
    RecordingSurface, Room, Surface, Wall,
};
use plankit_settings::Preferences;
use std::sync::Arc;

fn sample_home() -> Home {
    let mut home = Home::default();
    let a = home.add_item(Wall::new(0.0, 0.0, 400.0, 0.0, 20.0));
    let b = home.add_item(Wall::new(400.0, 0.0, 400.0, 300.0, 20.0));
    home.join_walls(a, b).expect("join");
    home.add_item(
        Room::new(vec![
            point(0.0, 0.0),
            point(400.0, 0.0),
            point(400.0, 300.0),
            point(0.0, 300.0),
        ])
        .with_name("Kitchen"),
    );
    home.add_item(Label::new("Entrance", 200.0, 350.0));
    home
}

fn paint(home: &Home, mode: PaintMode, surface: &mut RecordingSurface) -> PaintReport {
    let prefs = Preferences::default();
    let mut cache = DerivedGeometryCache::default();
    PlanPainter::new(home, &prefs, &mut cache)
        .paint(surface, 1.0, mode)
        .expect("paint")
}

#[test]
fn test_paint_layers_follow_fixed_order() {
    let home = sample_home();
    let mut surface = RecordingSurface::new(Transform::identity());
    paint(&home, PaintMode::Paint, &mut surface);
    let layers = surface.layers();
    assert_eq!(layers, Layer::ORDER.to_vec());
    let position = |layer| layers.iter().position(|l| *l == layer).expect("layer");
    assert!(position(Layer::Rooms) < position(Layer::Walls));
    assert!(position(Layer::Walls) < position(Layer::Furniture));
    assert!(position(Layer::Labels) < position(Layer::Selection));
}

#[test]
fn test_room_area_label() {
    let home = sample_home();
    let mut surface = RecordingSurface::new(Transform::identity());
    paint(&home, PaintMode::Print, &mut surface);
    let texts = surface.texts();
    assert!(texts.contains(&"Kitchen"));
    assert!(texts.contains(&"12.00 m²"));
}

#[test]
fn test_failed_layer_does_not_stop_others() {
    let home = sample_home();
    let mut surface = RecordingSurface::new(Transform::identity()).panic_in_layer(Layer::Rooms);
    let report = paint(&home, PaintMode::Paint, &mut surface);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Layer::Rooms);
    assert!(report.painted.contains(&Layer::Walls));
    assert!(surface.texts().contains(&"Entrance"));
    assert_eq!(surface.state().depth(), 0);
}

#[test]
fn test_cancelled_export_publishes_event() {
    let home = sample_home();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    home.bus().subscribe(EventFilter::Categories(vec![EventCategory::Render]), move |event| {
        if let PlanEvent::Render(event) = event {
            sink.lock().push(event);
        }
    });

    let prefs = Preferences::default();
    let mut cache = DerivedGeometryCache::default();
    let cancel = CancellationFlag::new();
    cancel.cancel();
    let mut surface = RecordingSurface::new(Transform::identity());
    let result = PlanPainter::new(&home, &prefs, &mut cache)
        .with_cancellation(cancel.clone())
        .paint(&mut surface, 1.0, PaintMode::Export);
    assert!(matches!(result, Err(RenderError::Cancelled { .. })));
    assert!(matches!(events.lock().as_slice(), [RenderEvent::ExportCancelled]));

    // Other modes ignore the flag.
    let mut surface = RecordingSurface::new(Transform::identity());
    let report = PlanPainter::new(&home, &prefs, &mut cache)
        .with_cancellation(cancel)
        .paint(&mut surface, 1.0, PaintMode::Print);
    assert!(report.is_ok());
}

#[test]
fn test_clipboard_paints_selection_only() {
    let mut home = sample_home();
    let label = home
        .items()
        .iter()
        .find_map(|item| item.as_label().map(|l| l.id))
        .expect("label");
    home.set_selected_items([label]);
    let mut surface = RecordingSurface::new(Transform::identity());
    paint(&home, PaintMode::Clipboard, &mut surface);
    assert_eq!(surface.texts(), vec!["Entrance"]);
    assert_eq!(surface.ops_in(Layer::Walls).count(), 0);
    assert!(!surface.layers().contains(&Layer::Selection));
}

#[test]
fn test_walls_sharing_point_fill_once() {
    let home = sample_home();
    let mut surface = RecordingSurface::new(Transform::identity());
    paint(&home, PaintMode::Print, &mut surface);
    let hatches = surface
        .ops_in(Layer::Walls)
        .filter(|op| matches!(op, DrawOp::Fill { fill: FillKind::Hatch(_), .. }))
        .count();
    assert_eq!(hatches, 1);
}
