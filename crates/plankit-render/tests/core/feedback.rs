use lyon::math::{point, Point, Transform};
use plankit_core::ItemKind;
use plankit_render::alignment::snap_margin;
use plankit_render::render::recording::DrawOp;
use plankit_render::{
    indicator, AlignedObject, AlignmentFeedback, DerivedGeometryCache, Home, IndicatorGlyph,
    IndicatorSubject, IndicatorType, Layer, PaintMode, PlanFeedback, PlanPainter, Polyline,
    RecordingSurface, Wall,
};
use plankit_settings::Preferences;

/// Pixel extent of `glyph` drawn at `scale` on a surface of the same scale.
fn pixel_extent(glyph: &IndicatorGlyph, scale: f32) -> (f32, f32) {
    let bounds = glyph.bounds();
    let placement = IndicatorGlyph::placement(point(50.0, 50.0), 0.0, scale).then_scale(scale, scale);
    let corners = bounds.corners().map(|p| placement.transform_point(p));
    let (mut min, mut max) = (corners[0], corners[0]);
    for c in corners {
        min = point(min.x.min(c.x), min.y.min(c.y));
        max = point(max.x.max(c.x), max.y.max(c.y));
    }
    (max.x - min.x, max.y - min.y)
}

#[test]
fn test_indicator_pixel_size_ignores_scale() {
    let subject = IndicatorSubject::new(ItemKind::Furniture);
    for indicator_type in IndicatorType::ALL {
        let Some(glyph) = indicator(subject, indicator_type) else {
            continue;
        };
        let (w1, h1) = pixel_extent(glyph, 0.5);
        let (w2, h2) = pixel_extent(glyph, 2.0);
        assert!((w1 - w2).abs() < 1e-3, "{}", glyph.name);
        assert!((h1 - h2).abs() < 1e-3, "{}", glyph.name);
    }
}

#[test]
fn test_selected_wall_indicator_strokes_keep_width() {
    let mut home = Home::default();
    let id = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
    home.set_selected_items([id]);
    let prefs = Preferences::default();
    let feedback = PlanFeedback {
        resize_indicator_visible: true,
        ..PlanFeedback::default()
    };

    let widths = |scale: f32| -> Vec<f32> {
        let mut cache = DerivedGeometryCache::default();
        let mut surface = RecordingSurface::new(Transform::scale(scale, scale));
        PlanPainter::new(&home, &prefs, &mut cache)
            .with_feedback(&feedback)
            .paint(&mut surface, scale, PaintMode::Paint)
            .expect("paint");
        surface
            .ops_in(Layer::Selection)
            .filter_map(|op| match op {
                DrawOp::Stroke { width, .. } => Some(*width),
                _ => None,
            })
            .collect()
    };
    let small = widths(0.5);
    let large = widths(2.0);
    assert_eq!(small.len(), large.len());
    for (a, b) in small.iter().zip(&large) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn test_snap_margin_is_exclusive() {
    let mut home = Home::default();
    home.add_item(Wall::new(0.0, 0.0, 400.0, 0.0, 10.0));
    let scale = 1.0;
    let margin = snap_margin(scale);

    let at_margin = AlignmentFeedback::compute(&home, None, AlignedObject::Wall(None), point(600.0, margin), scale);
    assert!(!at_margin.is_aligned());

    let inside = AlignmentFeedback::compute(
        &home,
        None,
        AlignedObject::Wall(None),
        point(600.0, margin - 1e-3),
        scale,
    );
    assert_eq!(inside.delta_x, Some(-600.0));
    assert_eq!(inside.delta_y, None);
}

#[test]
fn test_margin_shrinks_when_zooming_in() {
    let mut home = Home::default();
    home.add_item(Wall::new(0.0, 0.0, 400.0, 0.0, 10.0));
    let p = point(600.0, 0.3);
    let at = |scale| AlignmentFeedback::compute(&home, None, AlignedObject::Wall(None), p, scale);
    assert!(at(1.0).is_aligned());
    assert!(!at(2.0).is_aligned());
}

#[test]
fn test_drag_snap_delta() {
    let mut home = Home::default();
    home.add_item(Wall::new(100.0, 100.02, 300.0, 100.02, 10.0));
    let feedback = AlignmentFeedback::compute(&home, None, AlignedObject::Wall(None), point(100.0, 100.0), 1.0);
    let delta = feedback.delta_y.expect("vertical alignment");
    assert!((delta - 0.02).abs() < 1e-4);
}

#[test]
fn test_polyline_ignores_its_own_points() {
    let mut home = Home::default();
    let own = home.add_item(Polyline::new(vec![point(0.0, 0.0), point(100.0, 0.0)]));
    let p: Point = point(100.2, 50.0);
    let feedback = AlignmentFeedback::compute(&home, None, AlignedObject::Polyline(Some(own)), p, 1.0);
    assert!(!feedback.is_aligned());

    home.add_item(Polyline::new(vec![point(100.0, 200.0), point(200.0, 200.0)]));
    let feedback = AlignmentFeedback::compute(&home, None, AlignedObject::Polyline(Some(own)), p, 1.0);
    assert_eq!(feedback.delta_y, Some(150.0));
}

#[test]
fn test_feedback_only_in_paint_mode() {
    let mut home = Home::default();
    home.add_item(Wall::new(0.0, 0.0, 400.0, 0.0, 10.0));
    let prefs = Preferences::default();
    let mut feedback = PlanFeedback::default();
    feedback.set_rectangle(0.0, 0.0, 50.0, 50.0);

    for (mode, painted) in [(PaintMode::Paint, true), (PaintMode::Print, false)] {
        let mut cache = DerivedGeometryCache::default();
        let mut surface = RecordingSurface::new(Transform::identity());
        PlanPainter::new(&home, &prefs, &mut cache)
            .with_feedback(&feedback)
            .paint(&mut surface, 1.0, mode)
            .expect("paint");
        assert_eq!(surface.ops_in(Layer::RectangleFeedback).count() > 0, painted);
    }
}
