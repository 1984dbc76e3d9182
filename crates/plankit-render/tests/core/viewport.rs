use plankit_render::geometry::Rect;
use plankit_render::PlanViewport;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_model_pixel_round_trip(
        scale in 0.01f32..10.0,
        x in -5000.0f32..5000.0,
        y in -5000.0f32..5000.0,
    ) {
        let mut viewport = PlanViewport::new();
        viewport.set_plan_bounds(Rect::new(-5000.0, -5000.0, 10000.0, 10000.0));
        viewport.set_scale(scale);
        let pixel = viewport.model_to_pixel(x, y);
        let back = viewport.pixel_to_model(pixel.x, pixel.y);
        let tolerance = viewport.pixel_length();
        prop_assert!((back.x - x).abs() <= tolerance, "x {} -> {}", x, back.x);
        prop_assert!((back.y - y).abs() <= tolerance, "y {} -> {}", y, back.y);
    }
}

#[test]
fn test_zoom_steps_back_to_scale() {
    let mut viewport = PlanViewport::new();
    let scale = viewport.scale();
    viewport.zoom_in();
    viewport.zoom_out();
    assert!((viewport.scale() - scale).abs() < 1e-6);
}
