use lyon::math::{point, Transform};
use plankit_core::{ItemProperty, LengthUnit};
use plankit_render::{
    AlignedObject, Home, Modifiers, PaintMode, PlanComponent, PlanInteractionController,
    PlanPointerEvent, PointerEvent, PointerKind, RecordingSurface, Room, UpdateAction, Wall,
};
use plankit_settings::{Preferences, PreferencesManager};
use std::sync::Arc;

fn component(home: &Home) -> (Arc<PreferencesManager>, PlanComponent) {
    let preferences = Arc::new(PreferencesManager::new(Preferences::default(), home.bus().clone()));
    let plan = PlanComponent::new(home, preferences.clone());
    (preferences, plan)
}

fn paint(plan: &mut PlanComponent, home: &Home) {
    let mut surface = RecordingSurface::new(Transform::identity());
    plan.paint(home, &mut surface, PaintMode::Paint).expect("paint");
}

#[derive(Default)]
struct RecordingController {
    events: Vec<PlanPointerEvent>,
    zooms: Vec<f32>,
}

impl PlanInteractionController for RecordingController {
    fn pointer_event(&mut self, plan: &mut PlanComponent, event: &PlanPointerEvent) {
        if let PointerKind::Dragged = event.kind {
            plan.set_alignment_feedback(AlignedObject::Wall(None), event.location.x, event.location.y, true);
        }
        self.events.push(*event);
    }

    fn zoom(&mut self, plan: &mut PlanComponent, factor: f32) {
        self.zooms.push(factor);
        plan.set_scale(plan.scale() * factor);
    }
}

#[test]
fn test_preference_changes_schedule_updates() {
    let mut home = Home::default();
    home.add_item(Room::new(vec![
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 100.0),
    ]));
    let (preferences, mut plan) = component(&home);
    paint(&mut plan, &home);
    assert_eq!(plan.scheduler().pending(), None);

    preferences.set_selection_color(plankit_core::Color::rgb(255, 0, 0));
    assert_eq!(plan.scheduler().pending(), Some(UpdateAction::Repaint));
    paint(&mut plan, &home);

    preferences.set_length_unit(LengthUnit::Meter);
    assert_eq!(plan.scheduler().pending(), Some(UpdateAction::Revalidate));
}

#[test]
fn test_changes_during_paint_coalesce() {
    let mut home = Home::default();
    let id = home.add_item(Wall::new(0.0, 0.0, 100.0, 0.0, 10.0));
    let (_preferences, mut plan) = component(&home);
    paint(&mut plan, &home);
    let paints = plan.scheduler().paint_count();

    plan.scheduler().begin_paint();
    for i in 0..10 {
        home.update_wall(id, ItemProperty::XEnd, |w| w.x_end = 100.0 + i as f32)
            .expect("wall");
    }
    assert_eq!(plan.scheduler().pending(), None);
    assert_eq!(plan.scheduler().finish_paint(), Some(UpdateAction::Revalidate));
    assert_eq!(plan.scheduler().coalesced_count(), 9);

    paint(&mut plan, &home);
    assert_eq!(plan.scheduler().paint_count(), paints + 2);
    assert_eq!(plan.scheduler().pending(), None);
    assert!(plan.viewport().plan_bounds().max_x() >= 109.0);
}

#[test]
fn test_pointer_events_reach_controller_in_model_space() {
    let home = Home::default();
    let (_preferences, mut plan) = component(&home);
    plan.revalidate(&home);
    let mut controller = RecordingController::default();

    plan.dispatch_pointer(PointerEvent::new(120.0, 80.0, PointerKind::Dragged), &mut controller);
    assert_eq!(controller.events.len(), 1);
    let expected = plan.viewport().pixel_to_model(120.0, 80.0);
    assert_eq!(controller.events[0].location, expected);
    assert!(plan.feedback().alignment.is_some());

    controller.escape(&mut plan);
    assert!(plan.feedback().is_empty());
}

#[test]
fn test_command_wheel_zooms() {
    let home = Home::default();
    let (_preferences, mut plan) = component(&home);
    let mut controller = RecordingController::default();
    let scale = plan.scale();

    let zoom = PointerEvent::new(0.0, 0.0, PointerKind::Wheel { delta: 1.0 }).with_modifiers(Modifiers {
        command: true,
        ..Modifiers::default()
    });
    plan.dispatch_pointer(zoom, &mut controller);
    assert!(controller.events.is_empty());
    assert!(plan.scale() > scale);

    plan.dispatch_pointer(PointerEvent::new(0.0, 0.0, PointerKind::Wheel { delta: 1.0 }), &mut controller);
    assert_eq!(controller.events.len(), 1);
    assert_eq!(controller.zooms.len(), 1);
}

#[test]
fn test_selection_export_matches_items() {
    let mut home = Home::default();
    let wall = home.add_item(Wall::new(0.0, 0.0, 200.0, 0.0, 20.0));
    home.add_item(Wall::new(0.0, 500.0, 200.0, 500.0, 20.0));
    let (_preferences, plan) = component(&home);

    assert!(plan.clipboard_image(&home).expect("clipboard").is_none());
    home.set_selected_items([wall]);
    let bounds = plan.selection_bounds(&home).expect("bounds");
    assert!(bounds.height < 30.0);

    let svg = plan.export_svg(&home, Some(&[wall]), None).expect("svg");
    assert!(svg.contains("height=\"23\""));
}
