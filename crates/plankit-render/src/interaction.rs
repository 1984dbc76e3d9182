//! Pointer input forwarded to the plan interaction controller.

use lyon::math::Point;
use plankit_settings::PointerType;
use serde::{Deserialize, Serialize};

use crate::component::PlanComponent;

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerKind {
    Pressed { click_count: u32 },
    Released,
    Moved,
    Dragged,
    Exited,
    /// Wheel rotation, positive away from the user.
    Wheel { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
}

/// Pointer event in pixel coordinates of the plan view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub pointer: PointerType,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, kind: PointerKind) -> Self {
        Self {
            x,
            y,
            kind,
            modifiers: Modifiers::default(),
            pointer: PointerType::Mouse,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pointer event converted to model coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanPointerEvent {
    pub location: Point,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
    pub pointer: PointerType,
}

/// Editing logic driven by the plan view.
///
/// Implementations decide what a gesture does to the home and report it back
/// through the feedback setters of [`PlanComponent`].
pub trait PlanInteractionController {
    fn pointer_event(&mut self, plan: &mut PlanComponent, event: &PlanPointerEvent);

    /// Abort the gesture in progress.
    fn escape(&mut self, plan: &mut PlanComponent) {
        plan.delete_feedback();
    }

    /// Zoom the view by `factor` around its center.
    fn zoom(&mut self, plan: &mut PlanComponent, factor: f32) {
        plan.set_scale(plan.scale() * factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_kind() {
        let event = PointerEvent::new(10.0, 20.0, PointerKind::Pressed { click_count: 2 });
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"Pressed\""));
        let back: PointerEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}
