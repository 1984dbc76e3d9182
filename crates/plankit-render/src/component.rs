//! Plan view façade.
//!
//! [`PlanComponent`] ties a viewport, the derived geometry cache, the
//! interactive feedback and the paint scheduler to the event bus of a home.
//! The host owns the home and the drawing surface and hands them in for each
//! paint; everything derived from them lives here.

use image::RgbaImage;
use lyon::math::{point, Point};
use parking_lot::Mutex;
use plankit_core::constants::ZOOM_STEP;
use plankit_core::{thread_safe, EventBus, ItemId, RenderError, SubscriptionId, ThreadSafe};
use plankit_settings::PreferencesManager;
use std::sync::Arc;

use crate::alignment::{AlignedObject, AlignmentFeedback};
use crate::cache::{CacheStats, DerivedGeometryCache};
use crate::export::{self, ExportContext};
use crate::feedback::PlanFeedback;
use crate::geometry::Rect;
use crate::icons::IconRenderer;
use crate::interaction::{PlanInteractionController, PlanPointerEvent, PointerEvent, PointerKind};
use crate::invalidation::{self, UpdateAction};
use crate::model::{DimensionLine, FurnitureSizeOracle, Home, PlanItem};
use crate::render::surface::Surface;
use crate::render::{CancellationFlag, PaintMode, PaintReport, PlanPainter};
use crate::scheduler::{PaintScheduler, PaintSchedulerConfig};
use crate::textures::TextureManager;
use crate::viewport::PlanViewport;

pub struct PlanComponent {
    viewport: PlanViewport,
    cache: ThreadSafe<DerivedGeometryCache>,
    feedback: PlanFeedback,
    scheduler: PaintScheduler,
    preferences: Arc<PreferencesManager>,
    textures: Option<Arc<TextureManager>>,
    size_oracle: Option<Arc<dyn FurnitureSizeOracle>>,
    subscriptions: Vec<(Arc<EventBus>, SubscriptionId)>,
}

impl PlanComponent {
    /// View of `home`, kept up to date by the events of its bus and of the
    /// preferences bus.
    pub fn new(home: &Home, preferences: Arc<PreferencesManager>) -> Self {
        Self::with_config(home, preferences, PaintSchedulerConfig::default())
    }

    pub fn with_config(home: &Home, preferences: Arc<PreferencesManager>, config: PaintSchedulerConfig) -> Self {
        let cache = thread_safe(DerivedGeometryCache::default());
        let scheduler = PaintScheduler::new(config).with_bus(home.bus().clone());
        let mut buses = vec![home.bus().clone()];
        if !Arc::ptr_eq(home.bus(), preferences.bus()) {
            buses.push(preferences.bus().clone());
        }
        let subscriptions = buses
            .into_iter()
            .map(|bus| {
                let id = invalidation::subscribe(&bus, cache.clone(), scheduler.clone());
                (bus, id)
            })
            .collect();
        scheduler.request_revalidate();
        Self {
            viewport: PlanViewport::new(),
            cache,
            feedback: PlanFeedback::default(),
            scheduler,
            preferences,
            textures: None,
            size_oracle: None,
            subscriptions,
        }
    }

    pub fn with_textures(mut self, textures: Arc<TextureManager>) -> Self {
        self.textures = Some(textures);
        self
    }

    /// Inject the 3D engine measuring pitched and rolled pieces in the plan.
    pub fn with_size_oracle(mut self, oracle: Arc<dyn FurnitureSizeOracle>) -> Self {
        self.size_oracle = Some(oracle);
        self
    }

    /// Inject the service drawing furniture models seen from the top.
    pub fn with_icon_renderer(self, renderer: Arc<dyn IconRenderer>) -> Self {
        self.cache.lock().set_icon_renderer(Some(renderer));
        self
    }

    pub fn viewport(&self) -> &PlanViewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut PlanViewport {
        &mut self.viewport
    }

    pub fn scheduler(&self) -> &PaintScheduler {
        &self.scheduler
    }

    pub fn feedback(&self) -> &PlanFeedback {
        &self.feedback
    }

    pub fn cache(&self) -> &Arc<Mutex<DerivedGeometryCache>> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.viewport.set_scale(scale);
        self.scheduler.request_revalidate();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.scheduler.request_revalidate();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.scheduler.request_revalidate();
    }

    /// Move the visible area by a model length.
    pub fn move_view(&mut self, dx: f32, dy: f32) {
        if self.viewport.move_view(dx, dy) {
            self.scheduler.request_repaint();
        }
    }

    /// Recompute the plan bounds from `home`.
    pub fn revalidate(&mut self, home: &Home) {
        let bounds = self
            .preferences
            .with(|preferences| self.cache.lock().plan_bounds(home, preferences));
        self.viewport.set_plan_bounds(bounds);
    }

    /// Pixel size needed to show the whole plan.
    pub fn preferred_size(&mut self, home: &Home) -> (f32, f32) {
        self.revalidate(home);
        self.viewport.preferred_size()
    }

    /// Paint `home` on `surface`, whose transform maps view pixels, serving
    /// the pending request first.
    pub fn paint(&mut self, home: &Home, surface: &mut dyn Surface, mode: PaintMode) -> Result<PaintReport, RenderError> {
        if self.scheduler.begin_paint() == Some(UpdateAction::Revalidate) {
            self.revalidate(home);
        }
        let depth = surface.save();
        surface.concat(&self.viewport.paint_transform());
        let scale = self.viewport.scale();
        let result = self.preferences.with(|preferences| {
            let mut cache = self.cache.lock();
            let mut painter = PlanPainter::new(home, preferences, &mut cache);
            if mode == PaintMode::Paint {
                painter = painter.with_feedback(&self.feedback);
            }
            if let Some(textures) = self.textures.as_deref() {
                painter = painter.with_textures(textures);
            }
            if let Some(oracle) = self.size_oracle.as_deref() {
                painter = painter.with_size_oracle(oracle);
            }
            painter.paint(surface, scale, mode)
        });
        surface.restore_to(depth);
        if let Some(replay) = self.scheduler.finish_paint() {
            tracing::debug!("Changes during paint, {:?} pending", replay);
        }
        result
    }

    /// Convert `event` to model coordinates and hand it to `controller`.
    pub fn dispatch_pointer(&mut self, event: PointerEvent, controller: &mut dyn PlanInteractionController) {
        if let PointerKind::Wheel { delta } = event.kind {
            if event.modifiers.command {
                let factor = if delta > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                controller.zoom(self, factor);
                return;
            }
        }
        let location = self.viewport.pixel_to_model(event.x, event.y);
        let model_event = PlanPointerEvent {
            location,
            kind: event.kind,
            modifiers: event.modifiers,
            pointer: event.pointer,
        };
        tracing::trace!("Pointer {:?} at {:?}", event.kind, location);
        controller.pointer_event(self, &model_event);
    }

    /// Alignment of `(x, y)` for `aligned` at the selected level, ghosts of
    /// the neighbouring levels included.
    pub fn alignment(&self, home: &Home, aligned: AlignedObject, x: f32, y: f32) -> AlignmentFeedback {
        let ghosts = self.cache.lock().other_levels(home);
        AlignmentFeedback::compute_with_ghosts(
            home,
            home.selected_level(),
            &ghosts,
            aligned,
            point(x, y),
            self.viewport.scale(),
        )
    }

    /// `(x, y)` moved onto the items it aligns with.
    pub fn snapped_point(&self, home: &Home, aligned: AlignedObject, x: f32, y: f32) -> Point {
        let feedback = self.alignment(home, aligned, x, y);
        point(x + feedback.delta_x.unwrap_or(0.0), y + feedback.delta_y.unwrap_or(0.0))
    }

    pub fn set_alignment_feedback(&mut self, aligned: AlignedObject, x: f32, y: f32, show_point_feedback: bool) {
        self.feedback.set_alignment(aligned, x, y, show_point_feedback);
        self.scheduler.request_repaint();
    }

    pub fn set_angle_feedback(&mut self, center: Point, point1: Point, point2: Point) {
        self.feedback.set_angle(center, point1, point2);
        self.scheduler.request_repaint();
    }

    pub fn set_rectangle_feedback(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.feedback.set_rectangle(x0, y0, x1, y1);
        self.scheduler.request_repaint();
    }

    pub fn set_dragged_items_feedback(&mut self, items: Vec<PlanItem>) {
        self.feedback.dragged_items = items;
        self.scheduler.request_repaint();
    }

    pub fn set_dimension_lines_feedback(&mut self, lines: Vec<DimensionLine>) {
        self.feedback.dimension_lines = lines;
        self.scheduler.request_repaint();
    }

    pub fn set_resize_indicator_visible(&mut self, visible: bool) {
        if self.feedback.resize_indicator_visible != visible {
            self.feedback.resize_indicator_visible = visible;
            self.scheduler.request_repaint();
        }
    }

    /// Remove every feedback of the gesture in progress.
    pub fn delete_feedback(&mut self) {
        if !self.feedback.is_empty() {
            self.feedback.clear();
            self.scheduler.request_repaint();
        }
    }

    /// Model bounds of the selected items.
    pub fn selection_bounds(&self, home: &Home) -> Option<Rect> {
        self.preferences.with(|preferences| {
            export::items_bounds(home, preferences, &mut self.cache.lock(), home.selected_items())
        })
    }

    /// Scroll to show the selected items.
    pub fn make_selection_visible(&mut self, home: &Home) -> bool {
        let Some(bounds) = self.selection_bounds(home) else {
            return false;
        };
        let pixels = self.viewport.shape_pixel_bounds(&bounds);
        let moved = self.viewport.scroll_rect_to_visible(pixels);
        if moved {
            self.scheduler.request_repaint();
        }
        moved
    }

    fn export_context<'a>(&'a self, cancel: Option<&'a CancellationFlag>) -> ExportContext<'a> {
        ExportContext {
            textures: self.textures.as_deref(),
            cancel,
        }
    }

    /// SVG document of `items`, the whole home when `None`.
    pub fn export_svg(
        &self,
        home: &Home,
        items: Option<&[ItemId]>,
        cancel: Option<&CancellationFlag>,
    ) -> Result<String, RenderError> {
        let context = self.export_context(cancel);
        self.preferences
            .with(|preferences| export::export_svg(home, preferences, &mut self.cache.lock(), items, context))
    }

    /// PNG bytes of the whole plan at the view scale.
    pub fn render_png(&self, home: &Home, mode: PaintMode) -> Result<Vec<u8>, RenderError> {
        let context = self.export_context(None);
        let scale = self.viewport.scale();
        self.preferences
            .with(|preferences| export::render_png(home, preferences, &mut self.cache.lock(), scale, mode, context))
    }

    /// Image of the selection for the clipboard.
    pub fn clipboard_image(&self, home: &Home) -> Result<Option<RgbaImage>, RenderError> {
        let context = self.export_context(None);
        let scale = self.viewport.scale();
        self.preferences
            .with(|preferences| export::clipboard_image(home, preferences, &mut self.cache.lock(), scale, context))
    }

    /// Unsubscribe from every bus. The view stops following its home.
    pub fn dispose(&mut self) {
        for (bus, id) in self.subscriptions.drain(..) {
            bus.unsubscribe(id);
        }
        self.cache.lock().clear();
    }
}

impl Drop for PlanComponent {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for PlanComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanComponent")
            .field("viewport", &self.viewport)
            .field("scheduler", &self.scheduler)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Wall;
    use crate::render::{Layer, RecordingSurface};
    use lyon::math::Transform;
    use plankit_core::ItemProperty;
    use plankit_settings::Preferences;

    fn component() -> (Home, PlanComponent) {
        let home = Home::default();
        let preferences = Arc::new(PreferencesManager::new(Preferences::default(), home.bus().clone()));
        let plan = PlanComponent::new(&home, preferences);
        (home, plan)
    }

    #[test]
    fn test_item_change_invalidates_before_paint() {
        let (mut home, mut plan) = component();
        let id = home.add_item(Wall::new(0.0, 0.0, 200.0, 0.0, 20.0));
        plan.revalidate(&home);
        let before = plan.cache_stats().plan_bounds;

        home.update_wall(id, ItemProperty::XEnd, |w| w.x_end = 2000.0).expect("wall");
        assert_eq!(plan.scheduler().pending(), Some(UpdateAction::Revalidate));

        let mut surface = RecordingSurface::new(Transform::identity());
        plan.paint(&home, &mut surface, PaintMode::Paint).expect("paint");
        assert_eq!(plan.cache_stats().plan_bounds, before + 1);
        assert!(plan.viewport().plan_bounds().max_x() >= 2000.0);
        assert_eq!(plan.scheduler().pending(), None);
    }

    #[test]
    fn test_feedback_setters_request_repaint() {
        let (home, mut plan) = component();
        let mut surface = RecordingSurface::new(Transform::identity());
        plan.paint(&home, &mut surface, PaintMode::Paint).expect("paint");

        plan.set_rectangle_feedback(0.0, 0.0, 100.0, 100.0);
        assert_eq!(plan.scheduler().pending(), Some(UpdateAction::Repaint));
        let mut surface = RecordingSurface::new(Transform::identity());
        plan.paint(&home, &mut surface, PaintMode::Paint).expect("paint");
        assert!(surface.ops_in(Layer::RectangleFeedback).count() > 0);

        plan.delete_feedback();
        assert!(plan.feedback().is_empty());
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let (home, mut plan) = component();
        let subscribers = home.bus().subscriber_count();
        plan.dispose();
        assert_eq!(home.bus().subscriber_count(), subscribers - 1);
    }

    #[test]
    fn test_drag_snaps_to_wall_end() {
        let (mut home, mut plan) = component();
        home.add_item(Wall::new(100.0, 100.02, 300.0, 100.02, 10.0));
        plan.set_scale(1.0);
        let snapped = plan.snapped_point(&home, AlignedObject::Wall(None), 100.0, 100.0);
        assert!((snapped.y - 100.02).abs() < 1e-4);
    }
}
