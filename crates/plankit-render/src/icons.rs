//! Furniture icons drawn in the plan, shared between equal pieces.
//!
//! Rendering a top view of a 3D model is expensive, so icons are cached by a
//! value key made of everything that changes the picture. Pieces with equal
//! keys share one [`TopViewIcon`]; a piece whose key changes releases its
//! old icon, which is dropped once no other piece uses it.

use image::RgbaImage;
use plankit_core::{Color, ItemId, TextureError};
use plankit_settings::Preferences;
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{Furniture, FurnitureMaterial, ImageRef, ModelRef};

/// Raster produced by an icon renderer.
pub type IconImage = RgbaImage;

/// Service rendering top views of furniture models.
///
/// Only [`TopViewIconKey::Model`] keys are handed to the renderer.
pub trait IconRenderer: Send + Sync {
    fn render_icon(&self, key: &TopViewIconKey, target_size: u32) -> Result<IconImage, TextureError>;
}

/// Float compared by its bits, with both zeros equal.
fn bits(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub name: String,
    pub color: Option<Color>,
    pub texture: Option<ImageRef>,
    pub shininess: Option<u32>,
}

impl From<&FurnitureMaterial> for MaterialKey {
    fn from(material: &FurnitureMaterial) -> Self {
        Self {
            name: material.name.clone(),
            color: material.color,
            texture: material.texture.as_ref().map(|t| t.image.clone()),
            shininess: material.shininess.map(bits),
        }
    }
}

/// Everything a model top view depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelIconKey {
    pub model: ModelRef,
    pub color: Option<Color>,
    pub texture: Option<ImageRef>,
    /// Width, depth and height in plan, kept only when they change the
    /// picture: rotated pieces and textured ones.
    pub size: Option<[u32; 3]>,
    /// Mirroring, kept only for rolled pieces.
    pub mirrored: Option<bool>,
    pub rotation: [[u32; 3]; 3],
    pub centered_at_origin: bool,
    pub back_face_shown: bool,
    pub pitch: u32,
    pub roll: u32,
    pub transformations: Vec<(String, [[u32; 4]; 3])>,
    pub materials: Vec<MaterialKey>,
    pub shininess: Option<u32>,
}

/// Cache key of a furniture icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopViewIconKey {
    /// Plan icon image, tinted by the piece color.
    PlanIcon { image: ImageRef, color: Option<Color> },
    /// Rendered top view of the model.
    Model(Box<ModelIconKey>),
    /// Catalog icon drawn in the footprint when furniture is not viewed
    /// from top.
    CatalogIcon(ImageRef),
}

impl TopViewIconKey {
    /// Key of the icon drawn for `piece`, `None` for groups and pieces with
    /// nothing to show. Without a model renderer, pieces lacking a plan icon
    /// fall back to their catalog icon.
    pub fn of(piece: &Furniture, viewed_from_top: bool, renderer_available: bool) -> Option<Self> {
        if piece.is_group() {
            return None;
        }
        let catalog = || piece.icon.clone().map(TopViewIconKey::CatalogIcon);
        if !viewed_from_top {
            return catalog();
        }
        if let Some(image) = &piece.plan_icon {
            return Some(TopViewIconKey::PlanIcon {
                image: image.clone(),
                color: piece.color,
            });
        }
        if !renderer_available {
            return catalog();
        }
        let Some(model) = piece.model.clone() else {
            return catalog();
        };
        let textured = piece.texture.is_some();
        let size = (piece.is_horizontally_rotated() || textured).then(|| {
            [
                bits(piece.width_in_plan()),
                bits(piece.depth_in_plan()),
                bits(piece.height_in_plan()),
            ]
        });
        Some(TopViewIconKey::Model(Box::new(ModelIconKey {
            model,
            color: piece.color,
            texture: piece.texture.as_ref().map(|t| t.image.clone()),
            size,
            mirrored: (piece.roll != 0.0).then_some(piece.model_mirrored),
            rotation: piece.model_rotation.map(|row| row.map(bits)),
            centered_at_origin: piece.model_centered_at_origin,
            back_face_shown: piece.back_face_shown,
            pitch: bits(piece.pitch),
            roll: bits(piece.roll),
            transformations: piece
                .model_transformations
                .iter()
                .flatten()
                .map(|t| (t.name.clone(), t.matrix.map(|row| row.map(bits))))
                .collect(),
            materials: piece
                .model_materials
                .iter()
                .flatten()
                .map(MaterialKey::from)
                .collect(),
            shininess: piece.shininess.map(bits),
        })))
    }
}

/// Where the pixels of an icon come from.
#[derive(Debug, Clone)]
pub enum IconSource {
    /// Rendered by the icon renderer.
    Rendered(Arc<IconImage>),
    /// Image acquired through the texture manager at paint time.
    Texture(ImageRef),
    /// Rendering failed or no renderer is available; the footprint is drawn
    /// without icon.
    Unavailable,
}

/// Icon shared by every piece with the same key.
#[derive(Debug)]
pub struct TopViewIcon {
    pub key: TopViewIconKey,
    pub source: IconSource,
    /// Color the source pixels are tinted with.
    pub tint: Option<Color>,
}

/// Icons by key, with the key each piece currently uses.
#[derive(Default)]
pub struct IconCache {
    icons: HashMap<TopViewIconKey, Arc<TopViewIcon>>,
    keys: HashMap<ItemId, TopViewIconKey>,
    renderer: Option<Arc<dyn IconRenderer>>,
}

impl IconCache {
    pub fn new(renderer: Option<Arc<dyn IconRenderer>>) -> Self {
        Self {
            renderer,
            ..Self::default()
        }
    }

    pub fn set_renderer(&mut self, renderer: Option<Arc<dyn IconRenderer>>) {
        self.renderer = renderer;
        self.clear();
    }

    /// Icon of `piece`, created on first use of its key.
    pub fn icon_for(&mut self, piece: &Furniture, preferences: &Preferences) -> Option<Arc<TopViewIcon>> {
        let viewed_from_top = preferences.plan.furniture_viewed_from_top;
        let Some(key) = TopViewIconKey::of(piece, viewed_from_top, self.renderer.is_some()) else {
            self.release(piece.id);
            return None;
        };
        if self.keys.get(&piece.id) != Some(&key) {
            self.release(piece.id);
            self.keys.insert(piece.id, key.clone());
        }
        if let Some(icon) = self.icons.get(&key) {
            return Some(icon.clone());
        }
        let icon = Arc::new(self.create(key.clone(), preferences.plan.furniture_model_icon_size));
        self.icons.insert(key, icon.clone());
        Some(icon)
    }

    fn create(&self, key: TopViewIconKey, size: u32) -> TopViewIcon {
        let (source, tint) = match &key {
            TopViewIconKey::PlanIcon { image, color } => (IconSource::Texture(image.clone()), *color),
            TopViewIconKey::CatalogIcon(image) => (IconSource::Texture(image.clone()), None),
            TopViewIconKey::Model(model) => {
                let source = match &self.renderer {
                    Some(renderer) => match renderer.render_icon(&key, size) {
                        Ok(image) => IconSource::Rendered(Arc::new(image)),
                        Err(e) => {
                            tracing::warn!("No top view for {}: {}", model.model, e);
                            IconSource::Unavailable
                        }
                    },
                    None => IconSource::Unavailable,
                };
                (source, None)
            }
        };
        tracing::debug!("Created furniture icon ({} cached)", self.icons.len() + 1);
        TopViewIcon { key, source, tint }
    }

    /// Forget the icon key of a piece. The icon itself goes when no other
    /// piece uses its key.
    pub fn release(&mut self, piece: ItemId) {
        let Some(key) = self.keys.remove(&piece) else {
            return;
        };
        if !self.keys.values().any(|other| *other == key) {
            self.icons.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.icons.clear();
        self.keys.clear();
    }

    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    pub fn key_of(&self, piece: ItemId) -> Option<&TopViewIconKey> {
        self.keys.get(&piece)
    }
}

/// Recolor an icon: each opaque pixel takes `color` shaded by its own
/// luminance.
pub fn tinted(image: &RgbaImage, color: Color) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luminance = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0;
        let shade = |channel: u8| (channel as f32 * (0.5 + luminance / 2.0)).round() as u8;
        pixel.0 = [shade(color.red()), shade(color.green()), shade(color.blue()), a];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CountingRenderer {
        calls: Mutex<usize>,
    }

    impl IconRenderer for CountingRenderer {
        fn render_icon(&self, _key: &TopViewIconKey, size: u32) -> Result<IconImage, TextureError> {
            *self.calls.lock() += 1;
            Ok(RgbaImage::new(size, size))
        }
    }

    fn chair() -> Furniture {
        Furniture::new("Chair", 0.0, 0.0, 45.0, 50.0, 90.0).with_model(ModelRef::new("chair.obj"))
    }

    #[test]
    fn test_equal_pieces_share_icon() {
        let renderer = Arc::new(CountingRenderer::default());
        let mut cache = IconCache::new(Some(renderer.clone()));
        let prefs = Preferences::default();
        let a = cache.icon_for(&chair(), &prefs).expect("icon");
        let b = cache.icon_for(&chair(), &prefs).expect("icon");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*renderer.calls.lock(), 1);
    }

    #[test]
    fn test_color_change_only_affects_its_piece() {
        let mut cache = IconCache::new(Some(Arc::new(CountingRenderer::default())));
        let prefs = Preferences::default();
        let first = chair();
        let mut second = chair();
        let shared = cache.icon_for(&first, &prefs).expect("icon");
        cache.icon_for(&second, &prefs).expect("icon");

        second.color = Some(Color::rgb(200, 0, 0));
        cache.release(second.id);
        let recolored = cache.icon_for(&second, &prefs).expect("icon");

        assert!(!Arc::ptr_eq(&shared, &recolored));
        let still = cache.icon_for(&first, &prefs).expect("icon");
        assert!(Arc::ptr_eq(&shared, &still));
        assert_eq!(cache.icon_count(), 2);
    }

    #[test]
    fn test_released_icon_dropped_when_unused() {
        let mut cache = IconCache::new(Some(Arc::new(CountingRenderer::default())));
        let piece = chair();
        cache.icon_for(&piece, &Preferences::default());
        cache.release(piece.id);
        assert_eq!(cache.icon_count(), 0);
    }

    #[test]
    fn test_size_only_in_key_when_rotated() {
        let mut piece = chair();
        let flat = TopViewIconKey::of(&piece, true, true);
        piece.width = 60.0;
        assert_eq!(flat, TopViewIconKey::of(&piece, true, true));
        piece.pitch = 0.5;
        assert_ne!(flat, TopViewIconKey::of(&piece, true, true));
    }

    #[test]
    fn test_catalog_icon_when_not_viewed_from_top() {
        let mut piece = chair();
        piece.icon = Some(ImageRef::new("chair.png"));
        assert_eq!(
            TopViewIconKey::of(&piece, false, true),
            Some(TopViewIconKey::CatalogIcon(ImageRef::new("chair.png")))
        );
    }

    #[test]
    fn test_catalog_icon_without_model_renderer() {
        let mut piece = chair();
        piece.icon = Some(ImageRef::new("chair.png"));
        let mut cache = IconCache::new(None);
        let icon = cache.icon_for(&piece, &Preferences::default()).expect("icon");
        assert_eq!(icon.key, TopViewIconKey::CatalogIcon(ImageRef::new("chair.png")));
        assert!(matches!(&icon.source, IconSource::Texture(image) if *image == ImageRef::new("chair.png")));

        piece.plan_icon = Some(ImageRef::new("chair-plan.png"));
        assert!(matches!(
            TopViewIconKey::of(&piece, true, false),
            Some(TopViewIconKey::PlanIcon { .. })
        ));
    }
}
