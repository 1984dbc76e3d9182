//! Texture acquisition for room floors, furniture plan icons and background
//! images.
//!
//! Decoding is left to a [`TextureProvider`]. The [`TextureManager`] keeps
//! the state of every image asked for, so painting never blocks: an image
//! still loading paints as the waiting placeholder, a failed one as the
//! error placeholder, and its arrival is published on the event bus so the
//! plan repaints.

use image::{Rgba, RgbaImage};
use parking_lot::RwLock;
use plankit_core::event_bus::RenderEvent;
use plankit_core::{EventBus, PlanEvent, TextureError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::model::ImageRef;

/// Outcome reported to a texture observer.
#[derive(Debug, Clone)]
pub enum TextureLoad {
    Updated(Arc<RgbaImage>),
    Error(TextureError),
}

/// Callback receiving the outcome of a texture load, possibly from another
/// thread.
pub type TextureObserver = Arc<dyn Fn(TextureLoad) + Send + Sync>;

/// Source of decoded images.
pub trait TextureProvider: Send + Sync {
    /// Load `image` and report to `observer`. A synchronous load reports
    /// before returning.
    fn load_texture(&self, image: &ImageRef, synchronous: bool, observer: TextureObserver);
}

/// What is known of an image.
#[derive(Debug, Clone)]
pub enum TextureState {
    Waiting,
    Ready(Arc<RgbaImage>),
    Error,
}

impl TextureState {
    /// Image to paint, placeholders included.
    pub fn image(&self) -> Arc<RgbaImage> {
        match self {
            TextureState::Waiting => waiting_image(),
            TextureState::Ready(image) => image.clone(),
            TextureState::Error => error_image(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TextureState::Ready(_))
    }
}

const PLACEHOLDER_SIZE: u32 = 16;

/// Light gray checker shown while an image loads.
pub fn waiting_image() -> Arc<RgbaImage> {
    static IMAGE: OnceLock<Arc<RgbaImage>> = OnceLock::new();
    IMAGE
        .get_or_init(|| {
            Arc::new(RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
                if (x / 4 + y / 4) % 2 == 0 {
                    Rgba([224, 224, 224, 255])
                } else {
                    Rgba([192, 192, 192, 255])
                }
            }))
        })
        .clone()
}

/// Red cross on white shown for images that failed to load.
pub fn error_image() -> Arc<RgbaImage> {
    static IMAGE: OnceLock<Arc<RgbaImage>> = OnceLock::new();
    IMAGE
        .get_or_init(|| {
            Arc::new(RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
                if x == y || x + y == PLACEHOLDER_SIZE - 1 {
                    Rgba([220, 0, 0, 255])
                } else {
                    Rgba([255, 255, 255, 255])
                }
            }))
        })
        .clone()
}

/// Cache of image states in front of a provider.
pub struct TextureManager {
    provider: Arc<dyn TextureProvider>,
    states: Arc<RwLock<HashMap<ImageRef, TextureState>>>,
    bus: Arc<EventBus>,
}

impl TextureManager {
    pub fn new(provider: Arc<dyn TextureProvider>, bus: Arc<EventBus>) -> Self {
        Self {
            provider,
            states: Arc::new(RwLock::new(HashMap::new())),
            bus,
        }
    }

    /// State of `image`, starting its load on first request. Print and
    /// export ask for synchronous loads so they never paint placeholders.
    pub fn texture(&self, image: &ImageRef, synchronous: bool) -> TextureState {
        if let Some(state) = self.states.read().get(image) {
            if !(synchronous && matches!(state, TextureState::Waiting)) {
                return state.clone();
            }
        }
        self.states
            .write()
            .entry(image.clone())
            .or_insert(TextureState::Waiting);

        let states = self.states.clone();
        let bus = self.bus.clone();
        let key = image.clone();
        let observer: TextureObserver = Arc::new(move |load| {
            let (state, event) = match load {
                TextureLoad::Updated(data) => (
                    TextureState::Ready(data),
                    RenderEvent::TextureLoaded {
                        image: key.to_string(),
                    },
                ),
                TextureLoad::Error(error) => {
                    tracing::warn!("Texture {} unavailable: {}", key, error);
                    (
                        TextureState::Error,
                        RenderEvent::TextureFailed {
                            image: key.to_string(),
                            error: error.to_string(),
                        },
                    )
                }
            };
            states.write().insert(key.clone(), state);
            bus.publish(PlanEvent::Render(event)).ok();
        });
        self.provider.load_texture(image, synchronous, observer);

        self.states
            .read()
            .get(image)
            .cloned()
            .unwrap_or(TextureState::Waiting)
    }

    /// Forget `image` so the next request loads it again.
    pub fn evict(&self, image: &ImageRef) {
        self.states.write().remove(image);
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

/// Provider decoding image files, relative references resolved against
/// `root`.
#[derive(Debug, Clone, Default)]
pub struct ImageFileProvider {
    root: Option<PathBuf>,
}

impl ImageFileProvider {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn path(&self, image: &ImageRef) -> PathBuf {
        let path = PathBuf::from(image.as_str().trim_start_matches("file://"));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }

    fn decode(path: PathBuf, image: &ImageRef) -> TextureLoad {
        if !path.exists() {
            return TextureLoad::Error(TextureError::NotFound(image.to_string()));
        }
        match image::open(&path) {
            Ok(decoded) => TextureLoad::Updated(Arc::new(decoded.to_rgba8())),
            Err(e) => TextureLoad::Error(TextureError::Decode {
                image: image.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl TextureProvider for ImageFileProvider {
    fn load_texture(&self, image: &ImageRef, synchronous: bool, observer: TextureObserver) {
        let path = self.path(image);
        if synchronous {
            observer(Self::decode(path, image));
            return;
        }
        let image = image.clone();
        let load = move || observer(Self::decode(path, &image));
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => drop(runtime.spawn_blocking(load)),
            Err(_) => drop(std::thread::spawn(load)),
        }
    }
}

/// Provider serving images registered in memory, always synchronously.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextureProvider {
    images: Arc<RwLock<HashMap<ImageRef, Arc<RgbaImage>>>>,
}

impl MemoryTextureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, image: ImageRef, data: RgbaImage) {
        self.images.write().insert(image, Arc::new(data));
    }
}

impl TextureProvider for MemoryTextureProvider {
    fn load_texture(&self, image: &ImageRef, _synchronous: bool, observer: TextureObserver) {
        let load = match self.images.read().get(image) {
            Some(data) => TextureLoad::Updated(data.clone()),
            None => TextureLoad::Error(TextureError::NotFound(image.to_string())),
        };
        observer(load);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plankit_core::EventFilter;

    struct NeverProvider;

    impl TextureProvider for NeverProvider {
        fn load_texture(&self, _image: &ImageRef, _synchronous: bool, _observer: TextureObserver) {}
    }

    #[test]
    fn test_pending_texture_paints_waiting_placeholder() {
        let manager = TextureManager::new(Arc::new(NeverProvider), Arc::new(EventBus::new()));
        let state = manager.texture(&ImageRef::new("floor.png"), false);
        assert!(matches!(state, TextureState::Waiting));
        assert!(Arc::ptr_eq(&state.image(), &waiting_image()));
    }

    #[test]
    fn test_memory_texture_publishes_arrival() {
        let provider = MemoryTextureProvider::new();
        provider.insert(ImageRef::new("tiles"), RgbaImage::new(4, 4));
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(EventFilter::All, move |event| sink.lock().push(event.description()));

        let manager = TextureManager::new(Arc::new(provider), bus);
        assert!(manager.texture(&ImageRef::new("tiles"), false).is_ready());
        assert!(manager.texture(&ImageRef::new("tiles"), false).is_ready());
        assert_eq!(seen.lock().as_slice(), ["Texture loaded: tiles"]);
    }

    #[test]
    fn test_missing_file_gives_error_placeholder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let provider = ImageFileProvider::new(Some(dir.path().to_path_buf()));
        let manager = TextureManager::new(Arc::new(provider), Arc::new(EventBus::new()));
        let state = manager.texture(&ImageRef::new("missing.png"), true);
        assert!(matches!(state, TextureState::Error));
        assert!(Arc::ptr_eq(&state.image(), &error_image()));
    }

    fn save_wood(dir: &tempfile::TempDir) -> ImageFileProvider {
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(dir.path().join("wood.png"))
            .expect("save");
        ImageFileProvider::new(Some(dir.path().to_path_buf()))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_async_file_load_uses_runtime_blocking_pool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let provider = save_wood(&dir);
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let observer: TextureObserver = Arc::new(move |load| {
            let on_runtime = tokio::runtime::Handle::try_current().is_ok();
            sender.send((load, on_runtime)).ok();
        });
        provider.load_texture(&ImageRef::new("wood.png"), false, observer);

        let (load, on_runtime) = receiver.recv().await.expect("load reported");
        assert!(on_runtime);
        assert!(matches!(load, TextureLoad::Updated(image) if image.dimensions() == (3, 2)));
    }

    #[test]
    fn test_async_file_load_without_runtime() {
        let dir = tempfile::tempdir().expect("tempdir");
        let provider = save_wood(&dir);
        let (sender, receiver) = std::sync::mpsc::sync_channel(1);
        let observer: TextureObserver = Arc::new(move |load| {
            let on_runtime = tokio::runtime::Handle::try_current().is_ok();
            sender.send((load, on_runtime)).ok();
        });
        provider.load_texture(&ImageRef::new("wood.png"), false, observer);

        let (load, on_runtime) = receiver
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("load reported");
        assert!(!on_runtime);
        assert!(matches!(load, TextureLoad::Updated(_)));
    }

    #[test]
    fn test_file_texture_decodes() {
        let dir = tempfile::tempdir().expect("tempdir");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save(dir.path().join("wood.png"))
            .expect("save");
        let provider = ImageFileProvider::new(Some(dir.path().to_path_buf()));
        let manager = TextureManager::new(Arc::new(provider), Arc::new(EventBus::new()));
        match manager.texture(&ImageRef::new("wood.png"), true) {
            TextureState::Ready(image) => assert_eq!(image.dimensions(), (3, 2)),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
