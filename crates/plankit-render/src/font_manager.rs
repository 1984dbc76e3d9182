//! System font lookup and text metrics.
//!
//! Fonts come from the system database. When no face matches, metrics fall
//! back to proportional estimates and text outlines are empty; texts still
//! take their room in plan bounds.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use lyon::math::point;
use lyon::path::Path;
use parking_lot::Mutex;
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use std::{
    collections::{HashMap, HashSet},
    fs,
    sync::OnceLock,
};

const FALLBACK_ADVANCE: f32 = 0.6;
const FALLBACK_ASCENT: f32 = 0.8;
const FALLBACK_DESCENT: f32 = 0.2;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// Font selection of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family name, `None` for the default sans serif face.
    pub family: Option<String>,
    /// Size in model units.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

/// Vertical metrics and width of a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub width: f32,
    /// Distance from the baseline to the top, positive.
    pub ascent: f32,
    /// Distance from the baseline to the bottom, positive.
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Font matching a family and style, `None` when no system face fits.
pub fn font_for(family: Option<&str>, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.unwrap_or_default().to_string(),
        bold,
        italic,
    };

    if let Some(font) = cache.lock().get(&key) {
        return *font;
    }

    let loaded = load_font_from_system(&key.family, bold, italic)
        .or_else(|| load_font_from_system("", bold, italic))
        .map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        tracing::debug!("No system font for '{}', using estimated metrics", key.family);
    }
    cache.lock().insert(key, loaded);
    loaded
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" | "SansSerif" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

/// Metrics of a single line of text.
pub fn line_metrics(text: &str, spec: &FontSpec) -> LineMetrics {
    match font_for(spec.family.as_deref(), spec.bold, spec.italic) {
        Some(font) => {
            let scale = Scale::uniform(spec.size);
            let v_metrics = font.v_metrics(scale);
            let width = font
                .layout(text, scale, rt_point(0.0, 0.0))
                .last()
                .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0);
            LineMetrics {
                width,
                ascent: v_metrics.ascent,
                descent: -v_metrics.descent,
                line_gap: v_metrics.line_gap,
            }
        }
        None => LineMetrics {
            width: text.chars().count() as f32 * spec.size * FALLBACK_ADVANCE,
            ascent: spec.size * FALLBACK_ASCENT,
            descent: spec.size * FALLBACK_DESCENT,
            line_gap: 0.0,
        },
    }
}

/// Glyph outlines of a line with its baseline starting at `(x, y)`.
pub fn text_outline(text: &str, spec: &FontSpec, x: f32, y: f32) -> Path {
    let mut builder = PathOutlineBuilder {
        builder: Path::builder(),
        open: false,
    };
    if let Some(font) = font_for(spec.family.as_deref(), spec.bold, spec.italic) {
        let scale = Scale::uniform(spec.size);
        for glyph in font.layout(text, scale, rt_point(x, y)) {
            glyph.build_outline(&mut builder);
        }
    }
    builder.finish()
}

struct PathOutlineBuilder {
    builder: lyon::path::path::Builder,
    open: bool,
}

impl PathOutlineBuilder {
    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(false);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for PathOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(false);
        }
        self.builder.begin(point(x, y));
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quadratic_bezier_to(point(x1, y1), point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(point(x1, y1), point(x2, y2), point(x, y));
    }

    fn close(&mut self) {
        if self.open {
            self.builder.close();
            self.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_scale_with_size() {
        let small = FontSpec {
            family: None,
            size: 10.0,
            bold: false,
            italic: false,
        };
        let large = FontSpec { size: 20.0, ..small.clone() };
        let a = line_metrics("Kitchen", &small);
        let b = line_metrics("Kitchen", &large);
        assert!(a.width > 0.0);
        assert!((b.width / a.width - 2.0).abs() < 0.05);
        assert!(b.ascent > a.ascent);
    }

    #[test]
    fn test_empty_line_has_no_width() {
        let spec = FontSpec {
            family: None,
            size: 12.0,
            bold: false,
            italic: false,
        };
        assert_eq!(line_metrics("", &spec).width, 0.0);
    }
}
