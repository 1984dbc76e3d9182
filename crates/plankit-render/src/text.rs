//! Multi-line text layout shared by bounds computation and painting.
//!
//! A text block is anchored at the baseline of its last line: lines stack
//! upward from the anchor, each aligned on its own around the anchor x.

use lyon::math::{point, vector, Angle, Point, Transform};
use plankit_core::constants::MINIMUM_VISIBLE_AREA;
use plankit_core::{Color, ItemId, ItemKind, TextAlignment, TextStyle};
use plankit_settings::Preferences;

use crate::font_manager::{self, FontSpec, LineMetrics};
use crate::geometry::Rect;
use crate::model::{DimensionLine, PlanItem};

/// Ratio of the font size used as outline stroke width.
pub const OUTLINE_RATIO: f32 = 0.05;

/// Laid out lines of a text block, in the block frame.
#[derive(Debug, Clone)]
pub struct TextLayout {
    lines: Vec<(String, LineMetrics)>,
    font: FontSpec,
    alignment: TextAlignment,
}

impl TextLayout {
    /// Lay out `text` with `style`, using `default_font` for styles without
    /// a family. Trailing line breaks are ignored.
    pub fn new(text: &str, style: &TextStyle, default_font: Option<&str>) -> Self {
        let font = FontSpec {
            family: style
                .font_name
                .clone()
                .or_else(|| default_font.map(str::to_string)),
            size: style.font_size,
            bold: style.bold,
            italic: style.italic,
        };
        let lines = text
            .trim_end_matches('\n')
            .split('\n')
            .map(|line| (line.to_string(), font_manager::line_metrics(line, &font)))
            .collect();
        Self {
            lines,
            font,
            alignment: style.alignment,
        }
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> f32 {
        self.lines
            .iter()
            .map(|(_, metrics)| metrics.width)
            .fold(0.0, f32::max)
    }

    pub fn line_height(&self) -> f32 {
        self.lines
            .first()
            .map(|(_, metrics)| metrics.height())
            .unwrap_or(self.font.size)
    }

    fn offset_x(&self, width: f32) -> f32 {
        match self.alignment {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => -width / 2.0,
            TextAlignment::Right => -width,
        }
    }

    /// Each line with the start of its baseline in the block frame, first
    /// line first.
    pub fn positioned_lines(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        let count = self.lines.len();
        let line_height = self.line_height();
        self.lines.iter().enumerate().map(move |(i, (text, metrics))| {
            let y = -((count - 1 - i) as f32) * line_height;
            (text.as_str(), point(self.offset_x(metrics.width), y))
        })
    }

    /// Bounds in the block frame, widest line wide and every line high.
    pub fn local_bounds(&self) -> Rect {
        let width = self.width();
        let (ascent, descent) = self
            .lines
            .first()
            .map(|(_, m)| (m.ascent, m.descent))
            .unwrap_or((self.font.size, 0.0));
        let top = -ascent - self.line_height() * (self.lines.len().saturating_sub(1)) as f32;
        Rect::from_ltrb(self.offset_x(width), top, self.offset_x(width) + width, descent)
    }

    /// Model bounds of the block anchored at `(x, y)` and rotated by `angle`.
    pub fn bounds(&self, x: f32, y: f32, angle: f32) -> Rect {
        let transform = block_transform(x, y, angle);
        let corners = self
            .local_bounds()
            .corners()
            .map(|c| transform.transform_point(c));
        Rect::from_points(&corners).unwrap_or_else(|| Rect::at(point(x, y)))
    }

    /// Bounds grown by the outline stroke.
    pub fn outlined_bounds(&self, x: f32, y: f32, angle: f32) -> Rect {
        let margin = self.font.size * OUTLINE_RATIO;
        self.bounds(x, y, angle).inflate(margin, margin)
    }
}

/// Which text of an item a placed text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Name,
    Area,
    Length,
    Label,
}

/// A text block of an item, resolved against the preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub item: ItemId,
    pub kind: ItemKind,
    pub role: TextRole,
    pub text: String,
    pub style: TextStyle,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub color: Option<Color>,
    pub outline_color: Option<Color>,
}

impl PlacedText {
    pub fn layout(&self, default_font: Option<&str>) -> TextLayout {
        TextLayout::new(&self.text, &self.style, default_font)
    }

    /// Model bounds, grown by the outline when the text has one.
    pub fn bounds(&self, default_font: Option<&str>) -> Rect {
        let layout = self.layout(default_font);
        if self.outline_color.is_some() {
            layout.outlined_bounds(self.x, self.y, self.angle)
        } else {
            layout.bounds(self.x, self.y, self.angle)
        }
    }
}

/// Texts drawn for `item`: room names and areas, visible furniture names,
/// dimension line lengths and labels.
pub fn item_texts(item: &PlanItem, preferences: &Preferences) -> Vec<PlacedText> {
    let placed = |role: TextRole, text: String, style: TextStyle, x: f32, y: f32, angle: f32| {
        PlacedText {
            item: item.id(),
            kind: item.kind(),
            role,
            text,
            style,
            x,
            y,
            angle,
            color: None,
            outline_color: None,
        }
    };
    let mut texts = Vec::new();
    match item {
        PlanItem::Room(room) => {
            let center = room.center();
            if let Some(name) = room.visible_name() {
                let style = room
                    .name_style
                    .clone()
                    .unwrap_or_else(|| preferences.default_text_style(ItemKind::Room));
                texts.push(placed(
                    TextRole::Name,
                    name.to_string(),
                    style,
                    center.x + room.name_x_offset,
                    center.y + room.name_y_offset,
                    room.name_angle,
                ));
            }
            let area = room.area();
            if room.area_visible && area > MINIMUM_VISIBLE_AREA {
                let style = room
                    .area_style
                    .clone()
                    .unwrap_or_else(|| preferences.text.room_area.clone());
                texts.push(placed(
                    TextRole::Area,
                    preferences.length_unit().format_area(area),
                    style,
                    center.x + room.area_x_offset,
                    center.y + room.area_y_offset,
                    room.area_angle,
                ));
            }
        }
        PlanItem::Furniture(piece) if piece.visible => {
            if let Some(name) = piece.visible_name() {
                let style = piece
                    .name_style
                    .clone()
                    .unwrap_or_else(|| preferences.default_text_style(ItemKind::Furniture));
                texts.push(placed(
                    TextRole::Name,
                    name.to_string(),
                    style,
                    piece.x + piece.name_x_offset,
                    piece.y + piece.name_y_offset,
                    piece.name_angle,
                ));
            }
        }
        PlanItem::DimensionLine(line) if line.elevation_start == line.elevation_end => {
            let style = line
                .length_style
                .clone()
                .unwrap_or_else(|| preferences.default_text_style(ItemKind::DimensionLine))
                .derive_alignment(TextAlignment::Center);
            let text = preferences.length_unit().format_length(line.length());
            let anchor = length_text_anchor(line, &text, &style, preferences);
            let mut length = placed(TextRole::Length, text, style, anchor.x, anchor.y, line.angle());
            length.color = line.color;
            texts.push(length);
        }
        PlanItem::Label(label) => {
            let style = label
                .style
                .clone()
                .unwrap_or_else(|| preferences.default_text_style(ItemKind::Label));
            let mut text = placed(
                TextRole::Label,
                label.text.clone(),
                style,
                label.x,
                label.y,
                label.angle,
            );
            text.color = label.color;
            text.outline_color = label.outline_color;
            texts.push(text);
        }
        _ => {}
    }
    texts
}

/// Baseline center of a dimension line length, above the line for a
/// negative offset and below it otherwise.
fn length_text_anchor(
    line: &DimensionLine,
    text: &str,
    style: &TextStyle,
    preferences: &Preferences,
) -> Point {
    let layout = TextLayout::new(text, style, preferences.text.default_font_name.as_deref());
    let metrics = layout
        .lines
        .first()
        .map(|(_, metrics)| *metrics)
        .unwrap_or(LineMetrics {
            width: 0.0,
            ascent: style.font_size,
            descent: 0.0,
            line_gap: 0.0,
        });
    let shift = if line.offset <= 0.0 {
        -metrics.descent - 1.0
    } else {
        metrics.ascent + 1.0
    };
    let local = vector(line.length() / 2.0, line.offset + shift);
    line.start() + Transform::rotation(Angle::radians(line.angle())).transform_vector(local)
}

/// Transform from a block frame to the model.
pub fn block_transform(x: f32, y: f32, angle: f32) -> Transform {
    Transform::rotation(Angle::radians(angle)).then_translate(lyon::math::vector(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_stack_upward() {
        let layout = TextLayout::new("One\nTwo\n", &TextStyle::new(10.0), None);
        assert_eq!(layout.line_count(), 2);
        let lines: Vec<_> = layout.positioned_lines().collect();
        assert_eq!(lines[0].0, "One");
        assert!(lines[0].1.y < 0.0);
        assert_eq!(lines[1].1.y, 0.0);
    }

    #[test]
    fn test_alignment_shifts_bounds() {
        let style = TextStyle::new(10.0);
        let center = TextLayout::new("Hall", &style, None).local_bounds();
        let left = TextLayout::new("Hall", &style.derive_alignment(TextAlignment::Left), None)
            .local_bounds();
        let right = TextLayout::new("Hall", &style.derive_alignment(TextAlignment::Right), None)
            .local_bounds();
        assert!((center.center().x).abs() < 1e-3);
        assert_eq!(left.min_x(), 0.0);
        assert!((right.max_x()).abs() < 1e-3);
    }

    #[test]
    fn test_room_area_text_at_center() {
        use crate::model::Room;
        let room = Room::new(vec![
            point(0.0, 0.0),
            point(400.0, 0.0),
            point(400.0, 300.0),
            point(0.0, 300.0),
        ]);
        let texts = item_texts(&PlanItem::from(room), &Preferences::default());
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].role, TextRole::Area);
        assert_eq!(texts[0].text, "12.00 m²");
        assert_eq!((texts[0].x, texts[0].y), (200.0, 150.0));
    }

    #[test]
    fn test_length_text_side_follows_offset() {
        let prefs = Preferences::default();
        let above = DimensionLine::new(0.0, 0.0, 200.0, 0.0, -20.0);
        let below = DimensionLine::new(0.0, 0.0, 200.0, 0.0, 20.0);
        let a = &item_texts(&PlanItem::from(above), &prefs)[0];
        let b = &item_texts(&PlanItem::from(below), &prefs)[0];
        assert!((a.x - 100.0).abs() < 1e-3);
        assert!(a.y < -20.0);
        assert!(b.y > 20.0);
        assert_eq!(a.text, "200 cm");
    }

    #[test]
    fn test_hidden_furniture_name() {
        use crate::model::Furniture;
        let mut piece = Furniture::new("Sofa", 0.0, 0.0, 200.0, 90.0, 80.0);
        assert!(item_texts(&PlanItem::from(piece.clone()), &Preferences::default()).is_empty());
        piece.name_visible = true;
        assert_eq!(item_texts(&PlanItem::from(piece), &Preferences::default()).len(), 1);
    }

    #[test]
    fn test_rotated_bounds_swap_extent() {
        let layout = TextLayout::new("Long label", &TextStyle::new(10.0), None);
        let flat = layout.bounds(0.0, 0.0, 0.0);
        let turned = layout.bounds(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        assert!((flat.width - turned.height).abs() < 1e-2);
    }
}
