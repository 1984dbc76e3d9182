//! Wall regions merged by fill pattern.

use plankit_core::WallPattern;

use crate::geometry::Region;
use crate::model::{Home, Wall};

/// Union of the walls drawn with one pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct WallArea {
    pub pattern: WallPattern,
    pub region: Region,
}

/// Wall regions of a level, one per pattern in order of first use, and the
/// union of all of them for the outline pass.
#[derive(Debug, Clone, Default)]
pub struct WallAreas {
    pub by_pattern: Vec<WallArea>,
    pub outline: Region,
}

impl WallAreas {
    pub fn is_empty(&self) -> bool {
        self.by_pattern.is_empty()
    }

    pub fn pattern_region(&self, pattern: WallPattern) -> Option<&Region> {
        self.by_pattern
            .iter()
            .find(|area| area.pattern == pattern)
            .map(|area| &area.region)
    }
}

/// Merge `walls` into one region per pattern. Walls without a pattern use
/// `default_pattern`.
pub fn wall_areas_for<'a>(
    home: &Home,
    walls: impl IntoIterator<Item = &'a Wall>,
    default_pattern: WallPattern,
) -> WallAreas {
    let mut by_pattern: Vec<(WallPattern, Vec<Region>)> = Vec::new();
    for wall in walls {
        let pattern = wall.pattern.unwrap_or(default_pattern);
        let region = Region::polygon_or_empty(&home.wall_points(wall));
        match by_pattern.iter_mut().find(|(p, _)| *p == pattern) {
            Some((_, regions)) => regions.push(region),
            None => by_pattern.push((pattern, vec![region])),
        }
    }

    let by_pattern: Vec<WallArea> = by_pattern
        .into_iter()
        .map(|(pattern, regions)| WallArea {
            pattern,
            region: Region::union_all(&regions),
        })
        .collect();
    let outline = if by_pattern.len() == 1 {
        by_pattern[0].region.clone()
    } else {
        Region::union_all(by_pattern.iter().map(|area| &area.region))
    };
    tracing::debug!("Merged walls into {} pattern area(s)", by_pattern.len());
    WallAreas {
        by_pattern,
        outline,
    }
}

/// Wall areas of the walls viewable at the selected level.
pub fn viewable_wall_areas(home: &Home, default_pattern: WallPattern) -> WallAreas {
    let walls = home
        .items()
        .iter()
        .filter(|item| home.is_viewable_at_selected_level(item))
        .filter_map(|item| item.as_wall());
    wall_areas_for(home, walls, default_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_walls(first: WallPattern, second: WallPattern) -> Home {
        let mut home = Home::default();
        let a = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0).with_pattern(first));
        let b = home.add_item(Wall::new(300.0, 0.0, 300.0, 300.0, 20.0).with_pattern(second));
        home.join_walls(a, b).expect("join");
        home
    }

    #[test]
    fn test_same_pattern_merges_into_one_region() {
        let home = two_walls(WallPattern::HatchUp, WallPattern::HatchUp);
        let areas = viewable_wall_areas(&home, WallPattern::CrossHatch);
        assert_eq!(areas.by_pattern.len(), 1);
        assert_eq!(areas.by_pattern[0].pattern, WallPattern::HatchUp);
        assert_eq!(areas.by_pattern[0].region.polygons().len(), 1);
    }

    #[test]
    fn test_different_patterns_keep_first_use_order() {
        let home = two_walls(WallPattern::CrossHatch, WallPattern::Foreground);
        let areas = viewable_wall_areas(&home, WallPattern::HatchUp);
        let patterns: Vec<_> = areas.by_pattern.iter().map(|a| a.pattern).collect();
        assert_eq!(patterns, vec![WallPattern::CrossHatch, WallPattern::Foreground]);
        assert_eq!(areas.outline.polygons().len(), 1);
    }

    #[test]
    fn test_union_is_idempotent() {
        let home = two_walls(WallPattern::HatchUp, WallPattern::HatchUp);
        let region = viewable_wall_areas(&home, WallPattern::HatchUp).outline;
        let again = region.union(&region);
        assert!((again.area() - region.area()).abs() < 1e-2);
        assert_eq!(again.polygons().len(), region.polygons().len());
    }

    #[test]
    fn test_no_walls_gives_empty_areas() {
        let areas = viewable_wall_areas(&Home::default(), WallPattern::HatchUp);
        assert!(areas.is_empty());
        assert!(areas.outline.is_empty());
    }
}
