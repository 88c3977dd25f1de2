// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room adjacency detection
//!
//! Two independent passes write into one [`Adjacency`] map:
//!
//! 1. **Openings**: every 4-connected door or window component whose
//!    one-pixel neighbourhood touches exactly two rooms joins those rooms.
//! 2. **Walls**: from each room's boundary, directed scans cross the wall
//!    mask until they reach another room; the crossing is then extended
//!    sideways along the wall run. Segments touching an exterior category
//!    are dropped, and segments that share wall pixels are reduced to a
//!    single room pair according to the configured [`JunctionPolicy`].

mod junctions;
mod openings;
mod walls;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grid::ensure_same_shape;
use crate::scheme::{CategorySet, LabelScheme};
use crate::types::{Adjacency, IconMask, LabelImage, RegionMap, WallMask};

/// How to resolve wall segments that share pixels but name different room pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JunctionPolicy {
    /// Keep the thinnest separation: the pair whose crossing has the fewest
    /// wall pixels between the two rooms
    #[default]
    SmallestContact,
    /// Keep the pair of the first segment found in the blob
    FirstFound,
    /// No tie-break: every segment keeps its own pair
    PerSegment,
}

impl FromStr for JunctionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "smallest" | "smallest-contact" => Ok(JunctionPolicy::SmallestContact),
            "first" | "first-found" => Ok(JunctionPolicy::FirstFound),
            "per-segment" => Ok(JunctionPolicy::PerSegment),
            other => Err(format!(
                "unknown junction policy '{}' (expected smallest, first or per-segment)",
                other
            )),
        }
    }
}

impl fmt::Display for JunctionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JunctionPolicy::SmallestContact => "smallest-contact",
            JunctionPolicy::FirstFound => "first-found",
            JunctionPolicy::PerSegment => "per-segment",
        })
    }
}

/// Configuration for adjacency detection
#[derive(Debug, Clone)]
pub struct AdjacencyConfig {
    /// Label codes outside the building; walls touching them are exterior
    pub exterior: CategorySet,
    pub junction_policy: JunctionPolicy,
}

impl AdjacencyConfig {
    pub fn from_scheme(scheme: &LabelScheme) -> Self {
        Self {
            exterior: scheme.exterior_set(),
            junction_policy: JunctionPolicy::default(),
        }
    }

    pub fn with_junction_policy(mut self, policy: JunctionPolicy) -> Self {
        self.junction_policy = policy;
        self
    }
}

impl Default for AdjacencyConfig {
    fn default() -> Self {
        Self::from_scheme(&LabelScheme::default())
    }
}

/// Detect door, window and wall connections between segmented rooms
///
/// # Arguments
///
/// * `region_map` - Room id per pixel from room segmentation
/// * `wall_mask` - Non-zero where the label is a wall
/// * `icon_mask` - 1 for door pixels, 2 for window pixels
/// * `labels` - Raw label image, used to recognize exterior categories
/// * `config` - Exterior categories and junction policy
///
/// # Errors
///
/// `Error::ShapeMismatch` when any grid differs in size from `labels`.
pub fn detect_adjacency(
    region_map: &RegionMap,
    wall_mask: &WallMask,
    icon_mask: &IconMask,
    labels: &LabelImage,
    config: &AdjacencyConfig,
) -> Result<Adjacency> {
    let expected = labels.dimensions();
    ensure_same_shape("region map", expected, region_map)?;
    ensure_same_shape("wall mask", expected, wall_mask)?;
    ensure_same_shape("icon mask", expected, icon_mask)?;

    let mut adjacency = Adjacency::new();

    let openings = openings::detect_openings(region_map, icon_mask, &mut adjacency);

    let segments = walls::WallScanner::new(region_map, wall_mask, labels, &config.exterior).scan();
    for segment in &segments {
        adjacency.record_wall(segment.pair, segment.area());
    }

    let (width, height) = expected;
    let rolled_back = junctions::resolve_junctions(
        &segments,
        width,
        height,
        config.junction_policy,
        &mut adjacency,
    );

    debug!(
        openings,
        wall_segments = segments.len(),
        rolled_back,
        edges = adjacency.len(),
        "Detected room adjacency"
    );

    Ok(adjacency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_junction_policy_from_str() {
        assert_eq!("smallest".parse::<JunctionPolicy>(), Ok(JunctionPolicy::SmallestContact));
        assert_eq!("first-found".parse::<JunctionPolicy>(), Ok(JunctionPolicy::FirstFound));
        assert_eq!("per-segment".parse::<JunctionPolicy>(), Ok(JunctionPolicy::PerSegment));
        assert!("largest".parse::<JunctionPolicy>().is_err());
        assert_eq!(JunctionPolicy::default().to_string(), "smallest-contact");
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let labels = LabelImage::new(5, 4);
        let region_map = RegionMap::new(5, 4);
        let wall_mask = WallMask::new(5, 3);
        let icon_mask = IconMask::new(5, 4);

        let result = detect_adjacency(
            &region_map,
            &wall_mask,
            &icon_mask,
            &labels,
            &AdjacencyConfig::default(),
        );

        match result {
            Err(Error::ShapeMismatch { grid, found, .. }) => {
                assert_eq!(grid, "wall mask");
                assert_eq!(found, (5, 3));
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_grids() {
        let adjacency = detect_adjacency(
            &RegionMap::new(0, 0),
            &WallMask::new(0, 0),
            &IconMask::new(0, 0),
            &LabelImage::new(0, 0),
            &AdjacencyConfig::default(),
        )
        .unwrap();
        assert!(adjacency.is_empty());
    }
}
