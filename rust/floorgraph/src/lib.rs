// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room adjacency graphs from rasterized floor plan label images
//!
//! This crate turns a label image (one category code per pixel) into:
//! 1. Rooms: maximal 4-connected regions of room surface pixels, each with
//!    an id, pixel area and dominant room type
//! 2. Adjacency: for every pair of rooms, whether they connect through a
//!    door, a window or a shared interior wall, with counts and pixel areas
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorgraph::{analyze_floor_plan, LabelScheme};
//!
//! let labels = image::open("plan/labels.png")?.to_luma8();
//! let icons = image::open("plan/icons.png")?.to_luma8();
//! let topology = analyze_floor_plan(&labels, Some(&icons), &LabelScheme::default())?;
//!
//! for (pair, edge) in topology.adjacency.iter() {
//!     println!("{} {:?}", pair, edge.connection_types);
//! }
//! ```

pub mod adjacency;
pub mod error;
pub mod grid;
pub mod render;
pub mod report;
pub mod room_segmenter;
pub mod scheme;
pub mod types;

// Re-export commonly used types and functions
pub use adjacency::{detect_adjacency, AdjacencyConfig, JunctionPolicy};
pub use error::{Error, Result};
pub use grid::{icon_mask, label_icon_mask, wall_mask, Icon};
pub use render::{render_topology, RenderOptions};
pub use report::{connection_rows, ConnectionRow, TopologyReport};
pub use room_segmenter::{segment_rooms, Segmentation};
pub use scheme::{CategorySet, LabelScheme, RoomCategory};
pub use types::{
    Adjacency, ConnectionKind, ConnectionTypes, Edge, IconMask, LabelImage, RegionMap, Room,
    RoomId, RoomPair, RoomType, WallMask,
};

use tracing::debug;

/// Rooms and room adjacency extracted from one floor plan
#[derive(Debug, Clone)]
pub struct FloorPlanTopology {
    pub width: u32,
    pub height: u32,
    /// Room id per pixel
    pub region_map: RegionMap,
    pub wall_mask: WallMask,
    pub rooms: Vec<Room>,
    pub adjacency: Adjacency,
}

/// Run the full pipeline on one floor plan with the default junction policy
///
/// # Arguments
///
/// * `labels` - Label image, one category code per pixel
/// * `icons` - Separate door/window layer; when `None` the door and window
///   codes are read from `labels`
/// * `scheme` - Meaning of the category codes
pub fn analyze_floor_plan(
    labels: &LabelImage,
    icons: Option<&LabelImage>,
    scheme: &LabelScheme,
) -> Result<FloorPlanTopology> {
    analyze_floor_plan_with(labels, icons, scheme, &AdjacencyConfig::from_scheme(scheme))
}

/// Run the full pipeline on one floor plan
///
/// 1. Wall and opening masks from the label layers
/// 2. Room segmentation
/// 3. Door/window and wall adjacency
pub fn analyze_floor_plan_with(
    labels: &LabelImage,
    icons: Option<&LabelImage>,
    scheme: &LabelScheme,
    config: &AdjacencyConfig,
) -> Result<FloorPlanTopology> {
    let (width, height) = labels.dimensions();

    let walls = wall_mask(labels, scheme);
    let openings = match icons {
        Some(layer) => icon_mask(layer, scheme),
        None => label_icon_mask(labels, scheme),
    };

    let Segmentation { region_map, rooms } = segment_rooms(labels, scheme);
    let adjacency = detect_adjacency(&region_map, &walls, &openings, labels, config)?;

    debug!(
        width,
        height,
        rooms = rooms.len(),
        edges = adjacency.len(),
        "Analyzed floor plan"
    );

    Ok(FloorPlanTopology {
        width,
        height,
        region_map,
        wall_mask: walls,
        rooms,
        adjacency,
    })
}
