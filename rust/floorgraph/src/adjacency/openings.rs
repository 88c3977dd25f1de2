// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window connections

use std::collections::BTreeSet;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::trace;

use crate::grid::{neighbors4, Icon};
use crate::types::{Adjacency, ConnectionKind, IconMask, RegionMap, RoomId, RoomPair};

type ComponentLabels = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Record one connection per opening that touches exactly two rooms
///
/// Returns the number of openings recorded.
pub(super) fn detect_openings(
    region_map: &RegionMap,
    icon_mask: &IconMask,
    adjacency: &mut Adjacency,
) -> usize {
    let mut recorded = 0;

    for (icon, kind) in [
        (Icon::Door, ConnectionKind::Door),
        (Icon::Window, ConnectionKind::Window),
    ] {
        let mask = GrayImage::from_fn(icon_mask.width(), icon_mask.height(), |x, y| {
            Luma([if icon_mask.get_pixel(x, y).0[0] == icon.value() { 255 } else { 0 }])
        });
        let labelled = connected_components(&mask, Connectivity::Four, Luma([0u8]));

        for (index, pixels) in collect_components(&labelled).iter().enumerate() {
            if pixels.is_empty() {
                continue;
            }
            let label = index as u32 + 1;
            let rooms = surrounding_rooms(&labelled, label, pixels, region_map);

            let pair = match rooms.iter().copied().collect::<Vec<_>>().as_slice() {
                [a, b] => RoomPair::new(*a, *b),
                _ => None,
            };
            match pair {
                Some(pair) => {
                    adjacency.record_opening(pair, kind, pixels.len() as u32);
                    recorded += 1;
                }
                None => trace!(
                    kind = kind.name(),
                    rooms = rooms.len(),
                    area = pixels.len(),
                    "Skipping opening that does not join exactly two rooms"
                ),
            }
        }
    }

    recorded
}

/// Pixels of each component, indexed by label - 1
fn collect_components(labelled: &ComponentLabels) -> Vec<Vec<(u32, u32)>> {
    let mut components: Vec<Vec<(u32, u32)>> = Vec::new();
    for (x, y, pixel) in labelled.enumerate_pixels() {
        let label = pixel.0[0];
        if label == 0 {
            continue;
        }
        let index = label as usize - 1;
        if components.len() <= index {
            components.resize_with(index + 1, Vec::new);
        }
        components[index].push((x, y));
    }
    components
}

/// Room ids on the one-pixel 4-connected ring around a component
fn surrounding_rooms(
    labelled: &ComponentLabels,
    label: u32,
    pixels: &[(u32, u32)],
    region_map: &RegionMap,
) -> BTreeSet<RoomId> {
    let (width, height) = labelled.dimensions();
    let mut rooms = BTreeSet::new();

    for &(x, y) in pixels {
        for (nx, ny) in neighbors4(x, y, width, height) {
            if labelled.get_pixel(nx, ny).0[0] == label {
                continue;
            }
            let id = region_map.get_pixel(nx, ny).0[0];
            if id > 0 {
                rooms.insert(id);
            }
        }
    }

    rooms
}
