// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room segmentation via flood fill over room-eligible pixels
//!
//! Every maximal 4-connected region of pixels whose category is not
//! excluded (exterior, wall, door, window) becomes one room. Ids are
//! assigned in row-major order of each region's first pixel, starting at 1.

use image::Luma;
use tracing::debug;

use crate::scheme::{CategorySet, LabelScheme};
use crate::types::{LabelImage, PixelBounds, Point2D, RegionMap, Room, RoomId, RoomType};

/// Output of room segmentation
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Room id per pixel, 0 for walls, openings and exterior
    pub region_map: RegionMap,
    /// Rooms ordered by id
    pub rooms: Vec<Room>,
}

/// Per-region accumulator filled during the flood fill
struct RegionStats {
    area: u32,
    bounds: PixelBounds,
    sum_x: u64,
    sum_y: u64,
    histogram: [u32; 256],
}

impl RegionStats {
    fn new(x: u32, y: u32) -> Self {
        Self {
            area: 0,
            bounds: PixelBounds::at(x, y),
            sum_x: 0,
            sum_y: 0,
            histogram: [0; 256],
        }
    }

    fn add(&mut self, x: u32, y: u32, code: u8) {
        self.area += 1;
        self.bounds.include(x, y);
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.histogram[code as usize] += 1;
    }

    fn centroid(&self) -> Point2D {
        if self.area == 0 {
            return Point2D::new(self.bounds.min_x as f64, self.bounds.min_y as f64);
        }
        Point2D::new(
            self.sum_x as f64 / self.area as f64,
            self.sum_y as f64 / self.area as f64,
        )
    }
}

/// Partition a label image into rooms
///
/// Never fails: an image without eligible pixels yields no rooms.
pub fn segment_rooms(labels: &LabelImage, scheme: &LabelScheme) -> Segmentation {
    let (width, height) = labels.dimensions();
    let excluded = scheme.excluded_set();

    let mut region_map = RegionMap::new(width, height);
    let mut rooms = Vec::new();
    let mut next_id: RoomId = 1;

    for y in 0..height {
        for x in 0..width {
            if region_map.get_pixel(x, y).0[0] != 0 {
                continue;
            }
            if excluded.contains(labels.get_pixel(x, y).0[0]) {
                continue;
            }

            let stats = flood_fill_region(labels, &excluded, &mut region_map, x, y, next_id);
            rooms.push(Room {
                id: next_id,
                area: stats.area,
                room_type: classify_region(&stats.histogram, &excluded, scheme),
                bounds: stats.bounds,
                centroid: stats.centroid(),
            });
            next_id += 1;
        }
    }

    debug!(rooms = rooms.len(), width, height, "Segmented rooms");

    Segmentation { region_map, rooms }
}

/// Flood fill one region with an explicit stack, labelling it `id`
fn flood_fill_region(
    labels: &LabelImage,
    excluded: &CategorySet,
    region_map: &mut RegionMap,
    start_x: u32,
    start_y: u32,
    id: RoomId,
) -> RegionStats {
    let width = labels.width();
    let height = labels.height();

    let mut stats = RegionStats::new(start_x, start_y);
    region_map.put_pixel(start_x, start_y, Luma([id]));
    let mut stack = vec![(start_x, start_y)];

    while let Some((x, y)) = stack.pop() {
        stats.add(x, y, labels.get_pixel(x, y).0[0]);

        let mut visit = |nx: u32, ny: u32, stack: &mut Vec<(u32, u32)>| {
            if region_map.get_pixel(nx, ny).0[0] == 0
                && !excluded.contains(labels.get_pixel(nx, ny).0[0])
            {
                region_map.put_pixel(nx, ny, Luma([id]));
                stack.push((nx, ny));
            }
        };

        if x > 0 {
            visit(x - 1, y, &mut stack);
        }
        if x < width - 1 {
            visit(x + 1, y, &mut stack);
        }
        if y > 0 {
            visit(x, y - 1, &mut stack);
        }
        if y < height - 1 {
            visit(x, y + 1, &mut stack);
        }
    }

    stats
}

/// Dominant room type of a region from its category histogram
///
/// The most frequent non-excluded code wins. Ties go to the code listed
/// first in the scheme's room enumeration, then to the lowest unlisted
/// code. A winning code the scheme does not recognize maps to `Other`.
fn classify_region(histogram: &[u32; 256], excluded: &CategorySet, scheme: &LabelScheme) -> RoomType {
    let order_key = |code: u8| match scheme.rank_of(code) {
        Some(rank) => (0, rank),
        None => (1, code as usize),
    };

    let mut best: Option<(u8, u32)> = None;
    for (code, &count) in histogram.iter().enumerate() {
        let code = code as u8;
        if count == 0 || excluded.contains(code) {
            continue;
        }
        best = match best {
            Some((best_code, best_count))
                if best_count > count
                    || (best_count == count && order_key(best_code) < order_key(code)) =>
            {
                Some((best_code, best_count))
            }
            _ => Some((code, count)),
        };
    }

    best.and_then(|(code, _)| scheme.room_type_of(code))
        .unwrap_or(RoomType::Other)
}
