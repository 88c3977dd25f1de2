// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology rendering: rooms, walls and the adjacency graph on one image

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashMap;

use crate::types::{Adjacency, Edge, RegionMap, Room, RoomId, RoomType, WallMask};

const EXTERIOR_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const WALL_COLOR: Rgb<u8> = Rgb([64, 64, 64]);
const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Door/window and wall
pub const MIXED_EDGE_COLOR: Rgb<u8> = Rgb([145, 168, 209]);
/// Door/window only
pub const OPENING_EDGE_COLOR: Rgb<u8> = Rgb([236, 179, 184]);
/// Wall only
pub const WALL_EDGE_COLOR: Rgb<u8> = Rgb([173, 175, 170]);

/// Rendering parameters
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Node radius of the smallest room (pixels)
    pub min_radius: u32,
    /// Node radius of the largest room (pixels)
    pub max_radius: u32,
    /// Edge line width (pixels)
    pub edge_width: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_radius: 6,
            max_radius: 30,
            edge_width: 3,
        }
    }
}

/// Node fill color for a room type
pub fn room_color(room_type: RoomType) -> Rgb<u8> {
    match room_type {
        RoomType::Kitchen => Rgb([224, 122, 95]),
        RoomType::LivingRoom => Rgb([129, 178, 154]),
        RoomType::Bedroom => Rgb([61, 90, 128]),
        RoomType::Bath => Rgb([152, 193, 217]),
        RoomType::Hallway => Rgb([242, 204, 143]),
        RoomType::Storage => Rgb([141, 125, 202]),
        RoomType::Garage => Rgb([120, 120, 120]),
        RoomType::Other => Rgb([200, 200, 200]),
    }
}

/// Edge color by the kinds of connection an edge carries
pub fn edge_color(edge: &Edge) -> Option<Rgb<u8>> {
    match (edge.has_door_window(), edge.has_wall()) {
        (true, true) => Some(MIXED_EDGE_COLOR),
        (true, false) => Some(OPENING_EDGE_COLOR),
        (false, true) => Some(WALL_EDGE_COLOR),
        (false, false) => None,
    }
}

fn tint(color: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = color.0;
    let lighten = |c: u8| (c as u16 + (255 - c as u16) * 3 / 5) as u8;
    Rgb([lighten(r), lighten(g), lighten(b)])
}

/// Draw the floor plan with its room graph on top
///
/// Rooms are tinted by type and walls drawn dark. Each edge is a line
/// between the two room centroids; each room is a circle whose radius
/// grows with the square root of its area.
pub fn render_topology(
    region_map: &RegionMap,
    wall_mask: &WallMask,
    rooms: &[Room],
    adjacency: &Adjacency,
    options: &RenderOptions,
) -> RgbImage {
    let (width, height) = region_map.dimensions();
    let types: FxHashMap<RoomId, RoomType> =
        rooms.iter().map(|room| (room.id, room.room_type)).collect();

    let mut canvas = RgbImage::from_fn(width, height, |x, y| {
        let id = region_map.get_pixel(x, y).0[0];
        if let Some(room_type) = types.get(&id) {
            tint(room_color(*room_type))
        } else if wall_mask.get_pixel(x, y).0[0] != 0 {
            WALL_COLOR
        } else {
            EXTERIOR_COLOR
        }
    });

    let centers: FxHashMap<RoomId, Point2<f64>> = rooms
        .iter()
        .map(|room| (room.id, room.centroid.to_nalgebra()))
        .collect();

    for (pair, edge) in adjacency.iter() {
        let (Some(a), Some(b), Some(color)) = (
            centers.get(&pair.low()),
            centers.get(&pair.high()),
            edge_color(edge),
        ) else {
            continue;
        };
        draw_thick_line(&mut canvas, a, b, options.edge_width, color);
    }

    let radii = node_radii(rooms, options);
    for room in rooms {
        let center = (room.centroid.x.round() as i32, room.centroid.y.round() as i32);
        let radius = radii.get(&room.id).copied().unwrap_or(options.min_radius) as i32;
        draw_filled_circle_mut(&mut canvas, center, radius, room_color(room.room_type));
        draw_hollow_circle_mut(&mut canvas, center, radius, OUTLINE_COLOR);
        if radius > 2 {
            draw_hollow_circle_mut(&mut canvas, center, radius - 1, OUTLINE_COLOR);
        }
    }

    canvas
}

/// Node radius per room, linear in sqrt(area) between the configured bounds
fn node_radii(rooms: &[Room], options: &RenderOptions) -> FxHashMap<RoomId, u32> {
    let roots: Vec<f64> = rooms.iter().map(|room| (room.area as f64).sqrt()).collect();
    let Some(min) = roots.iter().copied().reduce(f64::min) else {
        return FxHashMap::default();
    };
    let max = roots.iter().copied().fold(min, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let low = options.min_radius as f64;
    let high = options.max_radius.max(options.min_radius) as f64;

    rooms
        .iter()
        .zip(roots)
        .map(|(room, root)| {
            let radius = low + (root - min) / span * (high - low);
            (room.id, radius.round().clamp(low, high) as u32)
        })
        .collect()
}

/// Draw a line `width` pixels wide as parallel one-pixel segments
fn draw_thick_line(
    canvas: &mut RgbImage,
    a: &Point2<f64>,
    b: &Point2<f64>,
    width: u32,
    color: Rgb<u8>,
) {
    let direction: Vector2<f64> = b - a;
    let normal = if direction.norm() > f64::EPSILON {
        Vector2::new(-direction.y, direction.x).normalize()
    } else {
        Vector2::new(0.0, 1.0)
    };

    let half = width.max(1) as i32 / 2;
    for k in -half..=half {
        let shift = normal * k as f64;
        let start = a + shift;
        let end = b + shift;
        draw_line_segment_mut(
            canvas,
            (start.x as f32, start.y as f32),
            (end.x as f32, end.y as f32),
            color,
        );
    }
}
