// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pixel grid helpers: derived masks, shape checks and 4-neighbourhoods

use image::{GenericImageView, Luma};

use crate::error::{Error, Result};
use crate::scheme::LabelScheme;
use crate::types::{IconMask, LabelImage, WallMask};

/// Wall mask value
pub const WALL: u8 = 255;

/// Opening kind stored in an icon mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Door = 1,
    Window = 2,
}

impl Icon {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Wall mask: 255 where the label is the scheme's wall code
pub fn wall_mask(labels: &LabelImage, scheme: &LabelScheme) -> WallMask {
    WallMask::from_fn(labels.width(), labels.height(), |x, y| {
        let value = if labels.get_pixel(x, y).0[0] == scheme.wall {
            WALL
        } else {
            0
        };
        Luma([value])
    })
}

/// Icon mask from the door/window codes of `layer`
///
/// `layer` is either a separate opening layer or the label image itself.
pub fn icon_mask(layer: &LabelImage, scheme: &LabelScheme) -> IconMask {
    IconMask::from_fn(layer.width(), layer.height(), |x, y| {
        let code = layer.get_pixel(x, y).0[0];
        let value = if code == scheme.door {
            Icon::Door.value()
        } else if code == scheme.window {
            Icon::Window.value()
        } else {
            0
        };
        Luma([value])
    })
}

/// Icon mask read from the label image itself
///
/// Schemes may reuse label codes for the icon layer: the default window
/// code is the wall code and the default door code is "outdoor". In the
/// label image, wall and exterior codes keep their label meaning and are
/// never openings.
pub fn label_icon_mask(labels: &LabelImage, scheme: &LabelScheme) -> IconMask {
    let exterior = scheme.exterior_set();
    let mut mask = icon_mask(labels, scheme);
    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        let code = labels.get_pixel(x, y).0[0];
        if code == scheme.wall || exterior.contains(code) {
            pixel.0[0] = 0;
        }
    }
    mask
}

/// Fail with `ShapeMismatch` unless `grid` has the label image's dimensions
pub fn ensure_same_shape<I: GenericImageView>(
    name: &'static str,
    expected: (u32, u32),
    grid: &I,
) -> Result<()> {
    let found = grid.dimensions();
    if found == expected {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            grid: name,
            expected,
            found,
        })
    }
}

/// Axis direction on the pixel grid (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Fixed scan order
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    /// The two directions perpendicular to this one
    pub fn transverse(self) -> [Direction; 2] {
        match self {
            Direction::Right | Direction::Left => [Direction::Down, Direction::Up],
            Direction::Down | Direction::Up => [Direction::Right, Direction::Left],
        }
    }
}

/// Pixel `steps` away from `(x, y)` in `direction`, if inside a `width x height` grid
#[inline]
pub fn step(
    x: u32,
    y: u32,
    direction: Direction,
    steps: u32,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    let (dx, dy) = direction.offset();
    let nx = x as i64 + dx * steps as i64;
    let ny = y as i64 + dy * steps as i64;
    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
        None
    } else {
        Some((nx as u32, ny as u32))
    }
}

/// In-bounds 4-neighbours of `(x, y)` in fixed direction order
pub fn neighbors4(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| step(x, y, direction, 1, width, height))
}

/// True when `(x, y)` lies on the image border
#[inline]
pub fn on_border(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}
