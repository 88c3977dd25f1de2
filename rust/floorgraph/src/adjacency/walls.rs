// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall connections via directed penetration scans
//!
//! For every boundary pixel of every room (rooms ascending, pixels in
//! row-major order) and each axis direction, a scan starts when the
//! neighbour in that direction is an unvisited wall pixel:
//!
//! ```text
//! idle -> penetrating -> aborted   (ran off the image)
//!                     -> resolved  (came out in another room) -> extending -> finalized
//! ```
//!
//! A crossing only counts when none of its wall pixels has a room beside
//! it across the scan direction; otherwise the scan is running lengthwise
//! along a wall that separates two other rooms.
//!
//! A resolved crossing is extended sideways: the whole crossed wall
//! cross-section slides along the wall run while the pixel before it
//! still belongs to the originating room and the pixel after it to the
//! encountered room. For a one-pixel wall this is exactly "origin on one
//! side, encountered room on the other".

use tracing::trace;

use crate::grid::{neighbors4, on_border, step, Direction};
use crate::scheme::CategorySet;
use crate::types::{LabelImage, RegionMap, RoomId, RoomPair, WallMask};

/// A straight wall run separating two specific rooms
#[derive(Debug, Clone)]
pub(super) struct WallSegment {
    pub pair: RoomPair,
    /// Distinct wall pixels in scan order
    pub pixels: Vec<(u32, u32)>,
    /// Wall pixels between the two rooms in each cross-section
    pub depth: u32,
}

impl WallSegment {
    pub fn area(&self) -> u32 {
        self.pixels.len() as u32
    }
}

/// Outcome of crossing a wall in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Penetration {
    /// Reached the image border while still inside the wall
    Aborted,
    /// Came out in a pixel that is not another room, or ran along a wall
    Unresolved,
    /// Came out in `other` after crossing `depth` wall pixels
    Resolved { other: RoomId, depth: u32 },
}

/// Wall pass state; the visited grid lives only as long as one scan
pub(super) struct WallScanner<'a> {
    region_map: &'a RegionMap,
    wall_mask: &'a WallMask,
    labels: &'a LabelImage,
    exterior: &'a CategorySet,
    width: u32,
    height: u32,
    visited: Vec<bool>,
}

impl<'a> WallScanner<'a> {
    pub fn new(
        region_map: &'a RegionMap,
        wall_mask: &'a WallMask,
        labels: &'a LabelImage,
        exterior: &'a CategorySet,
    ) -> Self {
        let (width, height) = region_map.dimensions();
        Self {
            region_map,
            wall_mask,
            labels,
            exterior,
            width,
            height,
            visited: vec![false; width as usize * height as usize],
        }
    }

    /// Find all interior wall segments, in discovery order
    pub fn scan(mut self) -> Vec<WallSegment> {
        let boundaries = self.boundary_pixels();
        let mut segments = Vec::new();

        for (index, pixels) in boundaries.iter().enumerate() {
            let origin = index as RoomId + 1;
            for &(x, y) in pixels {
                for direction in Direction::ALL {
                    let Some((sx, sy)) = step(x, y, direction, 1, self.width, self.height) else {
                        continue;
                    };
                    if !self.is_wall(sx, sy) || self.visited[self.index(sx, sy)] {
                        continue;
                    }

                    let (other, depth) = match self.penetrate(x, y, direction, origin) {
                        Penetration::Resolved { other, depth } => (other, depth),
                        Penetration::Aborted => {
                            trace!(x, y, ?direction, "Wall scan reached the image border");
                            continue;
                        }
                        Penetration::Unresolved => continue,
                    };
                    let Some(pair) = RoomPair::new(origin, other) else {
                        continue;
                    };

                    let segment = self.extend(x, y, direction, depth, origin, other, pair);
                    for &(px, py) in &segment.pixels {
                        let i = self.index(px, py);
                        self.visited[i] = true;
                    }

                    if self.touches_exterior(&segment.pixels) {
                        trace!(%pair, area = segment.area(), "Dropping exterior wall segment");
                        continue;
                    }
                    segments.push(segment);
                }
            }
        }

        segments
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn is_wall(&self, x: u32, y: u32) -> bool {
        self.wall_mask.get_pixel(x, y).0[0] != 0
    }

    #[inline]
    fn room_at(&self, x: u32, y: u32) -> RoomId {
        self.region_map.get_pixel(x, y).0[0]
    }

    /// Boundary pixels of every room, indexed by id - 1, row-major within a room
    ///
    /// A room pixel is on the boundary when any 4-neighbour lies in
    /// another region or outside the image.
    fn boundary_pixels(&self) -> Vec<Vec<(u32, u32)>> {
        let mut boundaries: Vec<Vec<(u32, u32)>> = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.room_at(x, y);
                if id == 0 {
                    continue;
                }
                let is_boundary = on_border(x, y, self.width, self.height)
                    || neighbors4(x, y, self.width, self.height)
                        .any(|(nx, ny)| self.room_at(nx, ny) != id);
                if !is_boundary {
                    continue;
                }
                let index = id as usize - 1;
                if boundaries.len() <= index {
                    boundaries.resize_with(index + 1, Vec::new);
                }
                boundaries[index].push((x, y));
            }
        }
        boundaries
    }

    /// Step from `(x, y)` into the wall until leaving the wall mask
    fn penetrate(&self, x: u32, y: u32, direction: Direction, origin: RoomId) -> Penetration {
        let mut depth = 0;
        loop {
            let Some((cx, cy)) = step(x, y, direction, depth + 1, self.width, self.height) else {
                return Penetration::Aborted;
            };
            if self.is_wall(cx, cy) {
                if self.beside_room(cx, cy, direction) {
                    return Penetration::Unresolved;
                }
                depth += 1;
                continue;
            }
            let id = self.room_at(cx, cy);
            return if id != 0 && id != origin && depth > 0 {
                Penetration::Resolved { other: id, depth }
            } else {
                Penetration::Unresolved
            };
        }
    }

    /// Grow the crossing at `(x, y)` along the wall run in both transverse directions
    #[allow(clippy::too_many_arguments)]
    fn extend(
        &self,
        x: u32,
        y: u32,
        direction: Direction,
        depth: u32,
        origin: RoomId,
        other: RoomId,
        pair: RoomPair,
    ) -> WallSegment {
        let mut pixels: Vec<(u32, u32)> = (1..=depth)
            .filter_map(|i| step(x, y, direction, i, self.width, self.height))
            .collect();

        for transverse in direction.transverse() {
            let mut offset = 1;
            while let Some((bx, by)) = step(x, y, transverse, offset, self.width, self.height) {
                match self.cross_section(bx, by, direction, depth, origin, other) {
                    Some(section) => {
                        pixels.extend(section);
                        offset += 1;
                    }
                    None => break,
                }
            }
        }

        WallSegment {
            pair,
            pixels,
            depth,
        }
    }

    /// Wall cross-section next to origin pixel `(bx, by)`, if it still separates the two rooms
    fn cross_section(
        &self,
        bx: u32,
        by: u32,
        direction: Direction,
        depth: u32,
        origin: RoomId,
        other: RoomId,
    ) -> Option<Vec<(u32, u32)>> {
        if self.room_at(bx, by) != origin {
            return None;
        }

        let mut section = Vec::with_capacity(depth as usize);
        for i in 1..=depth {
            let (cx, cy) = step(bx, by, direction, i, self.width, self.height)?;
            if !self.is_wall(cx, cy)
                || self.visited[self.index(cx, cy)]
                || self.beside_room(cx, cy, direction)
            {
                return None;
            }
            section.push((cx, cy));
        }

        let (fx, fy) = step(bx, by, direction, depth + 1, self.width, self.height)?;
        if self.room_at(fx, fy) != other {
            return None;
        }
        Some(section)
    }

    /// True when a room pixel sits next to wall pixel `(x, y)` across `direction`
    fn beside_room(&self, x: u32, y: u32, direction: Direction) -> bool {
        direction.transverse().into_iter().any(|side| {
            step(x, y, side, 1, self.width, self.height)
                .is_some_and(|(sx, sy)| self.room_at(sx, sy) != 0)
        })
    }

    /// True when any 4-neighbour of the segment carries an exterior label
    fn touches_exterior(&self, pixels: &[(u32, u32)]) -> bool {
        pixels.iter().any(|&(x, y)| {
            neighbors4(x, y, self.width, self.height)
                .any(|(nx, ny)| self.exterior.contains(self.labels.get_pixel(nx, ny).0[0]))
        })
    }
}
