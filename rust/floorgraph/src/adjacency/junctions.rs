// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Junction tie-break for wall segments
//!
//! Near T and X junctions a crossing can run through wall pixels that an
//! earlier segment already attributed to another room pair. Segments that
//! share pixels form one physical wall blob; merely touching another
//! segment does not. A blob whose segments resolve to more than one room
//! pair keeps a single pair, and the contributions of all other segments
//! are rolled back out of the adjacency map.

use std::collections::BTreeMap;

use tracing::debug;

use super::walls::WallSegment;
use super::JunctionPolicy;
use crate::types::{Adjacency, RoomPair};

/// Disjoint sets over segment indices; the smallest index is always the root
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb] = ra;
        } else if rb < ra {
            self.parent[ra] = rb;
        }
    }
}

/// Apply the junction policy to provisionally recorded segments
///
/// Returns the number of segments rolled back.
pub(super) fn resolve_junctions(
    segments: &[WallSegment],
    width: u32,
    height: u32,
    policy: JunctionPolicy,
    adjacency: &mut Adjacency,
) -> usize {
    if policy == JunctionPolicy::PerSegment || segments.len() < 2 {
        return 0;
    }

    let blobs = group_into_blobs(segments, width, height);
    let mut rolled_back = 0;

    for members in blobs.values() {
        let Some(winner) = winning_pair(segments, members, policy) else {
            continue;
        };
        for &i in members {
            let segment = &segments[i];
            if segment.pair != winner {
                debug!(
                    superseded = %segment.pair,
                    kept = %winner,
                    area = segment.area(),
                    "Rolling back wall segment at junction"
                );
                adjacency.rollback_wall(segment.pair, segment.area());
                rolled_back += 1;
            }
        }
    }

    rolled_back
}

/// Segment indices per blob, keyed by the blob's first segment
fn group_into_blobs(segments: &[WallSegment], width: u32, height: u32) -> BTreeMap<usize, Vec<usize>> {
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let mut sets = DisjointSets::new(segments.len());
    // 0 = unclaimed, otherwise segment index + 1
    let mut owner = vec![0usize; width as usize * height as usize];

    for (i, segment) in segments.iter().enumerate() {
        for &(x, y) in &segment.pixels {
            let slot = &mut owner[index(x, y)];
            if *slot == 0 {
                *slot = i + 1;
            } else if *slot != i + 1 {
                sets.union(i, *slot - 1);
            }
        }
    }

    let mut blobs: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..segments.len() {
        blobs.entry(sets.find(i)).or_default().push(i);
    }
    blobs
}

/// The pair a blob keeps, or `None` when all its segments already agree
fn winning_pair(segments: &[WallSegment], members: &[usize], policy: JunctionPolicy) -> Option<RoomPair> {
    let first = segments[*members.first()?].pair;
    if members.iter().all(|&i| segments[i].pair == first) {
        return None;
    }

    match policy {
        JunctionPolicy::FirstFound => Some(first),
        JunctionPolicy::SmallestContact => members
            .iter()
            .map(|&i| (segments[i].depth, segments[i].pair))
            .min()
            .map(|(_, pair)| pair),
        JunctionPolicy::PerSegment => None,
    }
}
