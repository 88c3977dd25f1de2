// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for room segmentation and room adjacency

use std::collections::BTreeMap;
use std::fmt;

use image::{GrayImage, ImageBuffer, Luma};
use nalgebra::Point2;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Label image: one category code per pixel
pub type LabelImage = GrayImage;

/// Room id per pixel, 0 = not part of any room
pub type RegionMap = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Binary wall mask (255 = wall)
pub type WallMask = GrayImage;

/// Opening mask (0 = none, 1 = door, 2 = window)
pub type IconMask = GrayImage;

/// Dense room id, starting at 1
pub type RoomId = u32;

/// A 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Axis-aligned pixel bounds, inclusive on both ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelBounds {
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Room classification by dominant surface category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomType {
    Kitchen,
    #[serde(rename = "Living Room")]
    LivingRoom,
    Bedroom,
    Bath,
    Hallway,
    Storage,
    Garage,
    Other,
}

impl RoomType {
    pub fn name(&self) -> &'static str {
        match self {
            RoomType::Kitchen => "Kitchen",
            RoomType::LivingRoom => "Living Room",
            RoomType::Bedroom => "Bedroom",
            RoomType::Bath => "Bath",
            RoomType::Hallway => "Hallway",
            RoomType::Storage => "Storage",
            RoomType::Garage => "Garage",
            RoomType::Other => "Other",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A segmented room (one 4-connected region of room-eligible pixels)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// Pixel count
    pub area: u32,
    pub room_type: RoomType,
    pub bounds: PixelBounds,
    /// Mean pixel position
    pub centroid: Point2D,
}

/// Kind of a single room-to-room connection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Door,
    Window,
    Wall,
}

impl ConnectionKind {
    pub const ALL: [ConnectionKind; 3] =
        [ConnectionKind::Door, ConnectionKind::Window, ConnectionKind::Wall];

    fn bit(self) -> u8 {
        match self {
            ConnectionKind::Door => 0b001,
            ConnectionKind::Window => 0b010,
            ConnectionKind::Wall => 0b100,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionKind::Door => "door",
            ConnectionKind::Window => "window",
            ConnectionKind::Wall => "wall",
        }
    }
}

/// Set of connection kinds, stored as a bitset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ConnectionKind>", into = "Vec<ConnectionKind>")]
pub struct ConnectionTypes(u8);

impl ConnectionTypes {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, kind: ConnectionKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: ConnectionKind) {
        self.0 &= !kind.bit();
    }

    pub fn contains(&self, kind: ConnectionKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Kinds in fixed order: door, window, wall
    pub fn iter(&self) -> impl Iterator<Item = ConnectionKind> + '_ {
        ConnectionKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl From<Vec<ConnectionKind>> for ConnectionTypes {
    fn from(kinds: Vec<ConnectionKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<ConnectionTypes> for Vec<ConnectionKind> {
    fn from(types: ConnectionTypes) -> Self {
        types.iter().collect()
    }
}

impl FromIterator<ConnectionKind> for ConnectionTypes {
    fn from_iter<I: IntoIterator<Item = ConnectionKind>>(iter: I) -> Self {
        let mut types = ConnectionTypes::empty();
        for kind in iter {
            types.insert(kind);
        }
        types
    }
}

/// Unordered pair of distinct room ids, stored smaller id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomPair {
    low: RoomId,
    high: RoomId,
}

impl RoomPair {
    /// Canonical pair, or `None` when both ids are the same room
    pub fn new(a: RoomId, b: RoomId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> RoomId {
        self.low
    }

    pub fn high(&self) -> RoomId {
        self.high
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.low == id || self.high == id
    }
}

impl fmt::Display for RoomPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Aggregated connection record between two rooms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub connection_types: ConnectionTypes,
    pub num_door_window: u32,
    /// Pixel count of all door/window openings
    pub area_door_window: u32,
    pub num_wall: u32,
    /// Pixel count of all wall segments
    pub area_wall: u32,
}

impl Edge {
    pub fn has_door_window(&self) -> bool {
        self.connection_types.contains(ConnectionKind::Door)
            || self.connection_types.contains(ConnectionKind::Window)
    }

    pub fn has_wall(&self) -> bool {
        self.connection_types.contains(ConnectionKind::Wall)
    }
}

/// Room adjacency map keyed by canonical room pairs
///
/// Iteration is in ascending pair order, so output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    edges: BTreeMap<RoomPair, Edge>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the edge between two rooms in either order
    pub fn get(&self, a: RoomId, b: RoomId) -> Option<&Edge> {
        RoomPair::new(a, b).and_then(|pair| self.edges.get(&pair))
    }

    pub fn contains(&self, a: RoomId, b: RoomId) -> bool {
        self.get(a, b).is_some()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoomPair, &Edge)> {
        self.edges.iter()
    }

    /// All rooms connected to `id`, ascending
    pub fn neighbors(&self, id: RoomId) -> Vec<RoomId> {
        self.edges
            .keys()
            .filter(|pair| pair.contains(id))
            .map(|pair| if pair.low() == id { pair.high() } else { pair.low() })
            .collect()
    }

    pub(crate) fn record_opening(&mut self, pair: RoomPair, kind: ConnectionKind, area: u32) {
        let edge = self.edges.entry(pair).or_default();
        edge.connection_types.insert(kind);
        edge.num_door_window += 1;
        edge.area_door_window += area;
    }

    pub(crate) fn record_wall(&mut self, pair: RoomPair, area: u32) {
        let edge = self.edges.entry(pair).or_default();
        edge.connection_types.insert(ConnectionKind::Wall);
        edge.num_wall += 1;
        edge.area_wall += area;
    }

    /// Undo one `record_wall`; drops the edge once nothing connects the pair
    pub(crate) fn rollback_wall(&mut self, pair: RoomPair, area: u32) {
        let Some(edge) = self.edges.get_mut(&pair) else {
            return;
        };
        edge.num_wall = edge.num_wall.saturating_sub(1);
        edge.area_wall = edge.area_wall.saturating_sub(area);
        if edge.num_wall == 0 {
            edge.area_wall = 0;
            edge.connection_types.remove(ConnectionKind::Wall);
        }
        if edge.connection_types.is_empty() {
            self.edges.remove(&pair);
        }
    }
}

impl Serialize for Adjacency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.edges.iter().map(|(pair, edge)| EdgeEntry { pair, edge }))
    }
}

struct EdgeEntry<'a> {
    pair: &'a RoomPair,
    edge: &'a Edge,
}

impl Serialize for EdgeEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Edge", 7)?;
        state.serialize_field("room_a", &self.pair.low())?;
        state.serialize_field("room_b", &self.pair.high())?;
        state.serialize_field("connection_types", &self.edge.connection_types)?;
        state.serialize_field("num_door_window", &self.edge.num_door_window)?;
        state.serialize_field("area_door_window", &self.edge.area_door_window)?;
        state.serialize_field("num_wall", &self.edge.num_wall)?;
        state.serialize_field("area_wall", &self.edge.area_wall)?;
        state.end()
    }
}
