// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabular and JSON export of a floor plan topology
//!
//! Each edge is flattened into at most two rows: one for its door/window
//! openings and one for its wall segments.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Adjacency, Room, RoomId};
use crate::FloorPlanTopology;

/// Connection class of an exported row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionClass {
    #[serde(rename = "door/window")]
    DoorWindow,
    #[serde(rename = "wall")]
    Wall,
}

/// One exported connection between two rooms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionRow {
    pub room_a: RoomId,
    pub type_a: String,
    pub room_b: RoomId,
    pub type_b: String,
    pub connection: ConnectionClass,
    pub count: u32,
    pub area: u32,
}

/// Flatten an adjacency map into connection rows, in ascending pair order
///
/// Rooms missing from `rooms` are reported with type "Unknown".
pub fn connection_rows(rooms: &[Room], adjacency: &Adjacency) -> Vec<ConnectionRow> {
    let types: FxHashMap<RoomId, &'static str> = rooms
        .iter()
        .map(|room| (room.id, room.room_type.name()))
        .collect();
    let type_of = |id: RoomId| types.get(&id).copied().unwrap_or("Unknown").to_string();

    let mut rows = Vec::new();
    for (pair, edge) in adjacency.iter() {
        let mut push = |connection, count, area| {
            rows.push(ConnectionRow {
                room_a: pair.low(),
                type_a: type_of(pair.low()),
                room_b: pair.high(),
                type_b: type_of(pair.high()),
                connection,
                count,
                area,
            })
        };
        if edge.num_door_window > 0 {
            push(
                ConnectionClass::DoorWindow,
                edge.num_door_window,
                edge.area_door_window,
            );
        }
        if edge.num_wall > 0 {
            push(ConnectionClass::Wall, edge.num_wall, edge.area_wall);
        }
    }
    rows
}

/// Serializable summary of one analyzed floor plan
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport<'a> {
    pub width: u32,
    pub height: u32,
    pub rooms: &'a [Room],
    pub edges: &'a Adjacency,
    pub connections: Vec<ConnectionRow>,
}

impl<'a> TopologyReport<'a> {
    pub fn new(topology: &'a FloorPlanTopology) -> Self {
        Self {
            width: topology.width,
            height: topology.height,
            rooms: &topology.rooms,
            edges: &topology.adjacency,
            connections: connection_rows(&topology.rooms, &topology.adjacency),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the full report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the connection rows as CSV with a header line
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.connections {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
