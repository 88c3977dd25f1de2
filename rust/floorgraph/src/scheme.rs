// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label schemes: what each category code in a label image means
//!
//! The mapping from codes to wall/door/window/exterior/room surface varies
//! between datasets, so it is configuration rather than a constant. The
//! default matches the CubiCasa5k rasterized label layers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::RoomType;

/// Membership set over all 256 category codes
#[derive(Clone, PartialEq, Eq)]
pub struct CategorySet {
    members: [bool; 256],
}

impl CategorySet {
    pub fn empty() -> Self {
        Self {
            members: [false; 256],
        }
    }

    pub fn from_codes(codes: &[u8]) -> Self {
        let mut set = Self::empty();
        for &code in codes {
            set.insert(code);
        }
        set
    }

    pub fn insert(&mut self, code: u8) {
        self.members[code as usize] = true;
    }

    #[inline]
    pub fn contains(&self, code: u8) -> bool {
        self.members[code as usize]
    }

    pub fn codes(&self) -> Vec<u8> {
        (0..=255u8).filter(|&code| self.contains(code)).collect()
    }
}

impl std::fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.codes()).finish()
    }
}

/// A room surface category and the room type it stands for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomCategory {
    pub code: u8,
    pub room_type: RoomType,
}

impl RoomCategory {
    pub const fn new(code: u8, room_type: RoomType) -> Self {
        Self { code, room_type }
    }
}

/// Meaning of the category codes in a label image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelScheme {
    /// Wall code in the label image
    pub wall: u8,
    /// Door code in the opening (icon) layer
    pub door: u8,
    /// Window code in the opening (icon) layer
    pub window: u8,
    /// Background, outdoor, railing and other codes outside the building
    pub exterior: Vec<u8>,
    /// Recognized room surfaces; order breaks majority ties
    pub rooms: Vec<RoomCategory>,
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self {
            wall: 2,
            door: 1,
            window: 2,
            // background, outdoor, railing, blank canvas
            exterior: vec![0, 1, 8, 50],
            rooms: vec![
                RoomCategory::new(3, RoomType::Kitchen),
                RoomCategory::new(4, RoomType::LivingRoom),
                RoomCategory::new(5, RoomType::Bedroom),
                RoomCategory::new(6, RoomType::Bath),
                RoomCategory::new(7, RoomType::Hallway),
                RoomCategory::new(9, RoomType::Storage),
                RoomCategory::new(10, RoomType::Garage),
            ],
        }
    }
}

impl LabelScheme {
    /// Load a scheme from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Codes outside the building
    pub fn exterior_set(&self) -> CategorySet {
        CategorySet::from_codes(&self.exterior)
    }

    /// Codes that can never be part of a room
    pub fn excluded_set(&self) -> CategorySet {
        let mut set = self.exterior_set();
        set.insert(self.wall);
        set.insert(self.door);
        set.insert(self.window);
        set
    }

    /// Room type of a surface code, `None` for unrecognized codes
    pub fn room_type_of(&self, code: u8) -> Option<RoomType> {
        self.rooms
            .iter()
            .find(|category| category.code == code)
            .map(|category| category.room_type)
    }

    /// Position of a code in the room enumeration, used for tie-breaks
    pub(crate) fn rank_of(&self, code: u8) -> Option<usize> {
        self.rooms.iter().position(|category| category.code == code)
    }
}
