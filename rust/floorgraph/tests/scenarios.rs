// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end floor plans: segmentation plus adjacency on small hand-drawn grids

use floorgraph::{
    analyze_floor_plan, analyze_floor_plan_with, AdjacencyConfig, ConnectionKind,
    FloorPlanTopology, JunctionPolicy, LabelImage, LabelScheme, RoomCategory, RoomType,
    TopologyReport,
};
use image::Luma;

/// Label image from character rows
///
/// `#` wall, `.` background, `o` outdoor, `A`/`B`/`C`/`E`/`H`
/// kitchen/living room/bedroom/bath/hallway, `D` door code 11 and `N`
/// window code 12 (custom schemes only)
fn plan(rows: &[&str]) -> LabelImage {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    LabelImage::from_fn(width, height, |x, y| {
        let code = match rows[y as usize].as_bytes()[x as usize] {
            b'#' => 2,
            b'.' => 0,
            b'o' => 1,
            b'A' => 3,
            b'B' => 4,
            b'C' => 5,
            b'E' => 6,
            b'H' => 7,
            b'D' => 11,
            b'N' => 12,
            other => panic!("unknown cell '{}'", other as char),
        };
        Luma([code])
    })
}

/// Scheme with door/window codes that live in the label image itself
fn inline_opening_scheme() -> LabelScheme {
    LabelScheme {
        wall: 2,
        door: 11,
        window: 12,
        exterior: vec![0],
        rooms: vec![
            RoomCategory::new(3, RoomType::Kitchen),
            RoomCategory::new(4, RoomType::LivingRoom),
            RoomCategory::new(5, RoomType::Bedroom),
        ],
    }
}

fn two_rooms_rows() -> Vec<&'static str> {
    vec![
        "###################",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "###################",
    ]
}

/// Three rooms around a T junction at (4, 3)
fn t_junction_rows() -> Vec<&'static str> {
    vec![
        "#########",
        "#AAA#BBB#",
        "#AAA#BBB#",
        "#AAA#####",
        "#AAA#CCC#",
        "#AAA#CCC#",
        "#AAA#CCC#",
        "#AAA#CCC#",
        "#########",
    ]
}

/// Three rooms side by side over a hallway, walls meeting at (4, 3) and (8, 3)
fn hallway_rows() -> Vec<&'static str> {
    vec![
        "#############",
        "#AAA#BBB#CCC#",
        "#AAA#BBB#CCC#",
        "#############",
        "#HHHHHHHHHHH#",
        "#HHHHHHHHHHH#",
        "#############",
    ]
}

/// Bath on top, kitchen below it at the bottom, living room and bedroom in
/// between, split by a three pixel wall
fn thick_plus_rows() -> Vec<&'static str> {
    vec![
        "#########",
        "#EEEEEEE#",
        "#########",
        "#AA###BB#",
        "#AA###BB#",
        "#########",
        "#CCCCCCC#",
        "#########",
    ]
}

fn wall_areas(topology: &FloorPlanTopology) -> Vec<(u32, u32, u32)> {
    topology
        .adjacency
        .iter()
        .map(|(pair, edge)| (pair.low(), pair.high(), edge.area_wall))
        .collect()
}

fn assert_well_formed(labels: &LabelImage, scheme: &LabelScheme, topology: &FloorPlanTopology) {
    let excluded = scheme.excluded_set();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let id = topology.region_map.get_pixel(x, y).0[0];
        if excluded.contains(pixel.0[0]) {
            assert_eq!(id, 0, "excluded pixel ({}, {}) belongs to room {}", x, y, id);
        } else {
            assert_ne!(id, 0, "room pixel ({}, {}) has no room", x, y);
        }
    }

    let ids: Vec<u32> = topology.rooms.iter().map(|room| room.id).collect();
    let expected: Vec<u32> = (1..=topology.rooms.len() as u32).collect();
    assert_eq!(ids, expected, "room ids must be dense from 1");

    for room in &topology.rooms {
        let pixels = topology
            .region_map
            .pixels()
            .filter(|p| p.0[0] == room.id)
            .count() as u32;
        assert_eq!(pixels, room.area, "area of room {}", room.id);
    }

    for (pair, edge) in topology.adjacency.iter() {
        assert!(pair.low() < pair.high(), "no self edges");
        assert!(pair.high() as usize <= topology.rooms.len());
        assert!(!edge.connection_types.is_empty());
        assert_eq!(
            topology.adjacency.get(pair.low(), pair.high()),
            topology.adjacency.get(pair.high(), pair.low())
        );
        assert_eq!(edge.has_wall(), edge.num_wall > 0);
        assert_eq!(edge.has_door_window(), edge.num_door_window > 0);
    }
}

#[test]
fn single_room_has_no_edges() {
    let labels = plan(&[
        "##########",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "#AAAAAAAA#",
        "##########",
    ]);
    let topology = analyze_floor_plan(&labels, None, &LabelScheme::default()).unwrap();

    assert_eq!(topology.rooms.len(), 1);
    assert_eq!(topology.rooms[0].area, 64);
    assert_eq!(topology.rooms[0].room_type, RoomType::Kitchen);
    assert!(topology.adjacency.is_empty());
    assert_well_formed(&labels, &LabelScheme::default(), &topology);
}

#[test]
fn interior_wall_joins_two_rooms() {
    let labels = plan(&two_rooms_rows());
    let topology = analyze_floor_plan(&labels, None, &LabelScheme::default()).unwrap();

    assert_eq!(topology.rooms.len(), 2);
    assert_eq!(topology.adjacency.len(), 1);
    let edge = topology.adjacency.get(1, 2).unwrap();
    assert_eq!(
        edge.connection_types.iter().collect::<Vec<_>>(),
        vec![ConnectionKind::Wall]
    );
    assert_eq!(edge.num_wall, 1);
    assert_eq!(edge.area_wall, 8);
    assert_eq!(edge.num_door_window, 0);
    assert_well_formed(&labels, &LabelScheme::default(), &topology);
}

#[test]
fn door_splits_the_wall() {
    let mut rows = two_rooms_rows();
    rows[4] = "#AAAAAAAADBBBBBBBB#";
    rows[5] = "#AAAAAAAADBBBBBBBB#";
    let labels = plan(&rows);
    let topology = analyze_floor_plan(&labels, None, &inline_opening_scheme()).unwrap();

    let edge = topology.adjacency.get(1, 2).unwrap();
    assert!(edge.connection_types.contains(ConnectionKind::Door));
    assert!(edge.connection_types.contains(ConnectionKind::Wall));
    assert_eq!(edge.num_door_window, 1);
    assert_eq!(edge.area_door_window, 2);
    assert_eq!(edge.num_wall, 2);
    assert_eq!(edge.area_wall, 6);
    assert_well_formed(&labels, &inline_opening_scheme(), &topology);
}

#[test]
fn window_to_outside_is_not_an_edge() {
    let labels = plan(&[
        "............",
        ".##########.",
        ".#AAAAAAAA#.",
        ".#AAAAAAAA#.",
        ".#AAAAAAAA#.",
        ".#AAAAAAAA#.",
        ".##########.",
        "............",
    ]);
    let mut icons = LabelImage::new(12, 8);
    icons.put_pixel(1, 3, Luma([2]));
    icons.put_pixel(1, 4, Luma([2]));

    let topology = analyze_floor_plan(&labels, Some(&icons), &LabelScheme::default()).unwrap();

    assert_eq!(topology.rooms.len(), 1);
    assert!(topology.adjacency.is_empty());
    assert_well_formed(&labels, &LabelScheme::default(), &topology);
}

#[test]
fn window_between_rooms_in_icon_layer() {
    let labels = plan(&two_rooms_rows());
    let mut icons = LabelImage::new(19, 10);
    icons.put_pixel(9, 2, Luma([2]));

    let topology = analyze_floor_plan(&labels, Some(&icons), &LabelScheme::default()).unwrap();

    let edge = topology.adjacency.get(1, 2).unwrap();
    assert!(edge.connection_types.contains(ConnectionKind::Window));
    assert!(!edge.connection_types.contains(ConnectionKind::Door));
    assert_eq!((edge.num_door_window, edge.area_door_window), (1, 1));
    // The window sits on the wall label, which still counts in full
    assert_eq!(edge.area_wall, 8);
}

#[test]
fn wall_ending_on_background_is_exterior() {
    let labels = plan(&[
        "###################",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "...................",
    ]);
    let topology = analyze_floor_plan(&labels, None, &LabelScheme::default()).unwrap();

    assert_eq!(topology.rooms.len(), 2);
    assert!(topology.adjacency.is_empty());
    assert_well_formed(&labels, &LabelScheme::default(), &topology);
}

#[test]
fn outdoor_between_rooms_is_not_a_door() {
    // Default scheme: outdoor shares code 1 with the door layer
    let labels = plan(&[
        "###################",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "#AAAAAAAA#BBBBBBBB#",
        "ooooooooooooooooooo",
    ]);
    let scheme = LabelScheme::default();
    let topology = analyze_floor_plan(&labels, None, &scheme).unwrap();

    assert_eq!(topology.rooms.len(), 2);
    assert!(topology.adjacency.is_empty());
    assert_well_formed(&labels, &scheme, &topology);
}

#[test]
fn t_junction_keeps_every_wall() {
    // The three walls only touch at the junction pixel, none overlaps another
    let labels = plan(&t_junction_rows());
    let scheme = LabelScheme::default();
    let topology = analyze_floor_plan(&labels, None, &scheme).unwrap();

    assert_eq!(topology.rooms.len(), 3);
    assert_eq!(wall_areas(&topology), vec![(1, 2, 2), (1, 3, 4), (2, 3, 3)]);
    assert!(topology.adjacency.iter().all(|(_, edge)| edge.num_wall == 1));
    assert_well_formed(&labels, &scheme, &topology);
}

#[test]
fn rooms_over_hallway_keep_all_walls() {
    let labels = plan(&hallway_rows());
    let scheme = LabelScheme::default();
    let topology = analyze_floor_plan(&labels, None, &scheme).unwrap();

    assert_eq!(topology.rooms.len(), 4);
    assert_eq!(topology.rooms[3].room_type, RoomType::Hallway);
    assert_eq!(
        wall_areas(&topology),
        vec![(1, 2, 2), (1, 4, 3), (2, 3, 2), (2, 4, 3), (3, 4, 3)]
    );
    assert_eq!(topology.adjacency.neighbors(4), vec![1, 2, 3]);
    assert_well_formed(&labels, &scheme, &topology);
}

#[test]
fn crossing_through_thick_wall_keeps_thinnest() {
    // The bath-to-kitchen crossing runs down the middle of the wall that
    // separates the living room from the bedroom
    let labels = plan(&thick_plus_rows());
    let scheme = LabelScheme::default();
    let topology = analyze_floor_plan(&labels, None, &scheme).unwrap();

    assert_eq!(topology.rooms.len(), 4);
    assert_eq!(topology.rooms[0].room_type, RoomType::Bath);
    assert_eq!(
        wall_areas(&topology),
        vec![(1, 2, 2), (1, 3, 2), (2, 3, 6), (2, 4, 2), (3, 4, 2)]
    );
    assert_eq!(topology.adjacency.get(2, 3).unwrap().num_wall, 2);
    assert!(!topology.adjacency.contains(1, 4));
    assert_well_formed(&labels, &scheme, &topology);
}

#[test]
fn crossing_through_thick_wall_first_found() {
    let labels = plan(&thick_plus_rows());
    let scheme = LabelScheme::default();
    let config =
        AdjacencyConfig::from_scheme(&scheme).with_junction_policy(JunctionPolicy::FirstFound);
    let topology = analyze_floor_plan_with(&labels, None, &scheme, &config).unwrap();

    assert_eq!(
        wall_areas(&topology),
        vec![(1, 2, 2), (1, 3, 2), (1, 4, 4), (2, 4, 2), (3, 4, 2)]
    );
}

#[test]
fn t_junction_per_segment_keeps_all_pairs() {
    let labels = plan(&t_junction_rows());
    let scheme = LabelScheme::default();
    let config =
        AdjacencyConfig::from_scheme(&scheme).with_junction_policy(JunctionPolicy::PerSegment);
    let topology = analyze_floor_plan_with(&labels, None, &scheme, &config).unwrap();

    assert_eq!(wall_areas(&topology), vec![(1, 2, 2), (1, 3, 4), (2, 3, 3)]);
    assert_eq!(topology.adjacency.neighbors(3), vec![1, 2]);
}

#[test]
fn repeated_runs_are_identical() {
    let labels = plan(&t_junction_rows());
    let scheme = LabelScheme::default();
    let first = analyze_floor_plan(&labels, None, &scheme).unwrap();
    let second = analyze_floor_plan(&labels, None, &scheme).unwrap();

    assert_eq!(first.rooms, second.rooms);
    assert_eq!(first.adjacency, second.adjacency);
    assert_eq!(
        TopologyReport::new(&first).to_json().unwrap(),
        TopologyReport::new(&second).to_json().unwrap()
    );
}

#[test]
fn report_files_round_trip() {
    let labels = plan(&two_rooms_rows());
    let topology = analyze_floor_plan(&labels, None, &LabelScheme::default()).unwrap();
    let report = TopologyReport::new(&topology);

    let dir = std::env::temp_dir().join(format!("floorgraph-report-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let json_path = dir.join("plan.json");
    let csv_path = dir.join("plan.csv");
    report.write_json(&json_path).unwrap();
    report.write_csv(&csv_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["width"], 19);
    assert_eq!(json["rooms"].as_array().unwrap().len(), 2);
    assert_eq!(json["rooms"][1]["room_type"], "Living Room");
    assert_eq!(json["edges"][0]["room_a"], 1);
    assert_eq!(json["edges"][0]["connection_types"][0], "wall");
    assert_eq!(json["edges"][0]["area_wall"], 8);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec![
            "room_a,type_a,room_b,type_b,connection,count,area",
            "1,Kitchen,2,Living Room,wall,1,8",
        ]
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
