//! Integration tests for cell storage construction on hand-built hierarchies

use butterfly_mld::cells::CellStorage;
use butterfly_mld::partition::{check_nesting, FlatPartition, PackedPartition};
use butterfly_mld::types::{CellId, LevelId, NodeId, INVALID_WEIGHT};
use butterfly_mld::validate::verify_cells;
use butterfly_mld::{MultiLevelPartition, StaticGraph};

/// Entry and exit nodes of every cell at `level`, computed straight from the
/// arc list: arc u→v can be left forward at u and entered backward at v.
fn enumerate_boundary(
    partition: &impl MultiLevelPartition,
    arcs: &[(NodeId, NodeId)],
    level: LevelId,
) -> Vec<(Vec<NodeId>, Vec<NodeId>)> {
    let n_nodes = partition.num_nodes();
    let mut crosses = vec![false; n_nodes];
    let mut entry = vec![false; n_nodes];
    let mut exit = vec![false; n_nodes];

    for &(u, v) in arcs {
        let same = partition.cell(level, u) == partition.cell(level, v);
        if same {
            entry[u as usize] = true;
            exit[v as usize] = true;
        } else {
            crosses[u as usize] = true;
            crosses[v as usize] = true;
        }
    }

    let mut cells = vec![(Vec::new(), Vec::new()); partition.num_cells(level)];
    for node in 0..n_nodes {
        if !crosses[node] {
            continue;
        }
        let cell = partition.cell(level, node as NodeId) as usize;
        if entry[node] {
            cells[cell].0.push(node as NodeId);
        }
        if exit[node] {
            cells[cell].1.push(node as NodeId);
        }
    }
    cells
}

fn sixteen_node_partition() -> PackedPartition {
    PackedPartition::new(vec![
        vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
        vec![0; 16],
    ])
    .unwrap()
}

#[rustfmt::skip]
const SIXTEEN_NODE_ARCS: &[(NodeId, NodeId)] = &[
    // level 1 cell 0
    (0, 1), (0, 2), (3, 1), (3, 2),
    // level 1 cell 1
    (4, 5), (4, 6), (4, 7), (5, 4), (5, 6), (5, 7),
    (6, 4), (6, 5), (6, 7), (7, 4), (7, 5), (7, 6),
    // level 1 cell 2
    (9, 11), (10, 8), (11, 10),
    // level 1 cell 3
    (13, 12), (15, 14),
    // between cells
    (2, 4), (8, 3), (9, 3), (12, 5), (13, 7), (14, 9), (14, 11),
];

#[test]
fn test_sixteen_nodes_four_levels() {
    let mlp = sixteen_node_partition();
    assert_eq!(mlp.num_levels(), 4);
    check_nesting(&mlp).unwrap();

    let graph = StaticGraph::from_arcs(16, SIXTEEN_NODE_ARCS);
    let storage = CellStorage::build(&mlp, &graph).unwrap();

    let expected: &[(LevelId, CellId, &[NodeId], &[NodeId])] = &[
        (1, 0, &[3], &[2]),
        (1, 1, &[4, 5, 7], &[4, 5, 7]),
        (1, 2, &[9, 11], &[8, 11]),
        (1, 3, &[13], &[12, 14]),
        (2, 0, &[3, 5, 7], &[5, 7]),
        (2, 1, &[9, 13], &[8, 9, 12]),
        (3, 0, &[], &[]),
    ];

    for &(level, id, sources, destinations) in expected {
        let cell = storage.cell(level, id);
        assert_eq!(cell.source_nodes(), sources, "sources of cell ({level}, {id})");
        assert_eq!(
            cell.destination_nodes(),
            destinations,
            "destinations of cell ({level}, {id})"
        );
        for &s in sources {
            assert_eq!(cell.out_weight(s).len(), destinations.len());
        }
        for &d in destinations {
            assert_eq!(cell.in_weight(d).len(), sources.len());
        }
    }

    // Top cell covers the whole graph
    assert!(storage.cell(3, 0).is_empty());
    verify_cells(&storage, &mlp, &graph).unwrap();
}

#[test]
fn test_sixteen_node_weights_transpose() {
    let mlp = sixteen_node_partition();
    let graph = StaticGraph::from_arcs(16, SIXTEEN_NODE_ARCS);
    let mut storage = CellStorage::build(&mlp, &graph).unwrap();

    // Encode (source, destination) into every entry
    for level in 1..storage.num_levels() as LevelId {
        storage.for_each_cell_mut(level, |_, mut cell| {
            let sources = cell.source_nodes();
            let destinations = cell.destination_nodes();
            for &s in sources {
                for (k, &d) in destinations.iter().enumerate() {
                    cell.out_weight_mut(s)[k] = s * 100 + d;
                }
            }
        });
    }

    for level in 1..storage.num_levels() as LevelId {
        for (_, cell) in storage.cells(level) {
            for &d in cell.destination_nodes() {
                let column = cell.in_weight(d);
                for (k, &s) in cell.source_nodes().iter().enumerate() {
                    assert_eq!(column[k], s * 100 + d);
                }
            }
        }
    }
    assert_eq!(*storage.weights().last().unwrap(), INVALID_WEIGHT);
}

fn twelve_node_levels() -> Vec<Vec<CellId>> {
    vec![
        vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5],
        vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 3, 3],
        vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
        vec![0; 12],
    ]
}

/// One-way ring plus a few one-way chords
fn twelve_node_arcs() -> Vec<(NodeId, NodeId)> {
    let mut arcs: Vec<_> = (0..12).map(|i| (i, (i + 1) % 12)).collect();
    arcs.extend([(0, 4), (8, 3), (5, 10), (11, 6)]);
    arcs
}

#[test]
fn test_twelve_nodes_match_enumeration() {
    let arcs = twelve_node_arcs();
    let graph = StaticGraph::from_arcs(12, &arcs);

    let flat = FlatPartition::new(twelve_node_levels()).unwrap();
    let packed = PackedPartition::new(twelve_node_levels()).unwrap();
    assert_eq!(packed.num_levels(), 5);
    assert_eq!(packed.num_cells(1), 6);
    assert_eq!(packed.num_cells(2), 4);
    assert_eq!(packed.num_cells(3), 2);
    assert_eq!(packed.num_cells(4), 1);

    let from_flat = CellStorage::build(&flat, &graph).unwrap();
    let from_packed = CellStorage::build(&packed, &graph).unwrap();
    assert_eq!(from_flat.to_parts(), from_packed.to_parts());

    for level in 1..packed.num_levels() as LevelId {
        let expected = enumerate_boundary(&packed, &arcs, level);
        for (id, cell) in from_packed.cells(level) {
            let (sources, destinations) = &expected[id as usize];
            assert_eq!(cell.source_nodes(), sources.as_slice(), "level {level} cell {id}");
            assert_eq!(
                cell.destination_nodes(),
                destinations.as_slice(),
                "level {level} cell {id}"
            );
        }
    }

    // Ring order makes the first node of each pair an entry, the second an exit
    let cell = from_packed.cell(1, 4);
    assert_eq!(cell.source_nodes(), &[8]);
    assert_eq!(cell.destination_nodes(), &[9]);
    assert!(from_packed.cell(4, 0).is_empty());
}

#[test]
fn test_highest_different_level_twelve_nodes() {
    let flat = FlatPartition::new(twelve_node_levels()).unwrap();
    let packed = PackedPartition::new(twelve_node_levels()).unwrap();

    for (a, b, level) in [(0, 1, 0), (0, 2, 1), (0, 4, 3), (4, 8, 2), (8, 11, 2), (9, 8, 0)] {
        assert_eq!(packed.highest_different_level(a, b), level, "{a} vs {b}");
        assert_eq!(flat.highest_different_level(a, b), level, "{a} vs {b}");
    }
}
