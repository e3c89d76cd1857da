//! Cell storage - per-cell boundary-to-boundary distance matrices
//!
//! For every stored level of a [`MultiLevelPartition`], each cell keeps its
//! entry (source) and exit (destination) boundary nodes and a row-major
//! `sources × destinations` matrix of intra-cell distances.
//!
//! # Layout
//!
//! Everything lives in flat arrays addressed through [`CellData`] records:
//!
//! ```text
//! level_to_cell_offset: [0, 0, n1, n1+n2, ...]   one entry per level + sentinel
//! cells:                [CellData; total cells]  level-major, cell-id-major
//! source_boundary:      [NodeId]                 per cell, ascending
//! destination_boundary: [NodeId]                 per cell, ascending
//! weights:              [Weight]                 per cell, row-major, + 1 sentinel
//! ```
//!
//! The boundary lists, cell records and level table never change after
//! construction and are shared behind an `Arc`; only the weights mutate.
//! See [`SharedCellStorage`] for publishing new weights to concurrent readers.

mod shared;
mod stats;
mod view;

pub use shared::SharedCellStorage;
pub use stats::{CellStats, LevelStats};
pub use view::{Cell, CellMut, Column, ColumnIter, ColumnMut};

use std::sync::Arc;

use butterfly_common::{Error, Result};
use rayon::prelude::*;

use crate::graph::BaseGraph;
use crate::partition::MultiLevelPartition;
use crate::types::{CellId, LevelId, NodeId, Weight, INVALID_WEIGHT};

pub type WeightOffset = u32;
pub type BoundaryOffset = u32;
pub type BoundarySize = u32;

/// Offsets and counts of one (level, cell) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellData {
    pub weight_offset: WeightOffset,
    pub source_boundary_offset: BoundaryOffset,
    pub destination_boundary_offset: BoundaryOffset,
    pub num_source_nodes: BoundarySize,
    pub num_destination_nodes: BoundarySize,
}

/// The five flat arrays a cell storage consists of, in persistence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStorageParts {
    pub weights: Vec<Weight>,
    pub source_boundary: Vec<NodeId>,
    pub destination_boundary: Vec<NodeId>,
    pub cells: Vec<CellData>,
    pub level_to_cell_offset: Vec<u32>,
}

#[derive(Debug, Clone)]
struct CellLayout {
    source_boundary: Vec<NodeId>,
    destination_boundary: Vec<NodeId>,
    cells: Vec<CellData>,
    level_to_cell_offset: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct CellStorage {
    layout: Arc<CellLayout>,
    weights: Vec<Weight>,
}

/// Boundary nodes of one level as sorted (cell, node) pairs
#[derive(Debug, Default)]
struct LevelBoundary {
    sources: Vec<(CellId, NodeId)>,
    destinations: Vec<(CellId, NodeId)>,
}

/// Classify the boundary nodes of every cell at `level`.
///
/// A node is a boundary node if any of its edges leaves its cell. It is a
/// source if it also has a forward edge staying in the cell, a destination
/// if it has a backward edge staying in the cell.
fn classify_level<P, G>(partition: &P, graph: &G, level: LevelId) -> Result<LevelBoundary>
where
    P: MultiLevelPartition + ?Sized,
    G: BaseGraph + ?Sized,
{
    let mut boundary = LevelBoundary::default();

    for node in 0..graph.num_nodes() as NodeId {
        let cell = partition.cell(level, node);
        let mut is_boundary_node = false;
        let mut is_source_node = false;
        let mut is_destination_node = false;

        for edge in graph.edge_range(node) {
            if partition.cell(level, graph.target(edge)) != cell {
                is_boundary_node = true;
            } else {
                is_source_node |= graph.is_forward(edge);
                is_destination_node |= graph.is_backward(edge);
            }
        }

        if !is_boundary_node {
            continue;
        }
        if !is_source_node && !is_destination_node {
            return Err(Error::BoundaryNodeWithoutRole { level, cell, node });
        }
        if is_source_node {
            boundary.sources.push((cell, node));
        }
        if is_destination_node {
            boundary.destinations.push((cell, node));
        }
    }

    boundary.sources.sort_unstable();
    boundary.destinations.sort_unstable();
    Ok(boundary)
}

/// Append the nodes of sorted `(cell, node)` pairs to `out`, returning the
/// (offset, count) of every cell `0..n_cells`. Empty cells get a zero-length
/// range at the current end of `out`.
fn lay_out_boundary(
    pairs: &[(CellId, NodeId)],
    n_cells: usize,
    out: &mut Vec<NodeId>,
) -> Result<Vec<(BoundaryOffset, BoundarySize)>> {
    let mut ranges = Vec::with_capacity(n_cells);
    let mut iter = pairs.iter().peekable();

    for cell in 0..n_cells as CellId {
        let offset = out.len();
        while let Some(&(_, node)) = iter.next_if(|(c, _)| *c == cell) {
            out.push(node);
        }
        let offset = narrow(offset as u64, "boundary offset")?;
        let count = narrow((out.len() as u64) - offset as u64, "boundary size")?;
        ranges.push((offset, count));
    }
    narrow(out.len() as u64, "boundary array length")?;
    Ok(ranges)
}

fn narrow(value: u64, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::CellStorageOverflow { what, value })
}

impl CellStorage {
    /// Build the cell storage for every stored level of `partition`.
    ///
    /// Levels are classified in parallel; weight offsets are assigned
    /// afterwards in level-major, cell-major order. All weights start as
    /// [`INVALID_WEIGHT`].
    pub fn build<P, G>(partition: &P, graph: &G) -> Result<Self>
    where
        P: MultiLevelPartition + Sync + ?Sized,
        G: BaseGraph + Sync + ?Sized,
    {
        if graph.num_nodes() != partition.num_nodes() {
            return Err(Error::NodeCountMismatch {
                graph: graph.num_nodes(),
                partition: partition.num_nodes(),
            });
        }

        let num_levels = partition.num_levels();
        let boundaries: Vec<LevelBoundary> = (1..num_levels)
            .into_par_iter()
            .map(|level| classify_level(partition, graph, level as LevelId))
            .collect::<Result<_>>()?;

        let mut level_to_cell_offset = Vec::with_capacity(num_levels + 1);
        level_to_cell_offset.push(0u32);
        // Level 0 is never materialized
        level_to_cell_offset.push(0u32);
        for level in 1..num_levels {
            let n_cells = partition.num_cells(level as LevelId) as u64;
            let last = *level_to_cell_offset.last().unwrap_or(&0) as u64;
            level_to_cell_offset.push(narrow(last + n_cells, "cell count")?);
        }

        let total_cells = level_to_cell_offset.last().copied().unwrap_or(0) as usize;
        let mut cells = Vec::with_capacity(total_cells);
        let mut source_boundary = Vec::new();
        let mut destination_boundary = Vec::new();

        for (idx, boundary) in boundaries.iter().enumerate() {
            let level = (idx + 1) as LevelId;
            let n_cells = partition.num_cells(level);
            let sources = lay_out_boundary(&boundary.sources, n_cells, &mut source_boundary)?;
            let destinations =
                lay_out_boundary(&boundary.destinations, n_cells, &mut destination_boundary)?;

            cells.extend(sources.into_iter().zip(destinations).map(
                |((src_offset, n_src), (dst_offset, n_dst))| CellData {
                    weight_offset: 0,
                    source_boundary_offset: src_offset,
                    destination_boundary_offset: dst_offset,
                    num_source_nodes: n_src,
                    num_destination_nodes: n_dst,
                },
            ));

            tracing::debug!(
                level,
                n_cells,
                n_sources = boundary.sources.len(),
                n_destinations = boundary.destinations.len(),
                "classified level"
            );
        }

        // Serial pass: offsets depend on every cell before
        let mut total_weights = 0u64;
        for cell in &mut cells {
            cell.weight_offset = narrow(total_weights, "weight offset")?;
            total_weights += cell.num_source_nodes as u64 * cell.num_destination_nodes as u64;
        }
        narrow(total_weights, "weight array length")?;
        let weights = vec![INVALID_WEIGHT; total_weights as usize + 1];

        tracing::info!(
            levels = num_levels.saturating_sub(1),
            cells = cells.len(),
            sources = source_boundary.len(),
            destinations = destination_boundary.len(),
            matrix_entries = total_weights,
            "built cell storage"
        );

        Ok(Self {
            layout: Arc::new(CellLayout {
                source_boundary,
                destination_boundary,
                cells,
                level_to_cell_offset,
            }),
            weights,
        })
    }

    /// Adopt previously persisted arrays verbatim.
    ///
    /// Nothing is validated; call [`CellStorageParts::check`] first when the
    /// arrays come from an untrusted source.
    pub fn from_parts(parts: CellStorageParts) -> Self {
        Self {
            layout: Arc::new(CellLayout {
                source_boundary: parts.source_boundary,
                destination_boundary: parts.destination_boundary,
                cells: parts.cells,
                level_to_cell_offset: parts.level_to_cell_offset,
            }),
            weights: parts.weights,
        }
    }

    /// Copy the arrays out for persistence
    pub fn to_parts(&self) -> CellStorageParts {
        CellStorageParts {
            weights: self.weights.clone(),
            source_boundary: self.layout.source_boundary.clone(),
            destination_boundary: self.layout.destination_boundary.clone(),
            cells: self.layout.cells.clone(),
            level_to_cell_offset: self.layout.level_to_cell_offset.clone(),
        }
    }

    pub fn into_parts(self) -> CellStorageParts {
        let layout = Arc::unwrap_or_clone(self.layout);
        CellStorageParts {
            weights: self.weights,
            source_boundary: layout.source_boundary,
            destination_boundary: layout.destination_boundary,
            cells: layout.cells,
            level_to_cell_offset: layout.level_to_cell_offset,
        }
    }

    /// Number of levels, level 0 included
    pub fn num_levels(&self) -> usize {
        self.layout.level_to_cell_offset.len().saturating_sub(1)
    }

    pub fn num_cells(&self, level: LevelId) -> usize {
        let offsets = &self.layout.level_to_cell_offset;
        (offsets[level as usize + 1] - offsets[level as usize]) as usize
    }

    pub fn total_cells(&self) -> usize {
        self.layout.cells.len()
    }

    #[inline]
    fn cell_data(&self, level: LevelId, id: CellId) -> &CellData {
        debug_assert!(
            level >= 1 && (level as usize) < self.num_levels(),
            "level {level} has no stored cells"
        );
        debug_assert!(
            (id as usize) < self.num_cells(level),
            "cell {id} out of range at level {level}"
        );
        let offset = self.layout.level_to_cell_offset[level as usize];
        &self.layout.cells[(offset + id) as usize]
    }

    /// Read-only view of cell `id` at `level`
    #[inline]
    pub fn cell(&self, level: LevelId, id: CellId) -> Cell<'_> {
        let data = self.cell_data(level, id);
        Cell::new(
            data,
            &self.weights,
            &self.layout.source_boundary,
            &self.layout.destination_boundary,
        )
    }

    /// Read-write view of cell `id` at `level`
    #[inline]
    pub fn cell_mut(&mut self, level: LevelId, id: CellId) -> CellMut<'_> {
        let data = *self.cell_data(level, id);
        CellMut::new(
            &data,
            &mut self.weights,
            &self.layout.source_boundary,
            &self.layout.destination_boundary,
        )
    }

    /// All cells of `level` in id order
    pub fn cells(&self, level: LevelId) -> impl Iterator<Item = (CellId, Cell<'_>)> + '_ {
        (0..self.num_cells(level) as CellId).map(move |id| (id, self.cell(level, id)))
    }

    /// Visit every cell of `level` mutably, in id order
    pub fn for_each_cell_mut<F>(&mut self, level: LevelId, mut f: F)
    where
        F: FnMut(CellId, CellMut<'_>),
    {
        for id in 0..self.num_cells(level) as CellId {
            f(id, self.cell_mut(level, id));
        }
    }

    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Forget all distances
    pub fn reset_weights(&mut self) {
        self.weights.fill(INVALID_WEIGHT);
    }

    /// New storage sharing this layout, all distances unknown
    pub fn with_cleared_weights(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
            weights: vec![INVALID_WEIGHT; self.weights.len()],
        }
    }

    /// Whether both storages share one immutable layout
    pub fn shares_layout_with(&self, other: &CellStorage) -> bool {
        Arc::ptr_eq(&self.layout, &other.layout)
    }

    pub fn stats(&self) -> CellStats {
        CellStats::collect(self)
    }
}

impl CellStorageParts {
    /// Verify the structural invariants of the arrays:
    /// - the level table starts at 0, never decreases, level 0 is empty and
    ///   the sentinel equals the number of cells
    /// - every cell's ranges lie inside their arrays
    /// - ranges are pairwise disjoint within each array
    pub fn check(&self) -> Result<()> {
        let offsets = &self.level_to_cell_offset;
        if offsets.first().copied() != Some(0) {
            return Err(Error::InvalidLayout(
                "level table must start at 0".to_string(),
            ));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidLayout(
                "level table is not monotone".to_string(),
            ));
        }
        if offsets.len() >= 2 && offsets[1] != 0 {
            return Err(Error::InvalidLayout("level 0 must not have cells".to_string()));
        }
        let sentinel = offsets.last().copied().unwrap_or(0) as usize;
        if sentinel != self.cells.len() {
            return Err(Error::InvalidLayout(format!(
                "level table sentinel {} != {} cells",
                sentinel,
                self.cells.len()
            )));
        }

        let mut source_ranges = Vec::with_capacity(self.cells.len());
        let mut destination_ranges = Vec::with_capacity(self.cells.len());
        let mut weight_ranges = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let src = range(cell.source_boundary_offset, cell.num_source_nodes as u64);
            let dst = range(
                cell.destination_boundary_offset,
                cell.num_destination_nodes as u64,
            );
            let matrix = cell.num_source_nodes as u64 * cell.num_destination_nodes as u64;
            let wgt = range(cell.weight_offset, matrix);
            source_ranges.push(src);
            destination_ranges.push(dst);
            weight_ranges.push(wgt);
        }

        check_ranges(&mut source_ranges, self.source_boundary.len(), "source boundary")?;
        check_ranges(
            &mut destination_ranges,
            self.destination_boundary.len(),
            "destination boundary",
        )?;
        check_ranges(&mut weight_ranges, self.weights.len(), "weights")?;
        Ok(())
    }
}

fn range(offset: u32, count: u64) -> (u64, u64) {
    (offset as u64, offset as u64 + count)
}

fn check_ranges(ranges: &mut [(u64, u64)], len: usize, what: &str) -> Result<()> {
    ranges.sort_unstable();
    let mut end = 0u64;
    for &(start, stop) in ranges.iter() {
        // Empty ranges still slice at their offset
        if stop > len as u64 {
            return Err(Error::InvalidLayout(format!(
                "{what} range {start}..{stop} exceeds array length {len}"
            )));
        }
        if start == stop {
            continue;
        }
        if start < end {
            return Err(Error::InvalidLayout(format!(
                "{what} range {start}..{stop} overlaps a previous cell"
            )));
        }
        end = stop;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StaticGraph;
    use crate::partition::{FlatPartition, PackedPartition};

    fn scenario_a() -> (PackedPartition, StaticGraph) {
        let mlp = PackedPartition::new(vec![vec![0, 0, 1, 1]]).unwrap();
        let graph = StaticGraph::from_arcs(4, &[(0, 1), (0, 2), (2, 3), (3, 1), (3, 2)]);
        (mlp, graph)
    }

    #[test]
    fn test_two_level_boundaries() {
        let (mlp, graph) = scenario_a();
        assert_eq!(mlp.num_levels(), 2);

        let storage = CellStorage::build(&mlp, &graph).unwrap();
        assert_eq!(storage.num_levels(), 2);
        assert_eq!(storage.num_cells(1), 2);

        let cell_1_0 = storage.cell(1, 0);
        let cell_1_1 = storage.cell(1, 1);

        assert_eq!(cell_1_0.source_nodes(), &[0]);
        assert_eq!(cell_1_0.destination_nodes(), &[1]);
        assert_eq!(cell_1_1.source_nodes(), &[2, 3]);
        assert_eq!(cell_1_1.destination_nodes(), &[2, 3]);

        assert_eq!(cell_1_0.out_weight(0).len(), 1);
        assert_eq!(cell_1_0.in_weight(1).len(), 1);
        assert_eq!(cell_1_1.out_weight(2).len(), 2);
        assert_eq!(cell_1_1.in_weight(3).len(), 2);

        assert!(cell_1_1.out_weight(3).iter().all(|&w| w == INVALID_WEIGHT));
    }

    #[test]
    fn test_layout_arrays() {
        let (mlp, graph) = scenario_a();
        let parts = CellStorage::build(&mlp, &graph).unwrap().into_parts();

        assert_eq!(parts.level_to_cell_offset, vec![0, 0, 2]);
        assert_eq!(parts.source_boundary, vec![0, 2, 3]);
        assert_eq!(parts.destination_boundary, vec![1, 2, 3]);
        assert_eq!(
            parts.cells,
            vec![
                CellData {
                    weight_offset: 0,
                    source_boundary_offset: 0,
                    destination_boundary_offset: 0,
                    num_source_nodes: 1,
                    num_destination_nodes: 1,
                },
                CellData {
                    weight_offset: 1,
                    source_boundary_offset: 1,
                    destination_boundary_offset: 1,
                    num_source_nodes: 2,
                    num_destination_nodes: 2,
                },
            ]
        );
        // 1x1 + 2x2 + sentinel
        assert_eq!(parts.weights.len(), 6);
        parts.check().unwrap();
    }

    #[test]
    fn test_row_column_round_trip() {
        let (mlp, graph) = scenario_a();
        let mut storage = CellStorage::build(&mlp, &graph).unwrap();

        {
            let mut cell = storage.cell_mut(1, 1);
            cell.out_weight_mut(2).copy_from_slice(&[0, 1]);
            cell.out_weight_mut(3).copy_from_slice(&[1, 0]);
        }
        storage.cell_mut(1, 0).out_weight_mut(0)[0] = 1;

        let cell = storage.cell(1, 1);
        assert_eq!(cell.in_weight(2).to_vec(), vec![0, 1]);
        assert_eq!(cell.in_weight(3).to_vec(), vec![1, 0]);
        assert_eq!(storage.cell(1, 0).in_weight(1).to_vec(), vec![1]);

        // Column writes show up in rows
        storage.cell_mut(1, 1).in_weight_mut(3).set(0, 7);
        assert_eq!(storage.cell(1, 1).out_weight(2), &[0, 7]);
    }

    #[test]
    fn test_boundary_node_without_role_aborts() {
        // Node 1 only has an edge into cell 1, so it is a boundary node that
        // can neither start nor end a path inside cell 0.
        let mlp = FlatPartition::new(vec![vec![0, 0, 1]]).unwrap();
        let graph = StaticGraph::from_arcs(3, &[(0, 2), (1, 2), (2, 0)]);

        match CellStorage::build(&mlp, &graph) {
            Err(Error::BoundaryNodeWithoutRole { level, cell, node }) => {
                assert_eq!((level, cell), (1, 0));
                assert!(node == 0 || node == 1);
            }
            other => panic!("expected a role error, got {other:?}"),
        }
    }

    #[test]
    fn test_node_count_mismatch() {
        let mlp = FlatPartition::new(vec![vec![0, 0, 1, 1]]).unwrap();
        let graph = StaticGraph::from_arcs(3, &[(0, 1)]);
        assert!(matches!(
            CellStorage::build(&mlp, &graph),
            Err(Error::NodeCountMismatch {
                graph: 3,
                partition: 4
            })
        ));
    }

    #[test]
    fn test_interior_only_graph_has_empty_cells() {
        let mlp = FlatPartition::new(vec![vec![0, 0, 0]]).unwrap();
        let graph = StaticGraph::from_arcs(3, &[(0, 1), (1, 2)]);
        let storage = CellStorage::build(&mlp, &graph).unwrap();

        let cell = storage.cell(1, 0);
        assert!(cell.is_empty());
        assert_eq!(storage.weights().len(), 1);
    }

    #[test]
    fn test_no_stored_levels() {
        let mlp = FlatPartition::new(Vec::new()).unwrap();
        let graph = StaticGraph::default();
        let storage = CellStorage::build(&mlp, &graph).unwrap();
        assert_eq!(storage.num_levels(), 1);
        assert_eq!(storage.total_cells(), 0);
        assert_eq!(storage.weights(), &[INVALID_WEIGHT]);
        storage.to_parts().check().unwrap();
    }

    #[test]
    fn test_from_parts_round_trip() {
        let (mlp, graph) = scenario_a();
        let mut storage = CellStorage::build(&mlp, &graph).unwrap();
        storage.cell_mut(1, 1).fill(3);

        let restored = CellStorage::from_parts(storage.to_parts());
        assert_eq!(restored.cell(1, 1).out_weight(2), &[3, 3]);
        assert_eq!(restored.cell(1, 0).source_nodes(), &[0]);
    }

    #[test]
    fn test_cleared_weights_share_layout() {
        let (mlp, graph) = scenario_a();
        let mut storage = CellStorage::build(&mlp, &graph).unwrap();
        storage.cell_mut(1, 0).fill(5);

        let cleared = storage.with_cleared_weights();
        assert!(cleared.shares_layout_with(&storage));
        assert_eq!(cleared.cell(1, 0).out_weight(0), &[INVALID_WEIGHT]);
        assert_eq!(storage.cell(1, 0).out_weight(0), &[5]);

        storage.reset_weights();
        assert!(storage.weights().iter().all(|&w| w == INVALID_WEIGHT));
    }

    #[test]
    fn test_for_each_cell_mut_visits_all() {
        let (mlp, graph) = scenario_a();
        let mut storage = CellStorage::build(&mlp, &graph).unwrap();
        let mut seen = Vec::new();
        storage.for_each_cell_mut(1, |id, mut cell| {
            seen.push(id);
            cell.fill(id);
        });
        assert_eq!(seen, vec![0, 1]);

        let ids: Vec<_> = storage.cells(1).map(|(id, cell)| (id, cell.weights()[0])).collect();
        assert_eq!(ids, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_check_rejects_overlap() {
        let (mlp, graph) = scenario_a();
        let mut parts = CellStorage::build(&mlp, &graph).unwrap().into_parts();
        parts.cells[1].source_boundary_offset = 0;
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_check_rejects_short_weights() {
        let (mlp, graph) = scenario_a();
        let mut parts = CellStorage::build(&mlp, &graph).unwrap().into_parts();
        parts.weights.truncate(3);
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_check_rejects_bad_sentinel() {
        let (mlp, graph) = scenario_a();
        let mut parts = CellStorage::build(&mlp, &graph).unwrap().into_parts();
        parts.level_to_cell_offset.push(5);
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_check_rejects_empty_cell_past_end() {
        let empty = CellStorageParts {
            weights: vec![INVALID_WEIGHT],
            source_boundary: Vec::new(),
            destination_boundary: Vec::new(),
            cells: vec![CellData::default()],
            level_to_cell_offset: vec![0, 0, 1],
        };
        empty.check().unwrap();

        let mut parts = empty.clone();
        parts.cells[0].weight_offset = 1_000_000;
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));

        let mut parts = empty.clone();
        parts.cells[0].source_boundary_offset = 1;
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));

        let mut parts = empty;
        parts.cells[0].destination_boundary_offset = 7;
        assert!(matches!(parts.check(), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_built_layout_with_empty_cells_passes_check() {
        let mlp = FlatPartition::new(vec![vec![0, 0, 2, 2]]).unwrap();
        let graph = StaticGraph::from_arcs(4, &[(0, 1), (1, 2), (2, 3)]);
        let storage = CellStorage::build(&mlp, &graph).unwrap();
        assert!(storage.cell(1, 1).is_empty());
        storage.to_parts().check().unwrap();
    }
}
