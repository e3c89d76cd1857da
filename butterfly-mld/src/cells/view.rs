//! Borrowed views onto one cell of a [`super::CellStorage`]
//!
//! The weights of a cell form a row-major matrix: one row per source
//! (entry) node, one column per destination (exit) node. Rows are
//! contiguous slices; columns are strided and exposed through [`Column`]
//! and [`ColumnMut`].

use std::iter::{Copied, Skip, StepBy, Take};
use std::ops::{Index, IndexMut};
use std::slice;

use super::CellData;
use crate::types::{NodeId, Weight};

/// Ordered boundary node lists of one cell
#[derive(Debug, Clone, Copy)]
struct Boundary<'a> {
    sources: &'a [NodeId],
    destinations: &'a [NodeId],
}

impl<'a> Boundary<'a> {
    fn new(data: &CellData, all_sources: &'a [NodeId], all_destinations: &'a [NodeId]) -> Self {
        let src = data.source_boundary_offset as usize;
        let dst = data.destination_boundary_offset as usize;
        Self {
            sources: &all_sources[src..src + data.num_source_nodes as usize],
            destinations: &all_destinations[dst..dst + data.num_destination_nodes as usize],
        }
    }

    #[inline]
    fn row(&self, node: NodeId) -> usize {
        match self.sources.iter().position(|&n| n == node) {
            Some(row) => row,
            None => panic!("node {node} is not a source node of this cell"),
        }
    }

    #[inline]
    fn column(&self, node: NodeId) -> usize {
        match self.destinations.iter().position(|&n| n == node) {
            Some(col) => col,
            None => panic!("node {node} is not a destination node of this cell"),
        }
    }

    #[inline]
    fn row_len(&self) -> usize {
        self.destinations.len()
    }

    #[inline]
    fn matrix_len(&self) -> usize {
        self.sources.len() * self.destinations.len()
    }
}

fn matrix_range(data: &CellData, boundary: &Boundary<'_>) -> std::ops::Range<usize> {
    let start = data.weight_offset as usize;
    start..start + boundary.matrix_len()
}

/// Read-only view of one cell
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    boundary: Boundary<'a>,
    weights: &'a [Weight],
}

impl<'a> Cell<'a> {
    pub(super) fn new(
        data: &CellData,
        all_weights: &'a [Weight],
        all_sources: &'a [NodeId],
        all_destinations: &'a [NodeId],
    ) -> Self {
        let boundary = Boundary::new(data, all_sources, all_destinations);
        let weights = &all_weights[matrix_range(data, &boundary)];
        Self { boundary, weights }
    }

    /// Entry nodes, ascending by node id
    pub fn source_nodes(&self) -> &'a [NodeId] {
        self.boundary.sources
    }

    /// Exit nodes, ascending by node id
    pub fn destination_nodes(&self) -> &'a [NodeId] {
        self.boundary.destinations
    }

    pub fn source_position(&self, node: NodeId) -> Option<usize> {
        self.boundary.sources.iter().position(|&n| n == node)
    }

    pub fn destination_position(&self, node: NodeId) -> Option<usize> {
        self.boundary.destinations.iter().position(|&n| n == node)
    }

    /// Distances from source `node` to every destination node.
    ///
    /// # Panics
    /// If `node` is not a source node of this cell.
    pub fn out_weight(&self, node: NodeId) -> &'a [Weight] {
        let row_len = self.boundary.row_len();
        let start = self.boundary.row(node) * row_len;
        &self.weights[start..start + row_len]
    }

    /// Distances from every source node to destination `node`.
    ///
    /// # Panics
    /// If `node` is not a destination node of this cell.
    pub fn in_weight(&self, node: NodeId) -> Column<'a> {
        Column {
            weights: self.weights,
            start: self.boundary.column(node),
            stride: self.boundary.row_len(),
            len: self.boundary.sources.len(),
        }
    }

    /// Whole row-major matrix
    pub fn weights(&self) -> &'a [Weight] {
        self.weights
    }

    pub fn is_empty(&self) -> bool {
        self.boundary.sources.is_empty() && self.boundary.destinations.is_empty()
    }
}

/// Read-write view of one cell. Only weights are mutable.
#[derive(Debug)]
pub struct CellMut<'a> {
    boundary: Boundary<'a>,
    weights: &'a mut [Weight],
}

impl<'a> CellMut<'a> {
    pub(super) fn new(
        data: &CellData,
        all_weights: &'a mut [Weight],
        all_sources: &'a [NodeId],
        all_destinations: &'a [NodeId],
    ) -> Self {
        let boundary = Boundary::new(data, all_sources, all_destinations);
        let weights = &mut all_weights[matrix_range(data, &boundary)];
        Self { boundary, weights }
    }

    pub fn source_nodes(&self) -> &'a [NodeId] {
        self.boundary.sources
    }

    pub fn destination_nodes(&self) -> &'a [NodeId] {
        self.boundary.destinations
    }

    /// Reborrow as a read-only view
    pub fn as_cell(&self) -> Cell<'_> {
        Cell {
            boundary: self.boundary,
            weights: &*self.weights,
        }
    }

    pub fn out_weight(&self, node: NodeId) -> &[Weight] {
        let row_len = self.boundary.row_len();
        let start = self.boundary.row(node) * row_len;
        &self.weights[start..start + row_len]
    }

    /// # Panics
    /// If `node` is not a source node of this cell.
    pub fn out_weight_mut(&mut self, node: NodeId) -> &mut [Weight] {
        let row_len = self.boundary.row_len();
        let start = self.boundary.row(node) * row_len;
        &mut self.weights[start..start + row_len]
    }

    pub fn in_weight(&self, node: NodeId) -> Column<'_> {
        self.as_cell().in_weight(node)
    }

    /// # Panics
    /// If `node` is not a destination node of this cell.
    pub fn in_weight_mut(&mut self, node: NodeId) -> ColumnMut<'_> {
        let start = self.boundary.column(node);
        ColumnMut {
            stride: self.boundary.row_len(),
            len: self.boundary.sources.len(),
            weights: &mut *self.weights,
            start,
        }
    }

    /// Set every distance of the cell to `weight`
    pub fn fill(&mut self, weight: Weight) {
        self.weights.fill(weight);
    }

    pub fn weights_mut(&mut self) -> &mut [Weight] {
        &mut *self.weights
    }
}

pub type ColumnIter<'a> = Copied<Take<StepBy<Skip<slice::Iter<'a, Weight>>>>>;

/// Strided read-only column of a cell matrix
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    weights: &'a [Weight],
    start: usize,
    stride: usize,
    len: usize,
}

impl<'a> Column<'a> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, k: usize) -> Option<Weight> {
        (k < self.len).then(|| self.weights[self.start + k * self.stride])
    }

    pub fn iter(&self) -> ColumnIter<'a> {
        self.weights
            .iter()
            .skip(self.start)
            .step_by(self.stride.max(1))
            .take(self.len)
            .copied()
    }

    pub fn to_vec(&self) -> Vec<Weight> {
        self.iter().collect()
    }
}

impl Index<usize> for Column<'_> {
    type Output = Weight;

    fn index(&self, k: usize) -> &Weight {
        assert!(k < self.len, "column index {k} out of range for length {}", self.len);
        &self.weights[self.start + k * self.stride]
    }
}

impl<'a> IntoIterator for Column<'a> {
    type Item = Weight;
    type IntoIter = ColumnIter<'a>;

    fn into_iter(self) -> ColumnIter<'a> {
        self.iter()
    }
}

/// Strided mutable column of a cell matrix
#[derive(Debug)]
pub struct ColumnMut<'a> {
    weights: &'a mut [Weight],
    start: usize,
    stride: usize,
    len: usize,
}

impl ColumnMut<'_> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, k: usize) -> Option<Weight> {
        (k < self.len).then(|| self.weights[self.start + k * self.stride])
    }

    pub fn set(&mut self, k: usize, weight: Weight) {
        self[k] = weight;
    }

    pub fn as_column(&self) -> Column<'_> {
        Column {
            weights: &*self.weights,
            start: self.start,
            stride: self.stride,
            len: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Weight> + '_ {
        self.weights
            .iter_mut()
            .skip(self.start)
            .step_by(self.stride.max(1))
            .take(self.len)
    }

    pub fn to_vec(&self) -> Vec<Weight> {
        self.as_column().to_vec()
    }
}

impl Index<usize> for ColumnMut<'_> {
    type Output = Weight;

    fn index(&self, k: usize) -> &Weight {
        assert!(k < self.len, "column index {k} out of range for length {}", self.len);
        &self.weights[self.start + k * self.stride]
    }
}

impl IndexMut<usize> for ColumnMut<'_> {
    fn index_mut(&mut self, k: usize) -> &mut Weight {
        assert!(k < self.len, "column index {k} out of range for length {}", self.len);
        &mut self.weights[self.start + k * self.stride]
    }
}
