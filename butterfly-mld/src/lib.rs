//! Multi-level partition and cell storage for MLD routing
//!
//! A [`MultiLevelPartition`] groups graph nodes into nested cells. For every
//! stored level, [`CellStorage`] records each cell's entry and exit boundary
//! nodes and a matrix of intra-cell distances between them, which
//! customization fills and queries read.

pub mod cells;
pub mod cli;
pub mod formats;
pub mod graph;
pub mod partition;
pub mod pipeline;
pub mod types;
pub mod validate;

pub use butterfly_common::{Error, Result};
pub use cells::{Cell, CellMut, CellStorage, SharedCellStorage};
pub use graph::{BaseGraph, StaticGraph};
pub use partition::{FlatPartition, MultiLevelPartition, PackedPartition};
pub use types::{CellId, LevelId, NodeId, Weight, INVALID_WEIGHT};
