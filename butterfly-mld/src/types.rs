//! Scalar identifiers shared by the partition, graph and cell storage

/// Dense, zero-based index into the base graph's node array
pub type NodeId = u32;

/// Dense index into the base graph's edge array
pub type EdgeId = u32;

/// Hierarchy level. Level 0 is the raw graph and never has stored cells.
pub type LevelId = u8;

/// Cell identifier, unique only within its level
pub type CellId = u32;

/// Travel weight in deciseconds
pub type Weight = u32;

/// Distance not known yet (before customization) or not reachable inside the cell
pub const INVALID_WEIGHT: Weight = u32::MAX;

/// Highest number of levels a partition may have, level 0 included
pub const MAX_LEVELS: usize = 255;
