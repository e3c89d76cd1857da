//! Error types for the butterfly-osm multi-level routing crates
//!
//! Only structural defects are errors. Out-of-range lookups on the hot path
//! are precondition violations and panic instead; empty cells and unknown
//! distances are ordinary data.

use thiserror::Error;

/// Main error type for partition and cell storage operations
#[derive(Debug, Error)]
pub enum Error {
    /// A node crosses into another cell but can neither start nor end an
    /// intra-cell path. The upstream partition must reassign it.
    #[error("boundary node {node} of cell {cell} at level {level} has no entry or exit role")]
    BoundaryNodeWithoutRole { level: u8, cell: u32, node: u32 },

    /// Graph and partition were built for different node sets
    #[error("node count mismatch: graph has {graph} nodes, partition has {partition}")]
    NodeCountMismatch { graph: usize, partition: usize },

    /// Per-level assignment arrays must all cover the same nodes
    #[error("level {level} assigns {actual} nodes, expected {expected}")]
    LevelLengthMismatch {
        level: u8,
        expected: usize,
        actual: usize,
    },

    #[error("partition has {0} levels, at most 255 are supported")]
    TooManyLevels(usize),

    /// Packed partitions keep every level of a node in one 64-bit word
    #[error("partition needs {bits} bits per node, packed form holds 64")]
    PartitionTooWide { bits: u32 },

    /// Cells of a finer level must nest inside exactly one coarser cell
    #[error(
        "cell {cell} at level {level} is split between cells {first} and {second} at level {parent_level}"
    )]
    NestingViolation {
        level: u8,
        cell: u32,
        parent_level: u8,
        first: u32,
        second: u32,
    },

    /// Offsets and counts are stored as u32
    #[error("cell storage overflow: {what} reached {value}")]
    CellStorageOverflow { what: &'static str, value: u64 },

    /// Arrays handed to or loaded into a cell storage are inconsistent
    #[error("invalid cell storage layout: {0}")]
    InvalidLayout(String),
}

/// Convenience result type for butterfly-osm operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_error_names_location() {
        let err = Error::BoundaryNodeWithoutRole {
            level: 2,
            cell: 7,
            node: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("node 42"));
        assert!(msg.contains("cell 7"));
        assert!(msg.contains("level 2"));
    }

    #[test]
    fn test_nesting_violation_message() {
        let err = Error::NestingViolation {
            level: 1,
            cell: 3,
            parent_level: 2,
            first: 0,
            second: 1,
        };
        assert_eq!(
            err.to_string(),
            "cell 3 at level 1 is split between cells 0 and 1 at level 2"
        );
    }
}
