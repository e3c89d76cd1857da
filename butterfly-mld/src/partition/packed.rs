//! Bit-packed multi-level partition
//!
//! Every node stores the cell ids of all its levels in one `u64`. Level 1
//! occupies the lowest bits, each following level sits directly above the
//! previous one and takes exactly as many bits as its cell count needs:
//!
//! ```text
//!  63                                                    0
//!  [ unused | level L | ... | level 2 | level 1 ]
//! ```
//!
//! Because coarser levels sit in higher bits, the most significant bit of
//! `packed[a] ^ packed[b]` directly names the coarsest level at which `a`
//! and `b` differ.

use butterfly_common::{Error, Result};

use super::{count_cells, validate_levels, MultiLevelPartition};
use crate::types::{CellId, LevelId, NodeId};

#[derive(Debug, Clone)]
pub struct PackedPartition {
    packed: Vec<u64>,
    /// Bit offset of each stored level, plus the total width as a trailing entry
    level_offsets: Vec<u32>,
    level_masks: Vec<u64>,
    /// Precomputed cell count of each stored level
    cell_counts: Vec<usize>,
    /// Stored level owning each bit position (0 for unused bits)
    bit_to_level: [LevelId; 64],
}

/// Bits needed to represent cell ids `0..n_cells`
fn bits_for(n_cells: usize) -> u32 {
    if n_cells <= 1 {
        0
    } else {
        u64::BITS - ((n_cells - 1) as u64).leading_zeros()
    }
}

impl PackedPartition {
    /// Pack per-level assignment arrays. `levels[0]` is level 1.
    pub fn new(levels: Vec<Vec<CellId>>) -> Result<Self> {
        let n_nodes = validate_levels(&levels)?;

        let cell_counts: Vec<usize> = levels.iter().map(|cells| count_cells(cells)).collect();

        let mut level_offsets = Vec::with_capacity(levels.len() + 1);
        let mut total_bits = 0u32;
        for &count in &cell_counts {
            level_offsets.push(total_bits);
            total_bits += bits_for(count);
        }
        level_offsets.push(total_bits);
        if total_bits > u64::BITS {
            return Err(Error::PartitionTooWide { bits: total_bits });
        }

        let level_masks: Vec<u64> = level_offsets
            .windows(2)
            .map(|w| match w[1] - w[0] {
                0 => 0,
                64 => u64::MAX,
                width => (1u64 << width) - 1,
            })
            .collect();

        let mut bit_to_level = [0 as LevelId; 64];
        for (idx, w) in level_offsets.windows(2).enumerate() {
            for bit in w[0]..w[1] {
                bit_to_level[bit as usize] = (idx + 1) as LevelId;
            }
        }

        let mut packed = vec![0u64; n_nodes];
        for (idx, cells) in levels.iter().enumerate() {
            if level_masks[idx] == 0 {
                continue;
            }
            let shift = level_offsets[idx];
            for (word, &cell) in packed.iter_mut().zip(cells) {
                *word |= (cell as u64) << shift;
            }
        }

        Ok(Self {
            packed,
            level_offsets,
            level_masks,
            cell_counts,
            bit_to_level,
        })
    }

    /// Pack any other partition, e.g. a [`super::FlatPartition`] read from disk
    pub fn from_partition<P: MultiLevelPartition + ?Sized>(partition: &P) -> Result<Self> {
        let n_nodes = partition.num_nodes() as NodeId;
        let levels = (1..partition.num_levels())
            .map(|level| {
                (0..n_nodes)
                    .map(|node| partition.cell(level as LevelId, node))
                    .collect()
            })
            .collect();
        Self::new(levels)
    }

    /// Total bits used per node
    pub fn bits_per_node(&self) -> u32 {
        self.level_offsets.last().copied().unwrap_or(0)
    }

    /// Unpack one stored level back into an assignment array
    pub fn level_cells(&self, level: LevelId) -> Vec<CellId> {
        (0..self.packed.len() as NodeId)
            .map(|node| self.cell(level, node))
            .collect()
    }
}

impl MultiLevelPartition for PackedPartition {
    #[inline]
    fn cell(&self, level: LevelId, node: NodeId) -> CellId {
        if level == 0 {
            return node;
        }
        let idx = level as usize - 1;
        // A zero-width level has mask 0, so the wrapped shift never leaks bits
        let shift = self.level_offsets[idx];
        ((self.packed[node as usize].wrapping_shr(shift)) & self.level_masks[idx]) as CellId
    }

    #[inline]
    fn highest_different_level(&self, first: NodeId, second: NodeId) -> LevelId {
        let diff = self.packed[first as usize] ^ self.packed[second as usize];
        if diff == 0 {
            return 0;
        }
        let msb = u64::BITS - 1 - diff.leading_zeros();
        self.bit_to_level[msb as usize]
    }

    fn num_levels(&self) -> usize {
        self.cell_counts.len() + 1
    }

    fn num_cells(&self, level: LevelId) -> usize {
        if level == 0 {
            return self.packed.len();
        }
        self.cell_counts[level as usize - 1]
    }

    fn num_nodes(&self) -> usize {
        self.packed.len()
    }
}
