//! Per-level size summary of a cell storage

use serde::{Deserialize, Serialize};

use super::CellStorage;
use crate::types::LevelId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: LevelId,
    pub n_cells: u64,
    pub n_empty_cells: u64,
    pub n_source_nodes: u64,
    pub n_destination_nodes: u64,
    pub n_matrix_entries: u64,
    pub max_sources_per_cell: u64,
    pub max_destinations_per_cell: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    pub levels: Vec<LevelStats>,
    pub total_cells: u64,
    /// Including the trailing sentinel slot
    pub weight_slots: u64,
}

impl CellStats {
    pub(super) fn collect(storage: &CellStorage) -> Self {
        let levels: Vec<LevelStats> = (1..storage.num_levels())
            .map(|level| {
                let level = level as LevelId;
                let mut stats = LevelStats {
                    level,
                    ..Default::default()
                };
                for (_, cell) in storage.cells(level) {
                    let n_src = cell.source_nodes().len() as u64;
                    let n_dst = cell.destination_nodes().len() as u64;
                    stats.n_cells += 1;
                    if cell.is_empty() {
                        stats.n_empty_cells += 1;
                    }
                    stats.n_source_nodes += n_src;
                    stats.n_destination_nodes += n_dst;
                    stats.n_matrix_entries += n_src * n_dst;
                    stats.max_sources_per_cell = stats.max_sources_per_cell.max(n_src);
                    stats.max_destinations_per_cell = stats.max_destinations_per_cell.max(n_dst);
                }
                stats
            })
            .collect();

        Self {
            total_cells: storage.total_cells() as u64,
            weight_slots: storage.weights().len() as u64,
            levels,
        }
    }

    pub fn n_matrix_entries(&self) -> u64 {
        self.levels.iter().map(|l| l.n_matrix_entries).sum()
    }
}
