//! Cell storage validation - lock conditions and lock file generation
//!
//! A. Layout: arrays are consistent and match the partition's shape
//! B. Boundary lists: ascending, unique, every node inside its cell
//! C. Roles: entry/exit lists equal a direct enumeration from the graph
//! D. Nesting: every cell lies inside one cell of the next coarser level

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cells::{CellStorage, LevelStats};
use crate::formats::{CellsFile, GraphFile, PartitionFile};
use crate::graph::BaseGraph;
use crate::partition::{check_nesting, MultiLevelPartition};
use crate::types::{CellId, LevelId, NodeId};

#[derive(Debug, Serialize, Deserialize)]
pub struct CellsLockFile {
    pub graph_sha256: String,
    pub partition_sha256: String,
    pub cells_sha256: String,
    pub n_nodes: u64,
    pub n_levels: u64,
    pub n_cells: u64,
    pub n_matrix_entries: u64,
    pub levels: Vec<LevelStats>,
    pub created_at_utc: String,
}

/// Validate persisted outputs and generate the lock file
pub fn validate_cells(
    graph_path: &Path,
    partition_path: &Path,
    cells_path: &Path,
) -> Result<CellsLockFile> {
    println!("\n🔐 Running cell storage validation...\n");

    let graph = GraphFile::read(graph_path)?;
    let partition = PartitionFile::read(partition_path)?;
    let storage = CellsFile::read(cells_path)?;
    println!("  ✓ Checksums verified");

    verify_cells(&storage, &partition, &graph)?;

    let stats = storage.stats();
    println!("\n✅ Cell storage validation passed!");
    println!(
        "  {} cells, {} matrix entries",
        stats.total_cells,
        stats.n_matrix_entries()
    );

    Ok(CellsLockFile {
        graph_sha256: compute_file_sha256(graph_path)?,
        partition_sha256: compute_file_sha256(partition_path)?,
        cells_sha256: compute_file_sha256(cells_path)?,
        n_nodes: graph.num_nodes() as u64,
        n_levels: partition.num_levels() as u64,
        n_cells: stats.total_cells,
        n_matrix_entries: stats.n_matrix_entries(),
        levels: stats.levels,
        created_at_utc: chrono::Utc::now().to_rfc3339(),
    })
}

/// Run all lock conditions against in-memory data
pub fn verify_cells<P, G>(storage: &CellStorage, partition: &P, graph: &G) -> Result<()>
where
    P: MultiLevelPartition + Sync + ?Sized,
    G: BaseGraph + Sync + ?Sized,
{
    println!("A. Layout checks...");
    verify_layout(storage, partition, graph)?;
    println!("  ✓ Arrays consistent with {} levels", partition.num_levels());

    println!("\nB. Boundary list checks...");
    (1..storage.num_levels())
        .into_par_iter()
        .try_for_each(|level| verify_boundary_lists(storage, partition, level as LevelId))?;
    println!("  ✓ Boundary lists sorted and inside their cells");

    println!("\nC. Entry/exit role checks...");
    (1..storage.num_levels())
        .into_par_iter()
        .try_for_each(|level| verify_roles(storage, partition, graph, level as LevelId))?;
    println!("  ✓ Roles match direct enumeration");

    println!("\nD. Nesting checks...");
    check_nesting(partition)?;
    println!("  ✓ Cells nest across levels");

    Ok(())
}

fn verify_layout<P, G>(storage: &CellStorage, partition: &P, graph: &G) -> Result<()>
where
    P: MultiLevelPartition + ?Sized,
    G: BaseGraph + ?Sized,
{
    anyhow::ensure!(
        graph.num_nodes() == partition.num_nodes(),
        "graph.n_nodes ({}) != partition.n_nodes ({})",
        graph.num_nodes(),
        partition.num_nodes()
    );
    anyhow::ensure!(
        storage.num_levels() == partition.num_levels(),
        "storage.n_levels ({}) != partition.n_levels ({})",
        storage.num_levels(),
        partition.num_levels()
    );
    for level in 1..partition.num_levels() as LevelId {
        anyhow::ensure!(
            storage.num_cells(level) == partition.num_cells(level),
            "level {}: storage has {} cells, partition has {}",
            level,
            storage.num_cells(level),
            partition.num_cells(level)
        );
    }

    let parts = storage.to_parts();
    parts.check()?;
    let n_nodes = graph.num_nodes();
    for (kind, nodes) in [
        ("source", &parts.source_boundary),
        ("destination", &parts.destination_boundary),
    ] {
        if let Some(&node) = nodes.iter().find(|&&n| n as usize >= n_nodes) {
            anyhow::bail!("{kind} boundary node {node} out of range for {n_nodes} nodes");
        }
    }

    let matrix_entries: u64 = storage
        .stats()
        .levels
        .iter()
        .map(|l| l.n_matrix_entries)
        .sum();
    anyhow::ensure!(
        storage.weights().len() as u64 == matrix_entries + 1,
        "weights.len ({}) != matrix entries ({}) + sentinel",
        storage.weights().len(),
        matrix_entries
    );
    Ok(())
}

fn verify_boundary_lists<P>(storage: &CellStorage, partition: &P, level: LevelId) -> Result<()>
where
    P: MultiLevelPartition + ?Sized,
{
    for (id, cell) in storage.cells(level) {
        for (kind, nodes) in [
            ("source", cell.source_nodes()),
            ("destination", cell.destination_nodes()),
        ] {
            anyhow::ensure!(
                nodes.windows(2).all(|w| w[0] < w[1]),
                "level {level} cell {id}: {kind} nodes not strictly ascending"
            );
            if let Some(&node) = nodes.iter().find(|&&n| partition.cell(level, n) != id) {
                anyhow::bail!(
                    "level {level} cell {id}: {kind} node {node} belongs to cell {}",
                    partition.cell(level, node)
                );
            }
        }
    }
    Ok(())
}

fn verify_roles<P, G>(storage: &CellStorage, partition: &P, graph: &G, level: LevelId) -> Result<()>
where
    P: MultiLevelPartition + ?Sized,
    G: BaseGraph + ?Sized,
{
    let n_cells = partition.num_cells(level);
    let mut sources: Vec<Vec<NodeId>> = vec![Vec::new(); n_cells];
    let mut destinations: Vec<Vec<NodeId>> = vec![Vec::new(); n_cells];

    for node in 0..graph.num_nodes() as NodeId {
        let cell = partition.cell(level, node);
        let edges: Vec<(CellId, bool, bool)> = graph
            .edge_range(node)
            .map(|e| {
                (
                    partition.cell(level, graph.target(e)),
                    graph.is_forward(e),
                    graph.is_backward(e),
                )
            })
            .collect();

        if edges.iter().all(|&(c, _, _)| c == cell) {
            continue;
        }
        let entry = edges.iter().any(|&(c, fwd, _)| c == cell && fwd);
        let exit = edges.iter().any(|&(c, _, bwd)| c == cell && bwd);
        anyhow::ensure!(
            entry || exit,
            "level {level} cell {cell}: boundary node {node} is neither entry nor exit"
        );
        if entry {
            sources[cell as usize].push(node);
        }
        if exit {
            destinations[cell as usize].push(node);
        }
    }

    for (id, cell) in storage.cells(level) {
        anyhow::ensure!(
            cell.source_nodes() == sources[id as usize].as_slice(),
            "level {level} cell {id}: source nodes {:?}, expected {:?}",
            cell.source_nodes(),
            sources[id as usize]
        );
        anyhow::ensure!(
            cell.destination_nodes() == destinations[id as usize].as_slice(),
            "level {level} cell {id}: destination nodes {:?}, expected {:?}",
            cell.destination_nodes(),
            destinations[id as usize]
        );
    }
    Ok(())
}

fn compute_file_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let hash = Sha256::digest(&data);
    Ok(hex::encode(hash))
}
