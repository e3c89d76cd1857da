//! Build, inspect and verify steps driven by the CLI
//!
//! Each step takes a config struct and returns a result summary, so the
//! steps can be driven from tests without going through argument parsing.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;

use crate::cells::{CellStats, CellStorage};
use crate::formats::{CellsFile, GraphFile, PartitionFile};
use crate::graph::BaseGraph;
use crate::partition::{MultiLevelPartition, PackedPartition};
use crate::types::{CellId, LevelId, INVALID_WEIGHT};
use crate::validate::{validate_cells, CellsLockFile};

pub const CELLS_FILE: &str = "cells.mld";
pub const BUILD_LOCK_FILE: &str = "cells.build.lock.json";
pub const VERIFY_LOCK_FILE: &str = "cells.lock.json";

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub graph_path: PathBuf,
    pub partition_path: PathBuf,
    pub outdir: PathBuf,
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_path: PathBuf,
    pub n_nodes: u64,
    pub n_levels: u64,
    pub bits_per_node: u32,
    pub stats: CellStats,
    pub build_time_ms: u64,
}

/// Load graph and partition, build the cell storage and persist it
pub fn build_cells(config: BuildConfig) -> Result<BuildResult> {
    let start_time = Instant::now();
    println!("\n🧱 Building MLD cell storage...\n");

    println!("Loading base graph...");
    let graph = GraphFile::read(&config.graph_path)?;
    println!(
        "  ✓ {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );

    println!("Loading partition...");
    let flat = PartitionFile::read(&config.partition_path)?;
    let partition = PackedPartition::from_partition(&flat)
        .with_context(|| format!("Cannot pack {}", config.partition_path.display()))?;
    println!(
        "  ✓ {} levels, {} bits per node",
        partition.num_levels(),
        partition.bits_per_node()
    );

    println!("Classifying boundary nodes...");
    let storage = CellStorage::build(&partition, &graph)?;
    let stats = storage.stats();
    for level in &stats.levels {
        println!(
            "  ✓ level {}: {} cells, {} sources, {} destinations",
            level.level, level.n_cells, level.n_source_nodes, level.n_destination_nodes
        );
    }

    std::fs::create_dir_all(&config.outdir)
        .with_context(|| format!("Failed to create {}", config.outdir.display()))?;
    let output_path = config.outdir.join(CELLS_FILE);
    CellsFile::write(&output_path, &storage)?;
    println!("  ✓ Wrote {}", output_path.display());

    Ok(BuildResult {
        output_path,
        n_nodes: graph.num_nodes() as u64,
        n_levels: partition.num_levels() as u64,
        bits_per_node: partition.bits_per_node(),
        stats,
        build_time_ms: start_time.elapsed().as_millis() as u64,
    })
}

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub cells_path: PathBuf,
    /// Print a single cell instead of the per-level summary
    pub cell: Option<(LevelId, CellId)>,
    pub json: bool,
}

pub fn inspect_cells(config: InspectConfig) -> Result<()> {
    let storage = CellsFile::read(&config.cells_path)?;

    let Some((level, id)) = config.cell else {
        let stats = storage.stats();
        if config.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }
        println!("📦 {}", config.cells_path.display());
        println!(
            "  {} levels, {} cells, {} weight slots",
            storage.num_levels(),
            stats.total_cells,
            stats.weight_slots
        );
        for level in &stats.levels {
            println!(
                "  level {}: {} cells ({} empty), {} sources, {} destinations, {} entries",
                level.level,
                level.n_cells,
                level.n_empty_cells,
                level.n_source_nodes,
                level.n_destination_nodes,
                level.n_matrix_entries
            );
        }
        return Ok(());
    };

    anyhow::ensure!(
        level >= 1 && (level as usize) < storage.num_levels(),
        "Level {} out of range 1..{}",
        level,
        storage.num_levels()
    );
    anyhow::ensure!(
        (id as usize) < storage.num_cells(level),
        "Cell {} out of range at level {} ({} cells)",
        id,
        level,
        storage.num_cells(level)
    );

    let cell = storage.cell(level, id);
    if config.json {
        let rows: Vec<_> = cell
            .source_nodes()
            .iter()
            .map(|&s| cell.out_weight(s).to_vec())
            .collect();
        let out = serde_json::json!({
            "level": level,
            "cell": id,
            "source_nodes": cell.source_nodes(),
            "destination_nodes": cell.destination_nodes(),
            "weights": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("📦 level {} cell {}", level, id);
    println!("  sources:      {:?}", cell.source_nodes());
    println!("  destinations: {:?}", cell.destination_nodes());
    for &source in cell.source_nodes() {
        let row: Vec<String> = cell
            .out_weight(source)
            .iter()
            .map(|&w| {
                if w == INVALID_WEIGHT {
                    "-".to_string()
                } else {
                    w.to_string()
                }
            })
            .collect();
        println!("  {:>8} → [{}]", source, row.join(", "));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub graph_path: PathBuf,
    pub partition_path: PathBuf,
    pub cells_path: PathBuf,
    /// Where to write the lock file, next to the cells file if unset
    pub outdir: Option<PathBuf>,
}

pub fn verify_cells(config: VerifyConfig) -> Result<(CellsLockFile, PathBuf)> {
    let lock = validate_cells(
        &config.graph_path,
        &config.partition_path,
        &config.cells_path,
    )?;

    let outdir = match config.outdir {
        Some(dir) => dir,
        None => config
            .cells_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    let lock_path = outdir.join(VERIFY_LOCK_FILE);
    std::fs::write(&lock_path, serde_json::to_string_pretty(&lock)?)
        .with_context(|| format!("Failed to write {}", lock_path.display()))?;
    Ok((lock, lock_path))
}
