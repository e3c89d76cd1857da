//! CLI commands for butterfly-mld

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{
    build_cells, inspect_cells, verify_cells, BuildConfig, InspectConfig, VerifyConfig,
    BUILD_LOCK_FILE,
};
use crate::types::{CellId, LevelId};

#[derive(Parser)]
#[command(name = "butterfly-mld")]
#[command(about = "Multi-level partition cell storage builder", long_about = None)]
pub struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Number of worker threads (defaults to all cores)
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build cells.mld from a base graph and a multi-level partition
    Build {
        /// Base graph (graph.csr)
        #[arg(long)]
        graph: PathBuf,

        /// Multi-level partition (partition.mlp)
        #[arg(long)]
        partition: PathBuf,

        /// Output directory for cells.mld and the build lock file
        #[arg(short, long)]
        outdir: PathBuf,
    },

    /// Print per-level statistics or the contents of a single cell
    Inspect {
        /// Cell storage (cells.mld)
        cells: PathBuf,

        /// Level of the cell to print
        #[arg(long, requires = "cell")]
        level: Option<LevelId>,

        /// Id of the cell to print
        #[arg(long, requires = "level")]
        cell: Option<CellId>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check cells.mld against its inputs and write cells.lock.json
    Verify {
        /// Base graph (graph.csr)
        #[arg(long)]
        graph: PathBuf,

        /// Multi-level partition (partition.mlp)
        #[arg(long)]
        partition: PathBuf,

        /// Cell storage (cells.mld)
        #[arg(long)]
        cells: PathBuf,

        /// Output directory for the lock file (defaults to the cells directory)
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
            tracing::debug!(threads, "configured rayon pool");
        }

        match self.command {
            Commands::Build {
                graph,
                partition,
                outdir,
            } => {
                let config = BuildConfig {
                    graph_path: graph,
                    partition_path: partition,
                    outdir: outdir.clone(),
                };
                let result = build_cells(config)?;

                let lock = serde_json::json!({
                    "output_path": result.output_path.display().to_string(),
                    "n_nodes": result.n_nodes,
                    "n_levels": result.n_levels,
                    "bits_per_node": result.bits_per_node,
                    "n_cells": result.stats.total_cells,
                    "n_matrix_entries": result.stats.n_matrix_entries(),
                    "build_time_ms": result.build_time_ms,
                    "created_at_utc": chrono::Utc::now().to_rfc3339(),
                });
                let lock_path = outdir.join(BUILD_LOCK_FILE);
                std::fs::write(&lock_path, serde_json::to_string_pretty(&lock)?)?;

                println!();
                println!("✅ Cell storage built in {} ms", result.build_time_ms);
                println!("📋 Lock file: {}", lock_path.display());
                Ok(())
            }
            Commands::Inspect {
                cells,
                level,
                cell,
                json,
            } => inspect_cells(InspectConfig {
                cells_path: cells,
                cell: level.zip(cell),
                json,
            }),
            Commands::Verify {
                graph,
                partition,
                cells,
                outdir,
            } => {
                let (_, lock_path) = verify_cells(VerifyConfig {
                    graph_path: graph,
                    partition_path: partition,
                    cells_path: cells,
                    outdir,
                })?;
                println!("📋 Lock file: {}", lock_path.display());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inspect_cell() {
        let cli = Cli::try_parse_from([
            "butterfly-mld",
            "--log-format",
            "json",
            "inspect",
            "cells.mld",
            "--level",
            "2",
            "--cell",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Inspect { level, cell, .. } => assert_eq!(level.zip(cell), Some((2, 7))),
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_inspect_level_requires_cell() {
        assert!(Cli::try_parse_from(["butterfly-mld", "inspect", "cells.mld", "--level", "1"])
            .is_err());
    }
}
