//! cells.mld format - cell storage arrays
//!
//! Format (little-endian):
//!
//! Header (48 bytes):
//!   magic:                  u32 = 0x43444C4D  // "MLDC"
//!   version:                u16 = 1
//!   reserved:               u16 = 0
//!   n_weights:              u64   including the sentinel slot
//!   n_source_boundary:      u64
//!   n_destination_boundary: u64
//!   n_cells:                u64
//!   n_level_offsets:        u64   levels + 1
//!
//! Body:
//!   weights:              [u32; n_weights]
//!   source_boundary:      [u32; n_source_boundary]
//!   destination_boundary: [u32; n_destination_boundary]
//!   cells:                [CellData; n_cells]   5 × u32 each
//!   level_to_cell_offset: [u32; n_level_offsets]
//!
//! Footer (16 bytes): body_crc64, file_crc64
//!
//! The layout invariants are checked on read, so a file that passes the
//! checksum but was written by a buggy producer is still rejected.

use anyhow::{Context, Result};
use std::path::Path;

use super::crc::{check_prefix, ChecksumReader, ChecksumWriter};
use crate::cells::{CellData, CellStorage, CellStorageParts};

const MAGIC: u32 = 0x43444C4D; // "MLDC"
const VERSION: u16 = 1;
const HEADER_SIZE: u64 = 48;
const CELL_DATA_SIZE: u64 = 20;

pub struct CellsFile;

impl CellsFile {
    pub fn write<P: AsRef<Path>>(path: P, storage: &CellStorage) -> Result<()> {
        let parts = storage.to_parts();
        Self::write_parts(path, &parts)
    }

    pub fn write_parts<P: AsRef<Path>>(path: P, parts: &CellStorageParts) -> Result<()> {
        let mut writer = ChecksumWriter::create(path.as_ref())?;

        let mut header = Vec::with_capacity(HEADER_SIZE as usize);
        header.extend_from_slice(&MAGIC.to_le_bytes());
        header.extend_from_slice(&VERSION.to_le_bytes());
        header.extend_from_slice(&0u16.to_le_bytes());
        for len in [
            parts.weights.len(),
            parts.source_boundary.len(),
            parts.destination_boundary.len(),
            parts.cells.len(),
            parts.level_to_cell_offset.len(),
        ] {
            header.extend_from_slice(&(len as u64).to_le_bytes());
        }
        writer.header(&header)?;

        writer.u32s(&parts.weights)?;
        writer.u32s(&parts.source_boundary)?;
        writer.u32s(&parts.destination_boundary)?;
        for cell in &parts.cells {
            writer.u32s(&[
                cell.weight_offset,
                cell.source_boundary_offset,
                cell.destination_boundary_offset,
                cell.num_source_nodes,
                cell.num_destination_nodes,
            ])?;
        }
        writer.u32s(&parts.level_to_cell_offset)?;
        writer.finish()
    }

    /// Read the raw arrays without checking the layout invariants
    pub fn read_parts<P: AsRef<Path>>(path: P) -> Result<CellStorageParts> {
        let path = path.as_ref();
        let mut reader = ChecksumReader::open(path)?;

        let header = reader.header::<48>()?;
        check_prefix(path, &header, MAGIC, VERSION)?;
        let count = |i: usize| -> Result<u64> {
            let start = 8 + i * 8;
            Ok(u64::from_le_bytes(header[start..start + 8].try_into()?))
        };
        let n_weights = count(0)?;
        let n_sources = count(1)?;
        let n_destinations = count(2)?;
        let n_cells = count(3)?;
        let n_level_offsets = count(4)?;

        let body = [
            n_weights.checked_mul(4),
            n_sources.checked_mul(4),
            n_destinations.checked_mul(4),
            n_cells.checked_mul(CELL_DATA_SIZE),
            n_level_offsets.checked_mul(4),
        ]
        .into_iter()
        .try_fold(0u64, |acc, n| n.and_then(|n| acc.checked_add(n)))
        .with_context(|| format!("Array lengths overflow in {}", path.display()))?;
        reader.expect_len(HEADER_SIZE, body)?;

        let weights = reader.u32s(n_weights as usize)?;
        let source_boundary = reader.u32s(n_sources as usize)?;
        let destination_boundary = reader.u32s(n_destinations as usize)?;
        let cells = reader
            .u32s(n_cells as usize * 5)?
            .chunks_exact(5)
            .map(|c| CellData {
                weight_offset: c[0],
                source_boundary_offset: c[1],
                destination_boundary_offset: c[2],
                num_source_nodes: c[3],
                num_destination_nodes: c[4],
            })
            .collect();
        let level_to_cell_offset = reader.u32s(n_level_offsets as usize)?;
        reader.finish()?;

        Ok(CellStorageParts {
            weights,
            source_boundary,
            destination_boundary,
            cells,
            level_to_cell_offset,
        })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<CellStorage> {
        let path = path.as_ref();
        let parts = Self::read_parts(path)?;
        parts
            .check()
            .with_context(|| format!("Invalid cell layout in {}", path.display()))?;
        Ok(CellStorage::from_parts(parts))
    }
}
