//! partition.mlp format - per-level cell assignment arrays
//!
//! Format (little-endian):
//!
//! Header (16 bytes):
//!   magic:     u32 = 0x504C444D  // "MLDP"
//!   version:   u16 = 1
//!   reserved:  u16 = 0
//!   n_nodes:   u32
//!   n_levels:  u32   stored levels, level 0 excluded
//!
//! Body:
//!   cells: [u32; n_nodes] per stored level, level 1 first
//!
//! Footer (16 bytes): body_crc64, file_crc64

use anyhow::{Context, Result};
use std::path::Path;

use super::crc::{check_prefix, ChecksumReader, ChecksumWriter};
use crate::partition::{FlatPartition, MultiLevelPartition};
use crate::types::{LevelId, NodeId};

const MAGIC: u32 = 0x504C444D; // "MLDP"
const VERSION: u16 = 1;
const HEADER_SIZE: u64 = 16;

pub struct PartitionFile;

impl PartitionFile {
    /// Write any partition backend; only the stored levels are persisted
    pub fn write<P, M>(path: P, partition: &M) -> Result<()>
    where
        P: AsRef<Path>,
        M: MultiLevelPartition + ?Sized,
    {
        let n_nodes =
            u32::try_from(partition.num_nodes()).context("Partition has too many nodes")?;
        let n_levels = partition.num_levels().saturating_sub(1) as u32;
        let mut writer = ChecksumWriter::create(path.as_ref())?;

        let mut header = Vec::with_capacity(HEADER_SIZE as usize);
        header.extend_from_slice(&MAGIC.to_le_bytes());
        header.extend_from_slice(&VERSION.to_le_bytes());
        header.extend_from_slice(&0u16.to_le_bytes());
        header.extend_from_slice(&n_nodes.to_le_bytes());
        header.extend_from_slice(&n_levels.to_le_bytes());
        writer.header(&header)?;

        for level in 1..=n_levels {
            let cells: Vec<u32> = (0..n_nodes as NodeId)
                .map(|node| partition.cell(level as LevelId, node))
                .collect();
            writer.u32s(&cells)?;
        }
        writer.finish()
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<FlatPartition> {
        let path = path.as_ref();
        let mut reader = ChecksumReader::open(path)?;

        let header = reader.header::<16>()?;
        check_prefix(path, &header, MAGIC, VERSION)?;
        let n_nodes = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as u64;
        let n_levels = u32::from_le_bytes([header[12], header[13], header[14], header[15]]) as u64;
        let body = (n_nodes * 4)
            .checked_mul(n_levels)
            .with_context(|| format!("Level count overflows in {}", path.display()))?;
        reader.expect_len(HEADER_SIZE, body)?;

        let mut levels = Vec::with_capacity(n_levels as usize);
        for _ in 0..n_levels {
            levels.push(reader.u32s(n_nodes as usize)?);
        }
        reader.finish()?;

        FlatPartition::new(levels)
            .with_context(|| format!("Invalid partition in {}", path.display()))
    }
}
