//! graph.csr format - base graph in CSR form
//!
//! Format (little-endian):
//!
//! Header (24 bytes):
//!   magic:    u32 = 0x474C444D  // "MLDG"
//!   version:  u16 = 1
//!   reserved: u16 = 0
//!   n_nodes:  u32
//!   padding:  u32 = 0
//!   n_edges:  u64
//!
//! Body:
//!   offsets: [u64; n_nodes + 1]
//!   heads:   [u32; n_edges]
//!   flags:   [u8;  n_edges]   bit 0 forward, bit 1 backward
//!
//! Footer (16 bytes): body_crc64, file_crc64

use anyhow::{Context, Result};
use std::path::Path;

use super::crc::{check_prefix, ChecksumReader, ChecksumWriter};
use crate::graph::{StaticGraph, BACKWARD, FORWARD};
use crate::types::EdgeId;

const MAGIC: u32 = 0x474C444D; // "MLDG"
const VERSION: u16 = 1;
const HEADER_SIZE: u64 = 24;

pub struct GraphFile;

impl GraphFile {
    pub fn write<P: AsRef<Path>>(path: P, graph: &StaticGraph) -> Result<()> {
        let path = path.as_ref();
        let n_nodes = u32::try_from(graph.offsets.len().saturating_sub(1))
            .context("Graph has more than u32::MAX nodes")?;
        let mut writer = ChecksumWriter::create(path)?;

        let mut header = Vec::with_capacity(HEADER_SIZE as usize);
        header.extend_from_slice(&MAGIC.to_le_bytes());
        header.extend_from_slice(&VERSION.to_le_bytes());
        header.extend_from_slice(&0u16.to_le_bytes());
        header.extend_from_slice(&n_nodes.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&(graph.heads.len() as u64).to_le_bytes());
        writer.header(&header)?;

        // An empty graph still stores the single leading offset
        if graph.offsets.is_empty() {
            writer.u64s(&[0])?;
        } else {
            writer.u64s(&graph.offsets)?;
        }
        writer.u32s(&graph.heads)?;
        writer.body(&graph.flags)?;
        writer.finish()
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<StaticGraph> {
        let path = path.as_ref();
        let mut reader = ChecksumReader::open(path)?;

        let header = reader.header::<24>()?;
        check_prefix(path, &header, MAGIC, VERSION)?;
        let n_nodes = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as u64;
        let n_edges = u64::from_le_bytes(header[16..24].try_into()?);
        anyhow::ensure!(
            n_edges <= EdgeId::MAX as u64,
            "Edge count {} exceeds the edge id range in {}",
            n_edges,
            path.display()
        );

        let body = (n_nodes + 1)
            .checked_mul(8)
            .zip(n_edges.checked_mul(5))
            .and_then(|(a, b)| a.checked_add(b))
            .with_context(|| format!("Edge count overflows in {}", path.display()))?;
        reader.expect_len(HEADER_SIZE, body)?;

        let offsets = reader.u64s(n_nodes as usize + 1)?;
        let heads = reader.u32s(n_edges as usize)?;
        let flags = reader.bytes(n_edges as usize)?;
        reader.finish()?;

        anyhow::ensure!(
            offsets.first() == Some(&0)
                && offsets.last() == Some(&n_edges)
                && offsets.windows(2).all(|w| w[0] <= w[1]),
            "Malformed CSR offsets in {}",
            path.display()
        );
        anyhow::ensure!(
            heads.iter().all(|&h| (h as u64) < n_nodes),
            "Edge target out of range in {}",
            path.display()
        );
        anyhow::ensure!(
            flags.iter().all(|&f| f & !(FORWARD | BACKWARD) == 0),
            "Unknown direction flags in {}",
            path.display()
        );

        Ok(StaticGraph {
            offsets,
            heads,
            flags,
        })
    }
}
