//! CRC-64-ISO checksums and checksummed little-endian streams
//!
//! Every file ends with a 16 byte footer:
//!
//! ```text
//! body_crc64: u64   CRC over the body only
//! file_crc64: u64   CRC over header + body
//! ```

use anyhow::{Context, Result};
use crc::{Crc, CRC_64_GO_ISO};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// CRC-64-ISO algorithm
pub const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

pub const FOOTER_SIZE: u64 = 16;

/// Compute CRC-64 checksum for a byte slice
pub fn checksum(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}

/// Incremental CRC-64 digest
pub struct Digest {
    digest: crc::Digest<'static, u64>,
}

impl Digest {
    pub fn new() -> Self {
        Self {
            digest: CRC64.digest(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    pub fn finalize(self) -> u64 {
        self.digest.finalize()
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffered file writer tracking the body and file digests
pub struct ChecksumWriter {
    writer: BufWriter<File>,
    body: Digest,
    file: Digest,
}

impl ChecksumWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            body: Digest::new(),
            file: Digest::new(),
        })
    }

    pub fn header(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.file.update(bytes);
        Ok(())
    }

    pub fn body(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.body.update(bytes);
        self.file.update(bytes);
        Ok(())
    }

    pub fn u32s(&mut self, values: &[u32]) -> Result<()> {
        for &v in values {
            self.body(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn u64s(&mut self, values: &[u64]) -> Result<()> {
        for &v in values {
            self.body(&v.to_le_bytes())?;
        }
        Ok(())
    }

    /// Write the footer and flush
    pub fn finish(self) -> Result<()> {
        let Self {
            mut writer,
            body,
            file,
        } = self;
        writer.write_all(&body.finalize().to_le_bytes())?;
        writer.write_all(&file.finalize().to_le_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Buffered file reader recomputing the body and file digests
pub struct ChecksumReader {
    reader: BufReader<File>,
    path: PathBuf,
    len: u64,
    body: Digest,
    file: Digest,
}

impl ChecksumReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let len = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
            len,
            body: Digest::new(),
            file: Digest::new(),
        })
    }

    pub fn header<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.reader
            .read_exact(&mut buf)
            .with_context(|| format!("Truncated header in {}", self.path.display()))?;
        self.file.update(&buf);
        Ok(buf)
    }

    /// Fail unless the file holds exactly `header + body + footer` bytes.
    /// Call before reading a body sized from header fields.
    pub fn expect_len(&self, header: u64, body: u64) -> Result<()> {
        let expected = header
            .checked_add(body)
            .and_then(|n| n.checked_add(FOOTER_SIZE));
        anyhow::ensure!(
            expected == Some(self.len),
            "Size mismatch in {}: expected {} bytes, got {} bytes",
            self.path.display(),
            expected.map_or_else(|| "overflowing".to_string(), |n| n.to_string()),
            self.len
        );
        Ok(())
    }

    fn body_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf)?;
        self.body.update(buf);
        self.file.update(buf);
        Ok(())
    }

    pub fn bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.body_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn u32s(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut values = Vec::with_capacity(count);
        let mut buf = [0u8; 4];
        for _ in 0..count {
            self.body_exact(&mut buf)?;
            values.push(u32::from_le_bytes(buf));
        }
        Ok(values)
    }

    pub fn u64s(&mut self, count: usize) -> Result<Vec<u64>> {
        let mut values = Vec::with_capacity(count);
        let mut buf = [0u8; 8];
        for _ in 0..count {
            self.body_exact(&mut buf)?;
            values.push(u64::from_le_bytes(buf));
        }
        Ok(values)
    }

    /// Read the footer and compare both checksums
    pub fn finish(mut self) -> Result<()> {
        let mut footer = [0u8; 16];
        self.reader
            .read_exact(&mut footer)
            .with_context(|| format!("Missing footer in {}", self.path.display()))?;
        let body_crc = u64::from_le_bytes(footer[0..8].try_into()?);
        let file_crc = u64::from_le_bytes(footer[8..16].try_into()?);

        let actual_body = self.body.finalize();
        let actual_file = self.file.finalize();
        anyhow::ensure!(
            body_crc == actual_body,
            "Body checksum mismatch in {}: stored 0x{:016x}, computed 0x{:016x}",
            self.path.display(),
            body_crc,
            actual_body
        );
        anyhow::ensure!(
            file_crc == actual_file,
            "File checksum mismatch in {}: stored 0x{:016x}, computed 0x{:016x}",
            self.path.display(),
            file_crc,
            actual_file
        );
        Ok(())
    }
}

/// Check magic and version of a `magic(4) version(2) reserved(2)` prefix
pub fn check_prefix(path: &Path, prefix: &[u8], magic: u32, version: u16) -> Result<()> {
    let found_magic = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    anyhow::ensure!(
        found_magic == magic,
        "Invalid magic in {}: expected 0x{:08x}, got 0x{:08x}",
        path.display(),
        magic,
        found_magic
    );
    let found_version = u16::from_le_bytes([prefix[4], prefix[5]]);
    anyhow::ensure!(
        found_version == version,
        "Unsupported version in {}: expected {}, got {}",
        path.display(),
        version,
        found_version
    );
    Ok(())
}
