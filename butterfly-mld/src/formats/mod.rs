//! Binary file formats for the base graph, the partition and the cell storage
//!
//! All formats are little-endian with a `magic version reserved` prefix and
//! a CRC-64 footer, see [`crc`].

pub mod cells;
pub mod crc;
pub mod graph;
pub mod partition;

pub use cells::CellsFile;
pub use graph::GraphFile;
pub use partition::PartitionFile;
