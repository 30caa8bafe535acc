//! CRC32 checksums for salary records
//!
//! Every record on disk carries a trailing CRC32 (IEEE) over its length
//! prefix and body. A mismatch on read is treated as corruption.

use crc32fast::Hasher;

/// Computes the CRC32 of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
