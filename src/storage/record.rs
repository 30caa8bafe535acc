//! Salary record types and their on-disk encoding
//!
//! Record format:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Record ID        | (u64 LE)
//! +------------------+
//! | Name             | (length-prefixed UTF-8)
//! +------------------+
//! | Salary           | (f64 LE bits)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};

use super::checksum::compute_checksum;

/// Smallest possible frame: length + id + empty name + salary + checksum
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 8 + 4 + 8 + 4;

/// Identifier assigned by the store on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Wraps a raw identifier
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Returns the identifier following this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record accepted for persistence but not yet assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub salary: f64,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, salary: f64) -> Self {
        Self {
            name: name.into(),
            salary,
        }
    }

    /// Binds the record to the identifier the store assigned
    pub fn with_id(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            salary: self.salary,
        }
    }
}

/// A persisted salary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub salary: f64,
}

impl Record {
    pub fn new(id: RecordId, name: impl Into<String>, salary: f64) -> Self {
        Self {
            id,
            name: name.into(),
            salary,
        }
    }

    /// Serializes the record into one checksummed frame.
    pub fn encode(&self) -> Vec<u8> {
        let name = self.name.as_bytes();
        let record_length = (MIN_RECORD_SIZE + name.len()) as u32;

        let mut frame = Vec::with_capacity(record_length as usize);
        frame.extend_from_slice(&record_length.to_le_bytes());
        frame.extend_from_slice(&self.id.get().to_le_bytes());
        frame.extend_from_slice(&(name.len() as u32).to_le_bytes());
        frame.extend_from_slice(name);
        frame.extend_from_slice(&self.salary.to_bits().to_le_bytes());

        let checksum = compute_checksum(&frame);
        frame.extend_from_slice(&checksum.to_le_bytes());
        frame
    }

    /// Parses one frame from the front of `data`, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }
        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let mut stored = [0u8; 4];
        stored.copy_from_slice(&data[checksum_offset..record_length]);
        let stored_checksum = u32::from_le_bytes(stored);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);
        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let mut u64_buf = [0u8; 8];
        cursor.read_exact(&mut u64_buf)?;
        let id = RecordId::new(u64::from_le_bytes(u64_buf));

        let mut len_buf = [0u8; 4];
        cursor.read_exact(&mut len_buf)?;
        let name_len = u32::from_le_bytes(len_buf) as usize;
        if name_len != record_length - MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Name length {} disagrees with frame length", name_len),
            ));
        }
        let mut name_buf = vec![0u8; name_len];
        cursor.read_exact(&mut name_buf)?;
        let name = String::from_utf8(name_buf).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
        })?;

        cursor.read_exact(&mut u64_buf)?;
        let salary = f64::from_bits(u64::from_le_bytes(u64_buf));

        Ok((Self { id, name, salary }, record_length))
    }
}
