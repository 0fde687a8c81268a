//! Framed binary serialization for the three index artifacts (spec §6
//! "Binary index format"; grounded on the checksum-framed checkpoint
//! format in `rank-retrieve`'s persistence layer, adapted from a
//! segment-list checkpoint to a single self-contained blob).
//!
//! Layout: `magic(4) | format_version(u32 LE) | payload_len(u64 LE) |
//! payload (postcard) | crc32(u32 LE)`, the checksum covering every byte
//! that precedes it.

use std::io::{Read, Write};

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FeatureGenError, Result};

const MAGIC: [u8; 4] = *b"LTRF";
const FORMAT_VERSION: u32 = 1;

/// Serialize `value` and write it, framed, to `writer`.
pub fn save<T: Serialize, W: Write>(writer: &mut W, value: &T) -> Result<()> {
    let payload = postcard::to_allocvec(value).map_err(|e| FeatureGenError::Format {
        file: "archive".into(),
        detail: format!("postcard serialization failed: {e}"),
    })?;

    let mut hasher = Hasher::new();
    hasher.update(&MAGIC);
    hasher.update(&FORMAT_VERSION.to_le_bytes());
    hasher.update(&(payload.len() as u64).to_le_bytes());
    hasher.update(&payload);
    let checksum = hasher.finalize();

    writer.write_all(&MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&(payload.len() as u64).to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&checksum.to_le_bytes())?;
    Ok(())
}

/// Read and deserialize a value previously written by [`save`], verifying
/// its magic and checksum.
pub fn load<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(FeatureGenError::Format {
            file: "archive".into(),
            detail: format!("bad magic: {magic:?}"),
        });
    }

    let mut version_buf = [0u8; 4];
    reader.read_exact(&mut version_buf)?;
    let version = u32::from_le_bytes(version_buf);
    if version != FORMAT_VERSION {
        return Err(FeatureGenError::Format {
            file: "archive".into(),
            detail: format!("unsupported format version {version}"),
        });
    }

    let mut len_buf = [0u8; 8];
    reader.read_exact(&mut len_buf)?;
    let len = u64::from_le_bytes(len_buf) as usize;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    let mut checksum_buf = [0u8; 4];
    reader.read_exact(&mut checksum_buf)?;
    let expected = u32::from_le_bytes(checksum_buf);

    let mut hasher = Hasher::new();
    hasher.update(&magic);
    hasher.update(&version_buf);
    hasher.update(&len_buf);
    hasher.update(&payload);
    let actual = hasher.finalize();
    if actual != expected {
        return Err(FeatureGenError::Format {
            file: "archive".into(),
            detail: format!("checksum mismatch: expected {expected}, got {actual}"),
        });
    }

    postcard::from_bytes(&payload).map_err(|e| FeatureGenError::Format {
        file: "archive".into(),
        detail: format!("postcard deserialization failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_value() {
        let mut buf = Vec::new();
        save(&mut buf, &vec![1u32, 2, 3]).unwrap();
        let back: Vec<u32> = load(&mut buf.as_slice()).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_corrupted_payload() {
        let mut buf = Vec::new();
        save(&mut buf, &"hello".to_string()).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        let result: Result<String> = load(&mut buf.as_slice());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_magic() {
        let buf = vec![0u8; 20];
        let result: Result<Vec<u32>> = load(&mut buf.as_slice());
        assert!(result.is_err());
    }
}
