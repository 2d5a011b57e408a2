//! Write-Ahead Log for `DictStore` persistence.
//!
//! Each write appends a small CRC-framed record instead of serializing the
//! entire store. A checkpoint writes the full state and truncates the WAL.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dict_store::Tables;
use super::{PatternOrigin, StoreError, WordRecord};

/// Frame header: payload length (u32 LE) + CRC32 of the payload (u32 LE).
const FRAME_HEADER: usize = 8;

/// A single WAL entry, mirroring one store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) enum WalOp {
    Learn {
        word: String,
        initial_confidence: u32,
        learned_on: u64,
    },
    Insert {
        word: String,
    },
    Merge {
        record: WordRecord,
    },
    AddPattern {
        pattern: String,
        word: String,
        origin: PatternOrigin,
    },
    Delete {
        word: String,
    },
}

/// WAL state that lives alongside a checkpoint file.
pub struct StoreWal {
    /// Path to the checkpoint file (`learnings.vrns`).
    checkpoint_path: PathBuf,
    /// Path to the WAL file (`learnings.vrns.wal`).
    wal_path: PathBuf,
    /// Kept open in append mode to avoid repeated open/close per entry.
    file: Option<File>,
    /// Number of entries in the current WAL (since last compaction).
    entry_count: usize,
    compact_threshold: usize,
}

impl StoreWal {
    /// Create a WAL handle for the given checkpoint path.
    pub fn new(checkpoint_path: &Path, compact_threshold: usize) -> Self {
        let mut wal_name = checkpoint_path.as_os_str().to_owned();
        wal_name.push(".wal");
        Self {
            checkpoint_path: checkpoint_path.to_path_buf(),
            wal_path: PathBuf::from(wal_name),
            file: None,
            entry_count: 0,
            compact_threshold,
        }
    }

    /// Replay the WAL into `tables`, stopping at the first truncated or
    /// corrupt frame. A bad tail is cut off so later appends stay reachable.
    /// Returns the number of entries replayed.
    pub(super) fn replay(&mut self, tables: &mut Tables) -> Result<usize, StoreError> {
        let data = match fs::read(&self.wal_path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.entry_count = 0;
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        let mut pos = 0;
        while pos + FRAME_HEADER <= data.len() {
            let length = read_u32(&data[pos..pos + 4]) as usize;
            let expected_crc = read_u32(&data[pos + 4..pos + 8]);

            if length == 0 || pos + FRAME_HEADER + length > data.len() {
                debug!(pos, "truncated WAL frame");
                break;
            }

            let payload = &data[pos + FRAME_HEADER..pos + FRAME_HEADER + length];
            if crc32fast::hash(payload) != expected_crc {
                debug!(pos, "corrupt WAL frame");
                break;
            }

            match bincode::deserialize::<WalOp>(payload) {
                Ok(op) => {
                    tables.apply(&op)?;
                    count += 1;
                }
                Err(_) => break,
            }

            pos += FRAME_HEADER + length;
        }

        if pos < data.len() {
            debug!(kept = pos, dropped = data.len() - pos, "truncating WAL tail");
            self.file = None;
            OpenOptions::new()
                .write(true)
                .open(&self.wal_path)?
                .set_len(pos as u64)?;
        }

        self.entry_count = count;
        Ok(count)
    }

    /// Append an entry to the WAL file.
    pub(super) fn append(&mut self, op: &WalOp) -> Result<(), StoreError> {
        let payload = bincode::serialize(op).map_err(StoreError::Serialize)?;
        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        let file = self.open_file()?;
        file.write_all(&length.to_le_bytes())?;
        file.write_all(&crc.to_le_bytes())?;
        file.write_all(&payload)?;

        self.entry_count += 1;
        Ok(())
    }

    /// Get or lazily open the WAL file handle.
    fn open_file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(f) => f,
            None => {
                if let Some(parent) = self.wal_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.wal_path)?
            }
        };
        Ok(self.file.insert(file))
    }

    /// Whether the WAL has reached the compaction threshold.
    pub fn needs_compact(&self) -> bool {
        self.entry_count >= self.compact_threshold
    }

    /// Truncate the WAL file and reset entry count.
    /// Call after a checkpoint has been written.
    pub fn truncate_wal(&mut self) -> io::Result<()> {
        self.file = None;
        File::create(&self.wal_path)?;
        self.entry_count = 0;
        Ok(())
    }

    /// Path to the checkpoint file.
    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
