use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::components::{
    error::{LoadError, LoadResult, StoreError},
    store::record::OrderRecord,
};

/// Append-only log of records added on top of a read-only source.
/// One JSON object per line, each carrying a checksum of its record.
#[derive(Debug)]
pub struct AppendJournal {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: String, // RFC 3339 time of the append
    pub checksum: u64,     // Leading 8 bytes of SHA-256 over the bincode record
    pub record: OrderRecord,
}

impl AppendJournal {
    pub fn new(path: impl AsRef<Path>) -> Self {
        AppendJournal {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn checksum(record: &OrderRecord) -> Result<u64, String> {
        let serialized =
            bincode::serialize(record).map_err(|e| format!("Failed to serialize record: {}", e))?;
        let mut hasher = Sha256::new();
        hasher.update(&serialized);
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Ok(u64::from_be_bytes(head))
    }

    /// Reads back every journaled record in append order. A missing file is an empty journal.
    pub fn replay(&self) -> LoadResult<Vec<OrderRecord>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let corrupt = |reason: String| LoadError::Journal {
                line: idx + 1,
                reason,
            };

            let entry: JournalEntry = serde_json::from_str(&line)
                .map_err(|e| corrupt(format!("Failed to parse journal entry: {}", e)))?;
            let expected = Self::checksum(&entry.record).map_err(&corrupt)?;
            if expected != entry.checksum {
                return Err(corrupt(format!(
                    "checksum mismatch for record {}",
                    entry.record.id
                )));
            }
            records.push(entry.record);
        }

        info!(
            "Replayed {} journaled records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    pub fn log_record(&mut self, record: &OrderRecord) -> Result<(), StoreError> {
        let entry = JournalEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            checksum: Self::checksum(record).map_err(StoreError::Persist)?,
            record: record.clone(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|e| StoreError::Persist(format!("Failed to encode journal entry: {}", e)))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        debug!("Journaled record {} to {}", record.id, self.path.display());
        Ok(())
    }
}
