//! Snapshot persistence with integrity hashing.
//!
//! [`JsonFileStore`] writes the snapshot inside a small envelope carrying a
//! BLAKE3 hex digest of the serialized snapshot; `load` recomputes and
//! verifies the digest before handing the snapshot back, so corruption and
//! tampering surface as [`StoreError::HashMismatch`] instead of silently
//! wrong state.
//!
//! Files written by the legacy application are a bare snapshot object with
//! no envelope. `load` falls back to parsing that shape directly -- missing
//! fields are filled from the defaults -- which is the single best-effort
//! upgrade path the store supports. The next `save` rewrites the file in the
//! enveloped shape.
//!
//! The engine never calls the store; the host layer does, after each
//! transition settles.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use biblio_model::snapshot::LibrarySnapshot;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors produced by snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The file contents are neither an envelope nor a legacy snapshot.
    #[error("snapshot file is not parseable: {details}")]
    Parse {
        /// Parser diagnostics for the envelope attempt.
        details: String,
    },

    /// The recorded digest does not match the snapshot contents.
    #[error("snapshot hash mismatch: recorded {recorded} but recomputed {computed}")]
    HashMismatch {
        /// Digest stored in the envelope.
        recorded: String,
        /// Digest recomputed from the snapshot data.
        computed: String,
    },
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// The persistence collaborator contract.
pub trait SnapshotStore {
    /// Load the stored snapshot, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<LibrarySnapshot>, StoreError>;

    /// Durably store a snapshot.
    fn save(&self, snapshot: &LibrarySnapshot) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Envelope & hashing
// ---------------------------------------------------------------------------

/// On-disk wrapper around the snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Envelope format version.
    version: u32,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the serialized
    /// snapshot.
    hash: String,
    /// The snapshot itself.
    snapshot: LibrarySnapshot,
}

/// Compute the BLAKE3 hex digest of a snapshot's canonical JSON bytes.
fn compute_hash(snapshot: &LibrarySnapshot) -> Result<String, StoreError> {
    let bytes = serde_json::to_vec(snapshot).map_err(StoreError::Serialize)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the given file path. Nothing is touched until the
    /// first `load`/`save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<LibrarySnapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;

        // Enveloped shape first: verify the digest before trusting the data.
        match serde_json::from_str::<Envelope>(&contents) {
            Ok(envelope) => {
                let computed = compute_hash(&envelope.snapshot)?;
                if computed != envelope.hash {
                    return Err(StoreError::HashMismatch {
                        recorded: envelope.hash,
                        computed,
                    });
                }
                Ok(Some(envelope.snapshot))
            }
            Err(envelope_err) => {
                // Legacy bare snapshot: no envelope, no digest. Missing
                // fields fall back to the defaults.
                match serde_json::from_str::<LibrarySnapshot>(&contents) {
                    Ok(snapshot) => {
                        tracing::warn!(
                            path = %self.path.display(),
                            "legacy snapshot shape loaded; next save upgrades it"
                        );
                        Ok(Some(snapshot))
                    }
                    Err(_) => Err(StoreError::Parse {
                        details: envelope_err.to_string(),
                    }),
                }
            }
        }
    }

    fn save(&self, snapshot: &LibrarySnapshot) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            hash: compute_hash(snapshot)?,
            snapshot: snapshot.clone(),
        };
        let serialized =
            serde_json::to_string_pretty(&envelope).map_err(StoreError::Serialize)?;

        // Write-then-rename so a crash mid-write never clobbers the
        // previous good snapshot.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized.as_bytes())?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store for tests and host wiring that does not need a file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<LibrarySnapshot>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<LibrarySnapshot>, StoreError> {
        match self.slot.lock() {
            Ok(slot) => Ok(slot.clone()),
            Err(_) => Ok(None),
        }
    }

    fn save(&self, snapshot: &LibrarySnapshot) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(snapshot.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
