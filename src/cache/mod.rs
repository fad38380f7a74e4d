//! Persistence for the processed corpus and its feature vectors.
//!
//! A cache generation is two companion artifacts in one directory: the
//! processed corpus table (`corpus.json`, human-inspectable) and the
//! vector matrix (`vectors.bin`, compact binary). Both embed a format
//! version, and the record ids stored in the matrix must match the
//! corpus artifact entry for entry — identity, not file position, is the
//! join key.
//!
//! The cache's contract is deliberately narrow: return what was last
//! saved, or nothing. It does not watch the raw source tables; a stale
//! generation after the sources change is the caller's concern.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::ContentRecord;
use crate::error::{Result, SugerirError};
use crate::vectorize::FeatureMatrix;

/// Version stamped into both artifacts; bump on layout changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

const CORPUS_FILE: &str = "corpus.json";
const VECTORS_FILE: &str = "vectors.bin";

/// One processed record as persisted: the normalized record plus its
/// derived tag text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecord {
    /// The normalized catalog record.
    pub record: ContentRecord,
    /// Its tag text, ready for refitting without the feature builder.
    pub tags: String,
}

#[derive(Serialize, Deserialize)]
struct CorpusArtifact {
    version: u32,
    records: Vec<CachedRecord>,
}

#[derive(Serialize, Deserialize)]
struct VectorArtifact {
    version: u32,
    matrix: FeatureMatrix,
}

/// Two-artifact vector cache rooted at a directory.
///
/// # Examples
///
/// ```no_run
/// use sugerir::cache::VectorCache;
///
/// let cache = VectorCache::new("/var/cache/sugerir");
/// if let Some((records, matrix)) = cache.load().unwrap() {
///     assert_eq!(records.len(), matrix.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VectorCache {
    dir: PathBuf,
}

impl VectorCache {
    /// Cache rooted at `dir` (created on first save).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the corpus artifact.
    #[must_use]
    pub fn corpus_path(&self) -> PathBuf {
        self.dir.join(CORPUS_FILE)
    }

    /// Path of the vector artifact.
    #[must_use]
    pub fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    /// Load the last saved generation.
    ///
    /// Returns `None` when either artifact is absent or was written by a
    /// different format version.
    ///
    /// # Errors
    ///
    /// [`SugerirError::Serialization`] when an artifact is unreadable or
    /// the two artifacts disagree on record ids (a corrupt generation).
    pub fn load(&self) -> Result<Option<(Vec<CachedRecord>, FeatureMatrix)>> {
        let corpus_path = self.corpus_path();
        let vectors_path = self.vectors_path();
        if !corpus_path.exists() || !vectors_path.exists() {
            debug!(dir = %self.dir.display(), "vector cache artifacts absent");
            return Ok(None);
        }

        let corpus: CorpusArtifact = read_json(&corpus_path)?;
        let vectors: VectorArtifact = read_bincode(&vectors_path)?;

        if corpus.version != CACHE_FORMAT_VERSION || vectors.version != CACHE_FORMAT_VERSION {
            warn!(
                corpus_version = corpus.version,
                vectors_version = vectors.version,
                supported = CACHE_FORMAT_VERSION,
                "ignoring vector cache from another format version"
            );
            return Ok(None);
        }

        let ids_match = corpus.records.len() == vectors.matrix.len()
            && corpus
                .records
                .iter()
                .zip(vectors.matrix.ids())
                .all(|(entry, &id)| entry.record.id == id);
        if !ids_match {
            return Err(SugerirError::Serialization(
                "cache artifacts disagree on record ids".to_string(),
            ));
        }

        Ok(Some((corpus.records, vectors.matrix)))
    }

    /// Persist one generation, overwriting the previous one.
    pub fn save(&self, records: &[CachedRecord], matrix: &FeatureMatrix) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        write_json(
            &self.corpus_path(),
            &CorpusArtifact {
                version: CACHE_FORMAT_VERSION,
                records: records.to_vec(),
            },
        )?;
        write_bincode(
            &self.vectors_path(),
            &VectorArtifact {
                version: CACHE_FORMAT_VERSION,
                matrix: matrix.clone(),
            },
        )?;

        debug!(
            dir = %self.dir.display(),
            records = records.len(),
            "saved vector cache generation"
        );
        Ok(())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SugerirError::Serialization(format!("{}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), value)
        .map_err(|e| SugerirError::Serialization(format!("{}: {e}", path.display())))
}

fn read_bincode<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    bincode::deserialize_from(BufReader::new(file))
        .map_err(|e| SugerirError::Serialization(format!("{}: {e}", path.display())))
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    bincode::serialize_into(BufWriter::new(file), value)
        .map_err(|e| SugerirError::Serialization(format!("{}: {e}", path.display())))
}
