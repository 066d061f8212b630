//! Per-problem JSON caches.
//!
//! Parses and quantity sets are stored as `<dir>/<id>.json`, so later
//! pipeline steps never call the NLP service again.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use eqrank_core::{ParseResult, QuantitySet};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ensure_parent, DataError, Result};

/// Directory of `<id>.json` files holding values of type `T`.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

/// Cached sentence parses.
pub type ParseStore = JsonStore<ParseResult>;

/// Cached quantity sets.
pub type QuantityStore = JsonStore<QuantitySet>;

impl<T: Serialize + DeserializeOwned> JsonStore<T> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _marker: PhantomData,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, id: usize) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn contains(&self, id: usize) -> bool {
        self.path(id).is_file()
    }

    /// Writes the value of problem `id`, replacing any previous one.
    pub fn store(&self, id: usize, value: &T) -> Result<()> {
        let path = self.path(id);
        ensure_parent(&path)?;
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(writer, value)?;
        Ok(())
    }

    /// Reads the value of problem `id`.
    pub fn load(&self, id: usize) -> Result<T> {
        let path = self.path(id);
        let file = File::open(&path).map_err(|source| DataError::File { path, source })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
