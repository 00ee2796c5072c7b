use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::OnceLock,
};

use crate::models::{Game, RawRecord};

/// Errors raised while reading the catalog data source
///
/// These never leave the store: a failed load is logged and the catalog stays empty.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw catalog records
///
/// The store calls `read_records` at most once; implementations
/// do not need their own caching.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// Reads every raw record in source order
    fn read_records(&self) -> Result<Vec<RawRecord>, CatalogError>;

    /// Human-readable description of the source for logging
    fn describe(&self) -> String;
}

/// Reads the pre-built JSON catalog (an array of raw records) from disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn read_records(&self) -> Result<Vec<RawRecord>, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loaded catalog contents plus the id index built alongside them
#[derive(Debug)]
struct Catalog {
    games: Vec<Game>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    fn build(records: Vec<RawRecord>) -> Self {
        let games: Vec<Game> = records
            .into_iter()
            .filter(RawRecord::is_app)
            .zip(1u32..)
            .map(|(record, id)| Game::from_raw(id, record))
            .collect();

        let index = games
            .iter()
            .enumerate()
            .map(|(position, game)| (game.id, position))
            .collect();

        Self { games, index }
    }
}

/// In-memory game catalog, loaded once and read-only afterwards
///
/// Ids are dense and 1-based in source order. Records without the `app` type tag
/// never enter the catalog.
pub struct CatalogStore {
    source: Box<dyn CatalogSource>,
    /// `Some(None)` once a load has been attempted and failed
    catalog: OnceLock<Option<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            catalog: OnceLock::new(),
        }
    }

    /// Populates the catalog from the source if no load has been attempted yet
    ///
    /// Concurrent first calls read the source once; every caller observes the same
    /// outcome afterwards. A failed read is logged once and leaves the store empty
    /// for the life of the process.
    pub fn load(&self) {
        self.catalog.get_or_init(|| self.read_catalog());
    }

    fn read_catalog(&self) -> Option<Catalog> {
        let source = self.source.describe();
        match self.source.read_records() {
            Ok(records) => {
                let record_count = records.len();
                let catalog = Catalog::build(records);

                tracing::info!(
                    source = %source,
                    records = record_count,
                    games = catalog.games.len(),
                    "Catalog loaded"
                );

                Some(catalog)
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Failed to load catalog, serving empty catalog");
                None
            }
        }
    }

    /// True once `load` has run, whether or not it succeeded
    pub fn load_attempted(&self) -> bool {
        self.catalog.get().is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    fn loaded(&self) -> Option<&Catalog> {
        self.catalog.get().and_then(Option::as_ref)
    }

    /// All games in catalog order; empty unless a load succeeded
    pub fn games(&self) -> &[Game] {
        self.loaded().map(|c| c.games.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.games().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games().is_empty()
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Game> {
        let catalog = self.loaded()?;
        catalog.index.get(&id).map(|&position| &catalog.games[position])
    }

    /// Games whose id is in `ids`, in catalog order rather than request order
    pub fn get_by_ids(&self, ids: &[u32]) -> Vec<&Game> {
        if ids.is_empty() {
            return Vec::new();
        }

        let wanted: HashSet<u32> = ids.iter().copied().collect();
        self.games()
            .iter()
            .filter(|game| wanted.contains(&game.id))
            .collect()
    }
}
