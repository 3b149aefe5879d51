use registry_common::error::DataUnavailableError;
use registry_model::Entity;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The loaded entity collection. Cheap to clone and shared read-only by all searches.
pub type EntityGraph = Arc<[Arc<Entity>]>;

/// Type label fragments of the entities that are kept when loading the graph.
pub const DEFAULT_TYPE_MARKERS: [&str; 2] = ["DataService", "Catalog"];

/// Where the entity document is read from.
#[derive(Clone, Debug)]
pub enum EntitySource {
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document held in memory.
    Json(Arc<str>),
}

/// Holds the entity collection that is searched.
///
/// The collection is loaded lazily on first access and memoized for the lifetime of the store.
/// Concurrent first accesses are serialized, so the source is read at most once. A failed load is
/// not memoized; the next access tries again.
///
/// The store is meant to be created once at startup and handed to the search backends behind an
/// [Arc].
#[derive(Debug)]
pub struct EntityGraphStore {
    source: EntitySource,
    /// `None` disables the type-based filter.
    type_markers: Option<Vec<String>>,
    graph: OnceCell<EntityGraph>,
}

impl EntityGraphStore {
    /// Creates a store that keeps entities matching [DEFAULT_TYPE_MARKERS].
    pub fn new(source: EntitySource) -> Self {
        Self {
            source,
            type_markers: Some(Vec::from(DEFAULT_TYPE_MARKERS.map(str::to_owned))),
            graph: OnceCell::new(),
        }
    }

    /// Creates a store reading the document at `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(EntitySource::File(path.into()))
    }

    /// Creates a store over an in-memory JSON document.
    pub fn from_json(document: impl Into<Arc<str>>) -> Self {
        Self::new(EntitySource::Json(document.into()))
    }

    /// Only keeps entities with a type label containing one of `markers`.
    #[must_use]
    pub fn with_type_markers(mut self, markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.type_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Keeps every entity of the document.
    #[must_use]
    pub fn without_type_filter(mut self) -> Self {
        self.type_markers = None;
        self
    }

    /// Returns the source of this store.
    pub fn source(&self) -> &EntitySource {
        &self.source
    }

    /// Returns whether the collection has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.graph.initialized()
    }

    /// Returns the entity collection, loading it on first access.
    pub async fn entities(&self) -> Result<EntityGraph, DataUnavailableError> {
        self.graph.get_or_try_init(|| self.load()).await.cloned()
    }

    async fn load(&self) -> Result<EntityGraph, DataUnavailableError> {
        let document = match &self.source {
            EntitySource::File(path) => Cow::Owned(
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|error| DataUnavailableError::Io {
                        path: path.clone(),
                        error,
                    })?,
            ),
            EntitySource::Json(document) => Cow::Borrowed(document.as_ref()),
        };

        let entities = parse_entity_document(&document)?;
        let total = entities.len();
        let graph = entities
            .into_iter()
            .filter(|entity| self.is_relevant(entity))
            .map(Arc::new)
            .collect::<EntityGraph>();

        tracing::info!(total, retained = graph.len(), "Loaded entity graph");
        Ok(graph)
    }

    fn is_relevant(&self, entity: &Entity) -> bool {
        match &self.type_markers {
            None => true,
            Some(markers) => entity.has_type_marker(markers),
        }
    }
}

#[derive(Deserialize)]
struct EntityDocument {
    #[serde(rename = "@graph")]
    graph: Option<serde_json::Value>,
}

/// Parses a JSON-LD style document with a top-level `@graph` array of entity records.
///
/// Fails as a whole if any record is malformed.
pub(crate) fn parse_entity_document(document: &str) -> Result<Vec<Entity>, DataUnavailableError> {
    let document: EntityDocument = serde_json::from_str(document)?;
    match document.graph {
        Some(graph @ serde_json::Value::Array(_)) => Ok(serde_json::from_value(graph)?),
        _ => Err(DataUnavailableError::MissingGraph),
    }
}
