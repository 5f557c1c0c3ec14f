//! Store configuration.
//!
//! A `StoreConfig` is fixed when a store is opened: the key codec and the
//! index registry derived from it never change afterwards.
//!
//! # Environment Variables
//!
//! - `QUADSTORE_DEFAULT_GRAPH`: graph used for quads without one (default: `DEFAULT_GRAPH`)
//! - `QUADSTORE_INDEXES`: comma-separated index names, e.g. `SPOG,OGSP`
//!   (default: the six default indexes)
//! - `QUADSTORE_STREAM_BATCH_SIZE`: quads per batch when draining streams (default: `1`)
//!
//! # Invariants
//!
//! - After `validate()` succeeds, the separator's first character sorts
//!   strictly before the boundary's first character, neither sentinel contains
//!   the other, and the default graph is encodable between them.
//! - At least one index is configured and no two indexes share a slot order.

use crate::codec::{DEFAULT_BOUNDARY, DEFAULT_SEPARATOR, KeyCodec};
use crate::index::{DEFAULT_INDEXES, Index, IndexError, IndexRegistry};
use crate::types::Term;

/// Configuration of a quad store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Graph stored for quads whose graph term is empty.
    pub default_graph: Term,
    /// Sequence appended after every key component.
    pub separator: String,
    /// Sequence sorting after every legal term, used as a range fence.
    pub boundary: String,
    /// Indexes in registration order.
    pub indexes: Vec<Index>,
    /// Quads written per batch by `put_stream`/`del_stream` when the caller
    /// does not pick a batch size.
    pub stream_batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_graph: Term::from(Self::DEFAULT_GRAPH),
            separator: DEFAULT_SEPARATOR.to_owned(),
            boundary: DEFAULT_BOUNDARY.to_owned(),
            indexes: default_indexes(),
            stream_batch_size: Self::DEFAULT_STREAM_BATCH_SIZE,
        }
    }
}

impl StoreConfig {
    /// Default graph identifier.
    pub const DEFAULT_GRAPH: &'static str = "DEFAULT_GRAPH";
    /// Default stream batch size: drain one quad at a time.
    pub const DEFAULT_STREAM_BATCH_SIZE: usize = 1;

    /// Set the default graph.
    #[must_use]
    pub fn default_graph(mut self, graph: impl Into<Term>) -> Self {
        self.default_graph = graph.into();
        self
    }

    /// Set the key sentinels.
    #[must_use]
    pub fn sentinels(mut self, separator: impl Into<String>, boundary: impl Into<String>) -> Self {
        self.separator = separator.into();
        self.boundary = boundary.into();
        self
    }

    /// Replace the index set.
    #[must_use]
    pub fn indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    /// Set the stream batch size.
    #[must_use]
    pub const fn stream_batch_size(mut self, size: usize) -> Self {
        self.stream_batch_size = size;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value, or if the
    /// resulting configuration does not pass `validate()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(graph) = lookup("QUADSTORE_DEFAULT_GRAPH") {
            config.default_graph = Self::parse_default_graph(&graph)?;
        }
        if let Some(indexes) = lookup("QUADSTORE_INDEXES") {
            config.indexes = Self::parse_indexes(&indexes)?;
        }
        if let Some(size) = lookup("QUADSTORE_STREAM_BATCH_SIZE") {
            config.stream_batch_size = Self::parse_batch_size(&size)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn parse_default_graph(value: &str) -> Result<Term, ConfigError> {
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "QUADSTORE_DEFAULT_GRAPH".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(Term::from(value))
    }

    fn parse_indexes(value: &str) -> Result<Vec<Index>, ConfigError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Index::from_name(name).map_err(ConfigError::Index))
            .collect()
    }

    fn parse_batch_size(value: &str) -> Result<usize, ConfigError> {
        match value.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::InvalidValue {
                name: "QUADSTORE_STREAM_BATCH_SIZE".to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a sentinel is empty, the separator's first character does not sort
    ///   before the boundary's, or one sentinel contains the other
    /// - the default graph is empty or cannot be encoded between the sentinels
    /// - no index is configured, or two indexes share a slot order
    /// - the stream batch size is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() || self.boundary.is_empty() {
            return Err(invalid("sentinels", "separator and boundary must not be empty"));
        }
        if self.separator.chars().next() >= self.boundary.chars().next() {
            return Err(invalid(
                "sentinels",
                "separator must start with a character sorting before the boundary's",
            ));
        }
        if self.separator.contains(self.boundary.as_str())
            || self.boundary.contains(self.separator.as_str())
        {
            return Err(invalid("sentinels", "separator and boundary must not overlap"));
        }
        if self.default_graph.is_empty() {
            return Err(invalid("default_graph", "must not be empty"));
        }
        self.key_codec()
            .validate_term(crate::types::TermName::Graph, &self.default_graph)
            .map_err(|e| invalid("default_graph", &e.to_string()))?;
        if self.stream_batch_size == 0 {
            return Err(invalid("stream_batch_size", "must be at least 1"));
        }
        self.index_registry()?;
        Ok(())
    }

    /// The key codec for these sentinels.
    #[must_use]
    pub fn key_codec(&self) -> KeyCodec {
        KeyCodec::new(self.separator.clone(), self.boundary.clone())
    }

    /// Build the index registry, in configured order.
    ///
    /// # Errors
    ///
    /// Returns an error if no index is configured or an index is duplicated.
    pub fn index_registry(&self) -> Result<IndexRegistry, ConfigError> {
        if self.indexes.is_empty() {
            return Err(invalid("indexes", "at least one index is required"));
        }
        let mut registry = IndexRegistry::new();
        for index in &self.indexes {
            registry.add_index(index.terms()).map_err(ConfigError::Index)?;
        }
        Ok(registry)
    }
}

fn invalid(name: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.to_string(),
    }
}

/// The six default indexes, as a config value.
#[must_use]
pub fn default_indexes() -> Vec<Index> {
    DEFAULT_INDEXES
        .iter()
        .filter_map(|terms| Index::new(terms).ok())
        .collect()
}

/// Error returned when loading or validating configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting has an invalid value.
    InvalidValue { name: String, message: String },
    /// An index definition is invalid.
    Index(IndexError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
            Self::Index(e) => write!(f, "invalid index: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Index(e) => Some(e),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<IndexError> for ConfigError {
    fn from(e: IndexError) -> Self {
        Self::Index(e)
    }
}
