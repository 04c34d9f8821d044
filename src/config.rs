use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

/// Attribute lists requested per screen, keyed by dotted path
/// (e.g. `cart.games`).
#[derive(Debug, Clone)]
pub struct AttributePresets {
    root: Value,
}

impl Default for AttributePresets {
    fn default() -> Self {
        Self {
            root: json!({
                "cart": {
                    "games": ["id", "name", "price", "screenshots"]
                },
                "store": {
                    "grid": ["id", "name", "price", "screenshots"],
                    "search": ["id", "name", "price"],
                    "game": ["id", "name", "description", "price", "developer",
                             "releaseDate", "tags", "screenshots", "owned", "inCart"]
                },
                "friends": {
                    "requests": ["id", "username", "avatar"],
                    "list": ["id", "username", "avatar", "online"]
                },
                "notifications": {
                    "user": ["id", "username", "avatar"]
                },
                "orders": {
                    "list": ["id", "type", "createdAt", "items", "total", "tokenAmount"]
                }
            }),
        }
    }
}

impl AttributePresets {
    /// Parses presets from a JSON document
    pub fn from_json(document: &str) -> Result<Self, AppError> {
        let root: Value = serde_json::from_str(document)
            .map_err(|e| AppError::Configuration(format!("Invalid attribute presets: {}", e)))?;
        Ok(Self { root })
    }

    /// Resolves `path` to a list of attribute names, falling back to `default`
    /// when the path is missing or does not hold a list of strings
    pub fn get(&self, path: &str, default: &[&str]) -> Vec<String> {
        let resolved = path
            .split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
            .and_then(Value::as_array)
            .and_then(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            });

        match resolved {
            Some(attributes) => attributes,
            None => {
                debug!(path = %path, "No attribute preset, using default");
                default.iter().map(|name| name.to_string()).collect()
            }
        }
    }
}

/// Client configuration read from the environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Page size for order listings
    pub page_size: u32,
    /// Buffered push events per listener before it starts lagging
    pub push_capacity: usize,
    pub presets: AttributePresets,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            push_capacity: 100,
            presets: AttributePresets::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `STOREFRONT_PAGE_SIZE`, `STOREFRONT_PUSH_CAPACITY` and
    /// `STOREFRONT_ATTRIBUTE_PRESETS` (path to a JSON file), with defaults
    #[instrument]
    pub fn new() -> Result<Self, AppError> {
        let defaults = Self::default();

        let page_size = std::env::var("STOREFRONT_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.page_size);

        let push_capacity = std::env::var("STOREFRONT_PUSH_CAPACITY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|capacity| *capacity > 0)
            .unwrap_or(defaults.push_capacity);

        let presets = match std::env::var("STOREFRONT_ATTRIBUTE_PRESETS") {
            Ok(path) => Self::load_presets(Path::new(&path))?,
            Err(_) => defaults.presets,
        };

        debug!(page_size, push_capacity, "Client configuration loaded");

        Ok(Self {
            page_size,
            push_capacity,
            presets,
        })
    }

    fn load_presets(path: &Path) -> Result<AttributePresets, AppError> {
        let document = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read attribute presets");
            AppError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        AttributePresets::from_json(&document)
    }
}
