//! Asset management system
//!
//! Manifest-driven resolution of named assets. Gameplay code asks for assets
//! by logical name; the manifest maps names to files under the configured
//! search paths. A name missing from the manifest is a hard error: a mesh the
//! game explicitly requested not existing is a data bug, not a recoverable
//! runtime condition.

mod static_mesh;

pub use static_mesh::StaticMesh;

use crate::foundation::collections::{HandleMap, TypedHandle};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Asset handle type
pub type AssetHandle<T> = TypedHandle<T>;

/// Errors produced by the asset system
#[derive(Debug, Error)]
pub enum AssetError {
    /// The requested name is absent from the manifest
    #[error("asset not found in manifest: {0}")]
    NotFound(String),

    /// Manifest file could not be read or parsed
    #[error("asset manifest error: {0}")]
    Manifest(String),

    /// Asset file IO failure
    #[error("asset IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset bytes could not be parsed
    #[error("asset load failed: {0}")]
    LoadFailed(String),
}

/// Types loadable through the asset manager
pub trait Asset: Sized + 'static {
    /// Parse an asset from raw file bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError>;
}

/// Maps logical asset names to file paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// name -> path relative to a search path
    pub entries: HashMap<String, String>,
}

impl AssetManifest {
    /// Load a manifest from a RON file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let contents = std::fs::read_to_string(path)?;
        ron::from_str(&contents).map_err(|e| AssetError::Manifest(e.to_string()))
    }
}

/// Asset system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Path to the asset manifest file
    pub manifest_path: Option<PathBuf>,

    /// Asset search paths, tried in order
    pub search_paths: Vec<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            search_paths: vec![PathBuf::from("resources")],
        }
    }
}

/// Asset management system
///
/// Caches loaded assets per concrete type in handle maps, so repeated loads
/// of the same name return the same handle.
pub struct AssetManager {
    manifest: AssetManifest,
    search_paths: Vec<PathBuf>,
    asset_storages: HashMap<TypeId, Box<dyn Any>>,
    loaded: HashMap<(TypeId, String), slotmap::DefaultKey>,
}

impl AssetManager {
    /// Create a new asset manager from configuration
    ///
    /// A missing manifest path yields an empty manifest (every lookup fails
    /// with `NotFound`); a manifest path that fails to read or parse is an
    /// error.
    pub fn new(config: &AssetConfig) -> Result<Self, AssetError> {
        let manifest = match &config.manifest_path {
            Some(path) => AssetManifest::load(path)?,
            None => AssetManifest::default(),
        };
        log::info!("Asset manifest loaded with {} entries", manifest.entries.len());
        Ok(Self {
            manifest,
            search_paths: config.search_paths.clone(),
            asset_storages: HashMap::new(),
            loaded: HashMap::new(),
        })
    }

    /// Create an asset manager around an already-built manifest
    pub fn with_manifest(manifest: AssetManifest, search_paths: Vec<PathBuf>) -> Self {
        Self {
            manifest,
            search_paths,
            asset_storages: HashMap::new(),
            loaded: HashMap::new(),
        }
    }

    /// Register a pre-built asset under a logical name
    ///
    /// Used by tests and tools to bypass disk entirely.
    pub fn insert<T: Asset>(&mut self, name: &str, asset: T) -> AssetHandle<T> {
        let key = self.storage_mut::<T>().insert(asset);
        self.loaded
            .insert((TypeId::of::<T>(), name.to_string()), key);
        AssetHandle::new(key)
    }

    /// Resolve a named asset, loading it from disk on first use
    ///
    /// # Errors
    ///
    /// `NotFound` when the name is absent from the manifest. This propagates
    /// to the caller: a missing named asset is a misconfiguration that should
    /// stop execution loudly during development.
    pub fn load<T: Asset>(&mut self, name: &str) -> Result<AssetHandle<T>, AssetError> {
        let cache_key = (TypeId::of::<T>(), name.to_string());
        if let Some(&key) = self.loaded.get(&cache_key) {
            return Ok(AssetHandle::new(key));
        }

        let relative = self
            .manifest
            .entries
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?
            .clone();

        let path = self.resolve_path(&relative)?;
        let bytes = std::fs::read(&path)?;
        let asset = T::from_bytes(&bytes)?;

        let key = self.storage_mut::<T>().insert(asset);
        self.loaded.insert(cache_key, key);
        log::debug!("Loaded asset '{}' from {}", name, path.display());
        Ok(AssetHandle::new(key))
    }

    /// Borrow a previously loaded asset
    pub fn get<T: Asset>(&self, handle: AssetHandle<T>) -> Option<&T> {
        self.asset_storages
            .get(&TypeId::of::<T>())?
            .downcast_ref::<HandleMap<T>>()?
            .get(handle.key())
    }

    fn storage_mut<T: Asset>(&mut self) -> &mut HandleMap<T> {
        let storage = self
            .asset_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HandleMap::<T>::default()));
        // The entry is keyed by T's TypeId, so the downcast cannot fail.
        storage
            .downcast_mut::<HandleMap<T>>()
            .unwrap_or_else(|| unreachable!("asset storage type mismatch"))
    }

    fn resolve_path(&self, relative: &str) -> Result<PathBuf, AssetError> {
        for search_path in &self.search_paths {
            let candidate = search_path.join(relative);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        // Fall back to the raw path for absolute entries.
        let raw = PathBuf::from(relative);
        if raw.exists() {
            return Ok(raw);
        }
        Err(AssetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("asset file not found on any search path: {relative}"),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manifest() -> AssetManager {
        AssetManager::with_manifest(AssetManifest::default(), Vec::new())
    }

    #[test]
    fn test_missing_name_is_a_hard_error() {
        let mut assets = test_manifest();
        let result = assets.load::<StaticMesh>("NoSuchMesh");
        assert!(matches!(result, Err(AssetError::NotFound(name)) if name == "NoSuchMesh"));
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let mut assets = test_manifest();
        let mesh = StaticMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        };
        let handle = assets.insert("Tri", mesh);
        let stored = assets.get(handle).expect("asset should exist");
        assert_eq!(stored.indices, vec![0, 1, 2]);

        // The logical name now resolves without touching disk.
        let again = assets.load::<StaticMesh>("Tri").expect("cached load");
        assert_eq!(again, handle);
    }
}
