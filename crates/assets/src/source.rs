//! Asset sources.

use crate::error::{AssetError, AssetResult};
use crate::ids::SpriteId;
use crate::record::RawRecord;
use crate::sprite::SpriteAsset;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Anything that can hand over raw records and decoded sprites.
///
/// Implementations must be shareable across threads: part resolution and
/// sprite preparation fan out over a thread pool.
pub trait AssetSource: Send + Sync {
    /// Every raw record, in source order.
    fn records(&self) -> &[RawRecord];

    /// Look up and decode a sprite.
    fn sprite(&self, id: SpriteId) -> AssetResult<Arc<SpriteAsset>>;

    /// Ids of every sprite the source exposes, in source order.
    fn sprite_ids(&self) -> Vec<SpriteId>;
}

/// Source holding everything in memory.
#[derive(Default)]
pub struct MemorySource {
    records: Vec<RawRecord>,
    sprites: HashMap<SpriteId, Arc<SpriteAsset>>,
    sprite_order: Vec<SpriteId>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = RawRecord>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn push_record(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    /// Add a sprite, replacing any earlier sprite with the same id.
    pub fn insert_sprite(&mut self, sprite: SpriteAsset) {
        let id = sprite.id;
        if self.sprites.insert(id, Arc::new(sprite)).is_none() {
            self.sprite_order.push(id);
        }
    }

    pub fn with_sprite(mut self, sprite: SpriteAsset) -> Self {
        self.insert_sprite(sprite);
        self
    }
}

impl AssetSource for MemorySource {
    fn records(&self) -> &[RawRecord] {
        &self.records
    }

    fn sprite(&self, id: SpriteId) -> AssetResult<Arc<SpriteAsset>> {
        self.sprites
            .get(&id)
            .cloned()
            .ok_or(AssetError::MissingSprite(id))
    }

    fn sprite_ids(&self) -> Vec<SpriteId> {
        self.sprite_order.clone()
    }
}

/// One sprite listed in a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub id: SpriteId,
    pub name: String,
    /// Image file, relative to the manifest directory.
    pub file: PathBuf,
}

/// On-disk description of an unpacked asset container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub sprites: Vec<SpriteEntry>,
}

/// Source backed by a directory holding `manifest.json` and sprite images.
///
/// Sprites are decoded on first use and cached.
pub struct DirectorySource {
    root: PathBuf,
    manifest: Manifest,
    entries: HashMap<SpriteId, usize>,
    cache: RwLock<HashMap<SpriteId, Arc<SpriteAsset>>>,
}

impl DirectorySource {
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    /// Open a manifest file, or a directory containing `manifest.json`.
    pub fn open(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        let manifest_path = if path.is_dir() {
            path.join(Self::MANIFEST_FILE)
        } else {
            path.to_path_buf()
        };

        let bytes = fs::read(&manifest_path).map_err(|source| AssetError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: Manifest = serde_json::from_slice(&bytes)?;

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        tracing::debug!(
            "Opened manifest {} ({} records, {} sprites)",
            manifest_path.display(),
            manifest.records.len(),
            manifest.sprites.len()
        );

        Ok(Self::from_manifest(root, manifest))
    }

    /// Build from an already parsed manifest whose sprite paths are
    /// relative to `root`.
    pub fn from_manifest(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        let entries = manifest
            .sprites
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.id, index))
            .collect();

        Self {
            root: root.into(),
            manifest,
            entries,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn load(&self, entry: &SpriteEntry) -> AssetResult<SpriteAsset> {
        let path = self.root.join(&entry.file);
        let bytes = fs::read(&path).map_err(|source| AssetError::Io { path, source })?;
        SpriteAsset::decode(entry.id, entry.name.clone(), &bytes)
    }
}

impl AssetSource for DirectorySource {
    fn records(&self) -> &[RawRecord] {
        &self.manifest.records
    }

    fn sprite(&self, id: SpriteId) -> AssetResult<Arc<SpriteAsset>> {
        if let Some(sprite) = self.cache.read().get(&id) {
            return Ok(sprite.clone());
        }

        let index = *self.entries.get(&id).ok_or(AssetError::MissingSprite(id))?;
        let sprite = Arc::new(self.load(&self.manifest.sprites[index])?);

        self.cache.write().insert(id, sprite.clone());
        Ok(sprite)
    }

    fn sprite_ids(&self) -> Vec<SpriteId> {
        self.manifest.sprites.iter().map(|entry| entry.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use serde_json::json;

    fn write_fixture(dir: &Path) {
        RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255]))
            .save(dir.join("body.png"))
            .unwrap();
        fs::write(dir.join("broken.png"), b"garbage").unwrap();

        let manifest = json!({
            "records": [
                {"id": 1, "type": "GameObject", "data": {"name": "Body"}},
                {"id": 2, "type": "Transform", "data": {"owner": 1}}
            ],
            "sprites": [
                {"id": 10, "name": "body", "file": "body.png"},
                {"id": 11, "name": "broken", "file": "broken.png"},
                {"id": 12, "name": "missing", "file": "missing.png"}
            ]
        });
        fs::write(dir.join("manifest.json"), manifest.to_string()).unwrap();
    }

    #[test]
    fn test_memory_source() {
        let sprite = SpriteAsset::from_rgba(SpriteId(3), "eye", 1, 1, vec![0, 0, 0, 255]).unwrap();
        let source = MemorySource::new()
            .with_records([RawRecord::new(1, "object", json!({}))])
            .with_sprite(sprite);

        assert_eq!(source.records().len(), 1);
        assert_eq!(source.sprite_ids(), vec![SpriteId(3)]);
        assert_eq!(source.sprite(SpriteId(3)).unwrap().name, "eye");
        assert!(matches!(
            source.sprite(SpriteId(4)),
            Err(AssetError::MissingSprite(SpriteId(4)))
        ));
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let source = DirectorySource::open(dir.path()).unwrap();
        assert_eq!(source.records().len(), 2);
        assert_eq!(source.sprite_ids(), vec![SpriteId(10), SpriteId(11), SpriteId(12)]);

        let body = source.sprite(SpriteId(10)).unwrap();
        assert_eq!((body.width(), body.height()), (4, 2));
        let again = source.sprite(SpriteId(10)).unwrap();
        assert!(Arc::ptr_eq(&body, &again));

        assert!(matches!(source.sprite(SpriteId(11)), Err(AssetError::Decode(_))));
        assert!(matches!(source.sprite(SpriteId(12)), Err(AssetError::Io { .. })));
        assert!(matches!(source.sprite(SpriteId(13)), Err(AssetError::MissingSprite(_))));
    }

    #[test]
    fn test_open_manifest_file_directly() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let source = DirectorySource::open(dir.path().join("manifest.json")).unwrap();
        assert_eq!(source.root(), dir.path());
        assert!(source.sprite(SpriteId(10)).is_ok());
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DirectorySource::open(dir.path()),
            Err(AssetError::Io { .. })
        ));

        fs::write(dir.path().join("manifest.json"), "{not json").unwrap();
        assert!(matches!(
            DirectorySource::open(dir.path()),
            Err(AssetError::Manifest(_))
        ));
    }
}
