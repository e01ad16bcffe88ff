//! Extraction engine - runs the reconstruction pipeline and writes its outputs.

use crate::config::ExtractorConfig;
use crate::report::{self, SpriteFile};
use assets::{AssetError, AssetSource, SpriteAsset, SpriteId};
use common::progress::{self, ProgressFn};
use common::{Diagnostic, Diagnostics, PartsmithResult};
use indexmap::IndexMap;
use scene::{assemble_hierarchy, resolve_parts, CharacterPart, GraphStats, HierarchyNode, ObjectGraph};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// What an extraction run produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Object graph, parts, hierarchy, sprites and reports.
    #[default]
    Character,
    /// Every sprite the source exposes, written unchanged. No graph.
    SpritesOnly,
}

impl ExtractionMode {
    /// File name keywords marking containers without a character rig.
    const SPRITE_KEYWORDS: &'static [&'static str] = &["creature", "monster", "enemy", "animal", "pet"];

    /// Pick a mode from a container path.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if Self::SPRITE_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
            ExtractionMode::SpritesOnly
        } else {
            ExtractionMode::Character
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Character => "character",
            ExtractionMode::SpritesOnly => "sprites_only",
        }
    }
}

/// Everything one run reconstructed.
#[derive(Clone, Debug, Default)]
pub struct ExtractionResult {
    pub mode: ExtractionMode,
    pub stats: GraphStats,
    pub parts: Vec<CharacterPart>,
    pub hierarchy: Vec<HierarchyNode>,
    /// Sprites seen by the run, with their output file once written.
    pub sprites: IndexMap<SpriteId, SpriteFile>,
    pub diagnostics: Diagnostics,
}

impl ExtractionResult {
    pub fn part(&self, name: &str) -> Option<&CharacterPart> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn sprite_count(&self) -> usize {
        self.parts.iter().filter(|part| part.has_sprite()).count()
    }
}

const STEP_GRAPH: &str = "Building object graph";
const STEP_PARTS: &str = "Resolving parts";
const STEP_HIERARCHY: &str = "Assembling hierarchy";
const STEP_SPRITES: &str = "Writing sprites";
const STEP_REPORTS: &str = "Writing reports";

/// Runs extraction against an asset source.
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create a new extractor.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    /// Get configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Reconstruct parts and hierarchy without touching the filesystem.
    pub fn analyze(&self, source: &dyn AssetSource, progress: Option<ProgressFn<'_>>) -> ExtractionResult {
        self.reconstruct(source, progress, 3).0
    }

    /// Returns the result together with the loaded sprites no part uses.
    fn reconstruct(
        &self,
        source: &dyn AssetSource,
        progress: Option<ProgressFn<'_>>,
        total: usize,
    ) -> (ExtractionResult, Vec<Arc<SpriteAsset>>) {
        let mut diagnostics = Diagnostics::new();

        let graph = ObjectGraph::build(source.records(), &mut diagnostics);
        progress::report(progress, 1, total, STEP_GRAPH);

        let parts = resolve_parts(
            &graph,
            source,
            self.config.compositor.tint_epsilon,
            &mut diagnostics,
        );
        progress::report(progress, 2, total, STEP_PARTS);

        let hierarchy = assemble_hierarchy(&graph, &mut diagnostics);
        progress::report(progress, 3, total, STEP_HIERARCHY);

        tracing::info!(
            "Reconstructed {} parts ({} with sprites) and {} hierarchy roots",
            parts.len(),
            parts.iter().filter(|part| part.has_sprite()).count(),
            hierarchy.len()
        );

        let mut result = ExtractionResult {
            mode: ExtractionMode::Character,
            stats: graph.stats(),
            sprites: report::collect_sprites(&parts),
            parts,
            hierarchy,
            diagnostics,
        };
        let unused = load_unreferenced(source, &mut result);
        (result, unused)
    }

    /// Full character extraction: reconstruct, then write sprites and
    /// reports under the configured output directory.
    pub fn extract(&self, source: &dyn AssetSource, progress: Option<ProgressFn<'_>>) -> PartsmithResult<ExtractionResult> {
        let out_dir = self.config.output_dir.as_path();
        let (mut result, unused) = self.reconstruct(source, progress, 5);

        if self.config.write_sprites {
            let mut written = report::write_part_sprites(&result.parts, out_dir, &mut result.sprites)?;
            written += report::write_raw_sprites(unused.iter().map(Arc::as_ref), out_dir, &mut result.sprites)?;
            tracing::info!("Wrote {} sprites to {}", written, out_dir.join(report::SPRITES_DIR).display());
        }
        progress::report(progress, 4, 5, STEP_SPRITES);

        if self.config.write_reports {
            report::write_reports(&result, out_dir)?;
            tracing::info!("Wrote reports to {}", out_dir.display());
        }
        progress::report(progress, 5, 5, STEP_REPORTS);

        Ok(result)
    }

    /// Export every sprite the source lists, without reading any records.
    ///
    /// Sprites that fail to load are reported and skipped.
    pub fn extract_sprites_only(
        &self,
        source: &dyn AssetSource,
        progress: Option<ProgressFn<'_>>,
    ) -> PartsmithResult<ExtractionResult> {
        let out_dir = self.config.output_dir.as_path();
        let ids = source.sprite_ids();
        let total = ids.len() + 1;

        let mut result = ExtractionResult {
            mode: ExtractionMode::SpritesOnly,
            ..ExtractionResult::default()
        };
        let mut loaded: Vec<Arc<SpriteAsset>> = Vec::with_capacity(ids.len());

        for (index, id) in ids.into_iter().enumerate() {
            match source.sprite(id) {
                Ok(sprite) => {
                    result.sprites.insert(id, SpriteFile::of(&sprite));
                    loaded.push(sprite);
                }
                Err(err) => result.diagnostics.push(load_failure(id, err)),
            }
            progress::report(progress, index + 1, total, "Loading sprites");
        }

        if self.config.write_sprites {
            let written = report::write_raw_sprites(loaded.iter().map(Arc::as_ref), out_dir, &mut result.sprites)?;
            tracing::info!("Wrote {} sprites to {}", written, out_dir.join(report::SPRITES_DIR).display());
        }
        if self.config.write_reports {
            report::write_reports(&result, out_dir)?;
        }
        progress::report(progress, total, total, STEP_SPRITES);

        Ok(result)
    }

    /// Run in the given mode.
    pub fn run(
        &self,
        source: &dyn AssetSource,
        mode: ExtractionMode,
        progress: Option<ProgressFn<'_>>,
    ) -> PartsmithResult<ExtractionResult> {
        tracing::info!("Extracting in {} mode", mode.as_str());
        match mode {
            ExtractionMode::Character => self.extract(source, progress),
            ExtractionMode::SpritesOnly => self.extract_sprites_only(source, progress),
        }
    }
}

/// Load every source sprite no resolved part references, recording it in
/// the sprite map. Failures become diagnostics.
fn load_unreferenced(source: &dyn AssetSource, result: &mut ExtractionResult) -> Vec<Arc<SpriteAsset>> {
    let mut unused = Vec::new();

    for id in source.sprite_ids() {
        if result.sprites.contains_key(&id) {
            continue;
        }
        match source.sprite(id) {
            Ok(sprite) => {
                result.sprites.insert(id, SpriteFile::of(&sprite));
                unused.push(sprite);
            }
            Err(err) => result.diagnostics.push(load_failure(id, err)),
        }
    }

    if !unused.is_empty() {
        tracing::debug!("{} sprites are not used by any part", unused.len());
    }
    unused
}

fn load_failure(id: SpriteId, err: AssetError) -> Diagnostic {
    Diagnostic::AssetLoadFailure {
        sprite_id: id.get(),
        part: format!("sprite {}", id),
        reason: err.to_string(),
    }
}
