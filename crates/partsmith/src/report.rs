//! Sprite export and extraction reports.

use crate::engine::{ExtractionMode, ExtractionResult};
use assets::{SpriteAsset, SpriteId};
use common::{Diagnostics, PartsmithResult, Tint, Vec2};
use compositor::tint_image;
use indexmap::IndexMap;
use scene::{CharacterPart, GraphStats, HierarchyNode, PartCategory};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, relative to the output directory, receiving sprite PNGs.
pub const SPRITES_DIR: &str = "sprites";
pub const EXTRACTION_DATA_FILE: &str = "extraction_data.json";
pub const SPRITE_DATA_FILE: &str = "sprite_data.json";
pub const HIERARCHY_FILE: &str = "hierarchy.txt";

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// One sprite known to an extraction run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpriteFile {
    pub name: String,
    /// Path relative to the output directory, once written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl SpriteFile {
    pub fn of(sprite: &SpriteAsset) -> Self {
        Self {
            name: sprite.name.clone(),
            file: None,
            width: sprite.width(),
            height: sprite.height(),
        }
    }
}

/// Sprites referenced by resolved parts, in part order.
pub fn collect_sprites(parts: &[CharacterPart]) -> IndexMap<SpriteId, SpriteFile> {
    let mut sprites = IndexMap::new();
    for sprite in parts.iter().filter_map(|part| part.sprite.as_deref()) {
        sprites
            .entry(sprite.id)
            .or_insert_with(|| SpriteFile::of(sprite));
    }
    sprites
}

/// Assigns collision-free file names under the sprites directory.
#[derive(Default)]
struct FileNamer {
    taken: HashSet<String>,
}

impl FileNamer {
    /// Start from the files already recorded in a sprite map.
    fn continuing(files: &IndexMap<SpriteId, SpriteFile>) -> Self {
        Self {
            taken: files.values().filter_map(|file| file.file.clone()).collect(),
        }
    }

    fn name(&mut self, sprite: &SpriteAsset) -> String {
        let base = sanitize_file_name(&sprite.name);
        let mut file = format!("{}/{}.png", SPRITES_DIR, base);
        let mut attempt = 1u32;

        while !self.taken.insert(file.clone()) {
            file = match attempt {
                1 => format!("{}/{}_{}.png", SPRITES_DIR, base, sprite.id),
                n => format!("{}/{}_{}_{}.png", SPRITES_DIR, base, sprite.id, n),
            };
            attempt += 1;
        }
        file
    }
}

/// Encode one sprite as PNG, tinted when a tint is given.
pub fn write_sprite(sprite: &SpriteAsset, tint: Option<Tint>, path: &Path) -> PartsmithResult<()> {
    match tint {
        Some(tint) => tint_image(sprite.image(), tint).save_with_format(path, image::ImageFormat::Png)?,
        None => sprite.image().save_with_format(path, image::ImageFormat::Png)?,
    }
    Ok(())
}

/// Write every resolved part sprite under `out_dir/sprites`.
///
/// Parts flagged `tint_corrected` get their renderer tint applied; other
/// sprites are written unchanged. A sprite shared by several parts is
/// written once, for the first part referencing it.
pub fn write_part_sprites(
    parts: &[CharacterPart],
    out_dir: &Path,
    sprites: &mut IndexMap<SpriteId, SpriteFile>,
) -> PartsmithResult<usize> {
    fs::create_dir_all(out_dir.join(SPRITES_DIR))?;

    let mut namer = FileNamer::continuing(sprites);
    let mut written = 0;

    for part in parts {
        let Some(sprite) = part.sprite.as_deref() else {
            continue;
        };
        let entry = sprites
            .entry(sprite.id)
            .or_insert_with(|| SpriteFile::of(sprite));
        if entry.file.is_some() {
            continue;
        }

        let file = namer.name(sprite);
        let tint = part.tint_corrected.then_some(part.tint);
        write_sprite(sprite, tint, &out_dir.join(&file))?;

        tracing::debug!("Wrote sprite '{}' to {}", sprite.name, file);
        entry.file = Some(file);
        written += 1;
    }

    Ok(written)
}

/// Write already loaded sprites unchanged under `out_dir/sprites`.
///
/// File names never collide with files already recorded in `files`.
pub fn write_raw_sprites<'a>(
    sprites: impl IntoIterator<Item = &'a SpriteAsset>,
    out_dir: &Path,
    files: &mut IndexMap<SpriteId, SpriteFile>,
) -> PartsmithResult<usize> {
    fs::create_dir_all(out_dir.join(SPRITES_DIR))?;

    let mut namer = FileNamer::continuing(files);
    let mut written = 0;

    for sprite in sprites {
        let file = namer.name(sprite);
        write_sprite(sprite, None, &out_dir.join(&file))?;

        files
            .entry(sprite.id)
            .or_insert_with(|| SpriteFile::of(sprite))
            .file = Some(file);
        written += 1;
    }

    Ok(written)
}

/// Flat per-part record of `sprite_data.json`.
#[derive(Debug, Serialize)]
pub struct PartEntry<'a> {
    pub name: &'a str,
    pub sprite_id: Option<SpriteId>,
    pub sprite_name: Option<&'a str>,
    pub sprite_path: Option<&'a str>,
    pub size: Option<[u32; 2]>,
    pub position: Vec2,
    pub sorting_order: i32,
    pub category: PartCategory,
    pub tint: Tint,
    pub tint_corrected: bool,
    pub active: bool,
    pub selected: bool,
}

impl<'a> PartEntry<'a> {
    pub fn new(part: &'a CharacterPart, sprites: &'a IndexMap<SpriteId, SpriteFile>) -> Self {
        let file = part.sprite_id.and_then(|id| sprites.get(&id));

        Self {
            name: &part.name,
            sprite_id: part.sprite_id,
            sprite_name: part.sprite.as_deref().map(|sprite| sprite.name.as_str()),
            sprite_path: file.and_then(|file| file.file.as_deref()),
            size: part
                .sprite
                .as_deref()
                .map(|sprite| [sprite.width(), sprite.height()]),
            position: part.position,
            sorting_order: part.sorting_order,
            category: part.category,
            tint: part.tint,
            tint_corrected: part.tint_corrected,
            active: part.active,
            selected: part.selected,
        }
    }
}

/// Contents of `extraction_data.json`.
#[derive(Debug, Serialize)]
pub struct ExtractionReport<'a> {
    pub version: &'static str,
    pub mode: ExtractionMode,
    pub stats: GraphStats,
    pub parts: Vec<PartEntry<'a>>,
    pub sprites: &'a IndexMap<SpriteId, SpriteFile>,
    pub hierarchy: &'a [HierarchyNode],
    pub diagnostics: &'a Diagnostics,
}

impl<'a> ExtractionReport<'a> {
    pub fn new(result: &'a ExtractionResult) -> Self {
        Self {
            version: crate::VERSION,
            mode: result.mode,
            stats: result.stats,
            parts: part_entries(result),
            sprites: &result.sprites,
            hierarchy: &result.hierarchy,
            diagnostics: &result.diagnostics,
        }
    }
}

fn part_entries(result: &ExtractionResult) -> Vec<PartEntry<'_>> {
    result
        .parts
        .iter()
        .map(|part| PartEntry::new(part, &result.sprites))
        .collect()
}

/// Indented text rendering of the hierarchy.
pub fn hierarchy_text(roots: &[HierarchyNode]) -> String {
    fn add_node(out: &mut String, node: &HierarchyNode) {
        let indent = "  ".repeat(node.depth as usize);
        let _ = write!(
            out,
            "{}├── {} (position: {:.1}, {:.1})",
            indent, node.name, node.position.x, node.position.y
        );
        if node.has_sprite {
            let _ = write!(out, " [Sprite Order: {}]", node.sorting_order);
        }
        out.push('\n');

        for child in &node.children {
            add_node(out, child);
        }
    }

    let mut out = String::from("=== Character Hierarchy ===\n\n");
    for (index, root) in roots.iter().enumerate() {
        let _ = writeln!(out, "Hierarchy {}:", index + 1);
        add_node(&mut out, root);
        out.push('\n');
    }
    out
}

/// Parts grouped by category, in category order.
pub fn parts_text(parts: &[CharacterPart]) -> String {
    let mut out = String::from("=== Character Parts ===\n");

    for category in PartCategory::ALL {
        let members: Vec<&CharacterPart> = parts
            .iter()
            .filter(|part| part.category == category)
            .collect();
        if members.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n{} ({}):", category, members.len());
        for part in members {
            let _ = write!(out, "  - {} [Sprite Order: {}]", part.name, part.sorting_order);
            match part.sprite.as_deref() {
                Some(sprite) => {
                    let _ = write!(out, " {}x{}", sprite.width(), sprite.height());
                }
                None => out.push_str(" (no sprite)"),
            }
            if part.tint_corrected {
                let _ = write!(out, " tint {}", part.tint);
            }
            out.push('\n');
        }
    }

    out
}

/// Write `extraction_data.json`, `sprite_data.json` and `hierarchy.txt`.
pub fn write_reports(result: &ExtractionResult, out_dir: &Path) -> PartsmithResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let extraction_path = out_dir.join(EXTRACTION_DATA_FILE);
    fs::write(
        &extraction_path,
        serde_json::to_string_pretty(&ExtractionReport::new(result))?,
    )?;

    let sprite_data_path = out_dir.join(SPRITE_DATA_FILE);
    fs::write(
        &sprite_data_path,
        serde_json::to_string_pretty(&part_entries(result))?,
    )?;

    let hierarchy_path = out_dir.join(HIERARCHY_FILE);
    fs::write(&hierarchy_path, hierarchy_text(&result.hierarchy))?;

    Ok(vec![extraction_path, sprite_data_path, hierarchy_path])
}
