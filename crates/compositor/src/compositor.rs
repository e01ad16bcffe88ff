//! Depth-sorted compositor.

use crate::buffer::PixelBuffer;
use crate::canvas::canvas_size;
use crate::layer::Layer;
use crate::settings::CompositorSettings;
use common::progress::{self, ProgressFn};
use common::{CanvasSize, Diagnostic, Diagnostics, Tint};
use rayon::prelude::*;
use scene::CharacterPart;
use std::collections::{HashMap, HashSet};

/// Inputs of one render call.
#[derive(Clone, Debug)]
pub struct CompositeRequest<'a> {
    pub parts: &'a [CharacterPart],
    pub selected: HashSet<String>,
    /// Replaces a part's sorting order when present.
    pub depth_overrides: HashMap<String, i32>,
    /// Replaces a part's renderer tint when present.
    pub tint_overrides: HashMap<String, Tint>,
}

impl<'a> CompositeRequest<'a> {
    /// A request with nothing selected.
    pub fn new(parts: &'a [CharacterPart]) -> Self {
        Self {
            parts,
            selected: HashSet::new(),
            depth_overrides: HashMap::new(),
            tint_overrides: HashMap::new(),
        }
    }

    /// A request selecting every part.
    pub fn select_all(parts: &'a [CharacterPart]) -> Self {
        let mut request = Self::new(parts);
        request.selected = parts.iter().map(|part| part.name.clone()).collect();
        request
    }

    pub fn with_selected<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_depth(mut self, name: impl Into<String>, depth: i32) -> Self {
        self.depth_overrides.insert(name.into(), depth);
        self
    }

    pub fn with_tint(mut self, name: impl Into<String>, tint: Tint) -> Self {
        self.tint_overrides.insert(name.into(), tint);
        self
    }

    pub fn is_selected(&self, part: &CharacterPart) -> bool {
        self.selected.contains(&part.name)
    }

    /// Sorting order, as possibly overridden by the caller.
    pub fn effective_depth(&self, part: &CharacterPart) -> i32 {
        self.depth_overrides
            .get(&part.name)
            .copied()
            .unwrap_or(part.sorting_order)
    }

    /// Renderer tint, as possibly overridden by the caller.
    pub fn effective_tint(&self, part: &CharacterPart) -> Tint {
        self.tint_overrides
            .get(&part.name)
            .copied()
            .unwrap_or(part.tint)
    }
}

/// Result of one render call.
#[derive(Debug)]
pub struct CompositeOutput {
    pub canvas: PixelBuffer,
    /// Names of the parts painted, back to front.
    pub painted: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Paints selected parts back to front onto a fresh canvas.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    settings: CompositorSettings,
}

impl Compositor {
    pub fn new(settings: CompositorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    /// Canvas size for a request's selection.
    pub fn canvas_size(&self, request: &CompositeRequest<'_>) -> CanvasSize {
        canvas_size(request.parts, &request.selected, &self.settings)
    }

    /// Selected parts in paint order: ascending effective depth, ties kept
    /// in part-list order.
    pub fn paint_order<'a>(&self, request: &CompositeRequest<'a>) -> Vec<&'a CharacterPart> {
        let mut ordered: Vec<&'a CharacterPart> = request
            .parts
            .iter()
            .filter(|part| request.is_selected(part))
            .collect();

        // `sort_by_key` is stable.
        ordered.sort_by_key(|part| request.effective_depth(part));
        ordered
    }

    /// Render the request.
    ///
    /// Layer preparation (tinting, placement) runs in parallel; painting
    /// runs strictly in paint order. Selected parts without pixels are
    /// reported and skipped.
    pub fn composite(&self, request: &CompositeRequest<'_>, progress: Option<ProgressFn<'_>>) -> CompositeOutput {
        let size = self.canvas_size(request);
        let mut canvas = PixelBuffer::with_size(size);
        let mut diagnostics = Diagnostics::new();

        let ordered = self.paint_order(request);
        if ordered.is_empty() {
            tracing::debug!("Empty selection; returning blank {} canvas", size);
            return CompositeOutput {
                canvas,
                painted: Vec::new(),
                diagnostics,
            };
        }

        let layers: Vec<Option<Layer<'_>>> = ordered
            .par_iter()
            .map(|part| {
                Layer::prepare(
                    part,
                    request.effective_depth(part),
                    request.effective_tint(part),
                    size,
                    &self.settings,
                )
            })
            .collect();

        let total = layers.len();
        let mut painted = Vec::with_capacity(total);

        for (index, (part, layer)) in ordered.iter().zip(layers).enumerate() {
            match layer {
                Some(layer) => {
                    layer.paint_onto(&mut canvas);
                    painted.push(part.name.clone());
                }
                None => {
                    if let Some(sprite_id) = part.sprite_id {
                        diagnostics.push(Diagnostic::AssetLoadFailure {
                            sprite_id: sprite_id.get(),
                            part: part.name.clone(),
                            reason: "sprite pixels unavailable".to_string(),
                        });
                    } else {
                        tracing::debug!("Part '{}' has no sprite; skipping", part.name);
                    }
                }
            }

            progress::report(progress, index + 1, total, &part.name);
        }

        tracing::debug!(
            "Composited {} of {} selected parts onto {} canvas",
            painted.len(),
            total,
            size
        );

        CompositeOutput {
            canvas,
            painted,
            diagnostics,
        }
    }
}
