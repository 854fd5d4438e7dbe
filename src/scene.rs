//! Immutable scene model shared by the SVG exporter and the window front-end.
//!
//! Building is an explicit two-step pipeline. [`SceneDraft::build`] samples
//! the sites, partitions the canvas and pairs every cell with its item.
//! [`SceneDraft::fit`] then measures labels and polygon bounds and produces
//! the final [`Scene`], which is never mutated afterwards.

use std::fmt::Write as _;

use bevy::math::{Rect, Vec2};
use bevy::prelude::Reflect;
use rand::Rng;

use crate::catalog::Item;
use crate::math;
use crate::tessellation::{Tessellator, sample_sites};

/// Id prefix of per-cell clip regions.
pub const CLIP_PATH_ID_PREFIX: &str = "clipPath-";
/// Id prefix of per-cell outline paths.
pub const POLYGON_ID_PREFIX: &str = "polygon-";

/// Canvas and label geometry.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct LayoutSettings {
    /// Fixed canvas width.
    pub width: f32,
    /// Average area every cell is guaranteed, drives the canvas height.
    pub min_cell_area: f32,
    /// Extra border around the canvas handed to the tessellator.
    pub extent_margin: f32,
    /// Local anchor of the title line.
    pub title_offset: Vec2,
    /// Local anchor of the description line.
    pub description_offset: Vec2,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 960.0,
            min_cell_area: 400.0 * 400.0,
            extent_margin: 1.0,
            title_offset: Vec2::new(0.0, -120.0),
            description_offset: Vec2::new(0.0, -100.0),
        }
    }
}

impl LayoutSettings {
    /// Canvas size for `count` items.
    pub fn canvas_size(&self, count: usize) -> Vec2 {
        Vec2::new(
            self.width,
            math::canvas_height(count, self.width, self.min_cell_area),
        )
    }
}

/// Two-line label of a card, in label-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    /// First line, the item title.
    pub title: String,
    /// Second line, the item description.
    pub description: String,
    /// Baseline anchor of the title line.
    pub title_offset: Vec2,
    /// Baseline anchor of the description line.
    pub description_offset: Vec2,
    /// Set when the item is a placeholder; front-ends keep such links inert.
    pub placeholder: bool,
    /// Link target, the item's `path`.
    pub link: Option<String>,
}

/// Background image request of a card.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSpec {
    /// Image location, as given by the catalog.
    pub path: String,
    /// Natural size, when the catalog provides both positive dimensions.
    pub natural: Option<Vec2>,
}

/// One tessellation cell paired with the item it shows.
#[derive(Clone, Debug, PartialEq)]
pub struct CellCard {
    /// Position in the catalog.
    pub index: usize,
    /// The catalog entry shown by this cell.
    pub item: Item,
    /// Sampled site the cell grows around.
    pub site: Vec2,
    /// `None` when the tessellator could not produce a cell.
    pub polygon: Option<Vec<Vec2>>,
    /// Area centroid of `polygon`.
    pub centroid: Option<Vec2>,
    /// Two-line label.
    pub label: LabelSpec,
    /// Background image, when the item has one.
    pub image: Option<ImageSpec>,
}

impl CellCard {
    pub fn clip_id(&self) -> String {
        format!("{CLIP_PATH_ID_PREFIX}{}", self.index)
    }

    pub fn polygon_id(&self) -> String {
        format!("{POLYGON_ID_PREFIX}{}", self.index)
    }

    /// SVG path data `M x,y L x,y … Z`, empty for undefined polygons.
    pub fn path_data(&self) -> String {
        let Some(ring) = &self.polygon else {
            return String::new();
        };
        let mut d = String::new();
        for (i, p) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", p.x, p.y);
        }
        if !d.is_empty() {
            d.push('Z');
        }
        d
    }

    pub fn is_placeholder(&self) -> bool {
        self.label.placeholder
    }

    /// Link a click should follow; placeholders keep their target but stay
    /// inert.
    pub fn active_link(&self) -> Option<&str> {
        if self.is_placeholder() {
            return None;
        }
        self.label.link.as_deref()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.polygon.as_deref().and_then(math::polygon_bounds)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.polygon
            .as_deref()
            .is_some_and(|ring| math::contains_point(ring, p))
    }
}

/// Measures rendered label geometry.
pub trait TextMeasure {
    /// Bounding box of `label` in its local (untranslated) frame.
    fn label_bounds(&self, label: &LabelSpec) -> Rect;
}

/// Font-metric estimate used where no text renderer is available.
///
/// Every glyph advances `advance * font_size`; a line spans `ascent` above and
/// `descent` below its baseline, both in ems.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct GlyphMetrics {
    /// Font size in canvas units.
    pub font_size: f32,
    /// Glyph advance, in ems.
    pub advance: f32,
    /// Height above the baseline, in ems.
    pub ascent: f32,
    /// Depth below the baseline, in ems.
    pub descent: f32,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            advance: 0.55,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

impl GlyphMetrics {
    fn line_bounds(&self, text: &str, baseline: Vec2) -> Option<Rect> {
        if text.is_empty() {
            return None;
        }
        let width = text.chars().count() as f32 * self.advance * self.font_size;
        Some(Rect::new(
            baseline.x,
            baseline.y - self.ascent * self.font_size,
            baseline.x + width,
            baseline.y + self.descent * self.font_size,
        ))
    }
}

impl TextMeasure for GlyphMetrics {
    fn label_bounds(&self, label: &LabelSpec) -> Rect {
        let title = self.line_bounds(&label.title, label.title_offset);
        let description = self.line_bounds(&label.description, label.description_offset);
        match (title, description) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => Rect::from_corners(label.title_offset, label.title_offset),
        }
    }
}

/// Cover transform of a background image: `translate(origin) scale(scale)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageFit {
    /// Top-left corner of the polygon's bounding box.
    pub origin: Vec2,
    /// Uniform scale that makes the image cover the bounding box.
    pub scale: f32,
    /// The measured polygon bounding box.
    pub bounds: Rect,
}

impl ImageFit {
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({},{})scale({})",
            self.origin.x, self.origin.y, self.scale
        )
    }

    /// Maps a canvas point to normalised image coordinates (`0..1` inside
    /// the image).
    pub fn uv(&self, p: Vec2, natural: Vec2) -> Vec2 {
        (p - self.origin) / (natural * self.scale)
    }
}

/// Output of the layout-fit step for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    /// Label bounding box before translation.
    pub label_bounds: Rect,
    /// Translation that centres the label on the centroid.
    pub label_shift: Vec2,
    /// Image cover transform, when the image has a natural size and the cell
    /// a polygon.
    pub image: Option<ImageFit>,
}

/// A card together with its fitted layout.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedCard {
    /// The built card.
    pub card: CellCard,
    /// Its measured layout.
    pub layout: CardLayout,
}

/// Cards before the layout-fit step.
#[derive(Clone, Debug)]
pub struct SceneDraft {
    size: Vec2,
    cards: Vec<CellCard>,
}

impl SceneDraft {
    /// Samples one site per item, partitions the canvas and pairs cells with
    /// items.
    pub fn build<T, R>(
        items: Vec<Item>,
        settings: &LayoutSettings,
        is_placeholder: impl Fn(&str) -> bool,
        tessellator: &T,
        rng: &mut R,
    ) -> Self
    where
        T: Tessellator + ?Sized,
        R: Rng,
    {
        let size = settings.canvas_size(items.len());
        let sites = sample_sites(rng, items.len(), size);
        let polygons = if sites.is_empty() {
            Vec::new()
        } else {
            let m = Vec2::splat(settings.extent_margin);
            tessellator.partition(&sites, Rect::from_corners(-m, size + m))
        };

        let cards = items
            .into_iter()
            .zip(sites)
            .zip(polygons.into_iter().chain(std::iter::repeat(None)))
            .enumerate()
            .map(|(index, ((item, site), polygon))| {
                let centroid = polygon.as_deref().and_then(math::polygon_centroid);
                let placeholder = is_placeholder(&item.description);
                let label = LabelSpec {
                    title: item.title.clone(),
                    description: item.description.clone(),
                    title_offset: settings.title_offset,
                    description_offset: settings.description_offset,
                    placeholder,
                    link: item.path.clone(),
                };
                let image = item.image_path.clone().map(|path| ImageSpec {
                    path,
                    natural: match (item.image_width, item.image_height) {
                        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(Vec2::new(w, h)),
                        _ => None,
                    },
                });
                CellCard {
                    index,
                    item,
                    site,
                    polygon,
                    centroid,
                    label,
                    image,
                }
            })
            .collect();

        Self { size, cards }
    }

    #[cfg(test)]
    pub fn cards(&self) -> &[CellCard] {
        &self.cards
    }

    /// Measures every label and polygon and freezes the scene.
    pub fn fit<M: TextMeasure + ?Sized>(self, measure: &M) -> Scene {
        let cards = self
            .cards
            .into_iter()
            .map(|card| {
                let label_bounds = measure.label_bounds(&card.label);
                let label_shift = card
                    .centroid
                    .map_or(Vec2::ZERO, |c| math::center_offset(label_bounds, c));
                let image = fit_image(&card);
                FittedCard {
                    card,
                    layout: CardLayout {
                        label_bounds,
                        label_shift,
                        image,
                    },
                }
            })
            .collect();
        Scene {
            size: self.size,
            cards,
        }
    }
}

fn fit_image(card: &CellCard) -> Option<ImageFit> {
    let natural = card.image.as_ref()?.natural?;
    let bounds = card.bounds()?;
    let scale = math::cover_scale(bounds.size(), natural)?;
    Some(ImageFit {
        origin: bounds.min,
        scale,
        bounds,
    })
}

/// The fitted, immutable overview.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    size: Vec2,
    cards: Vec<FittedCard>,
}

impl Scene {
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn cards(&self) -> &[FittedCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&FittedCard> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Index of the cell under a canvas point.
    pub fn cell_at(&self, p: Vec2) -> Option<usize> {
        self.cards
            .iter()
            .find(|c| c.card.contains(p))
            .map(|c| c.card.index)
    }
}
