//! Hover state machine.
//!
//! Each cell is either *normal* or *hovered*. Entering a cell dims every
//! outline, restyles the entered one and moves the image highlight onto it.
//! There is no exit transition: the next enter overrides the previous one.

use bevy::prelude::*;

use crate::scene::Scene;

/// Opacity every outline falls back to while some cell is hovered.
pub const DIM_OPACITY: f32 = 0.05;
/// Opacity of a hovered placeholder outline (neutral fill).
pub const PLACEHOLDER_OPACITY: f32 = 0.2;
/// Opacity of a hovered content outline (accent fill).
pub const ACCENT_OPACITY: f32 = 0.1;

/// Fill family of an outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum OutlineFill {
    /// Nothing hovered yet.
    Clear,
    /// Black, for dimmed and placeholder outlines.
    Neutral,
    /// Red, for hovered content outlines.
    Accent,
}

impl OutlineFill {
    /// CSS colour keyword.
    pub fn css(self) -> &'static str {
        match self {
            Self::Clear => "none",
            Self::Neutral => "black",
            Self::Accent => "red",
        }
    }

    /// Base colour, before opacity.
    pub fn color(self) -> Color {
        match self {
            Self::Clear | Self::Neutral => Color::BLACK,
            Self::Accent => Color::srgb(1.0, 0.0, 0.0),
        }
    }
}

/// Resolved style of one outline.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct OutlineStyle {
    /// Fill family.
    pub fill: OutlineFill,
    /// Fill opacity, `0..=1`.
    pub opacity: f32,
}

impl OutlineStyle {
    /// Before any hover: invisible.
    pub const RESTING: Self = Self {
        fill: OutlineFill::Clear,
        opacity: 0.0,
    };
    /// Every outline other than the hovered one.
    pub const DIMMED: Self = Self {
        fill: OutlineFill::Neutral,
        opacity: DIM_OPACITY,
    };
    /// Hovered placeholder cell.
    pub const PLACEHOLDER: Self = Self {
        fill: OutlineFill::Neutral,
        opacity: PLACEHOLDER_OPACITY,
    };
    /// Hovered content cell.
    pub const CONTENT: Self = Self {
        fill: OutlineFill::Accent,
        opacity: ACCENT_OPACITY,
    };

    /// Fill colour with the opacity folded into alpha.
    pub fn color(self) -> Color {
        self.fill.color().with_alpha(self.opacity)
    }
}

/// Which cell, if any, the pointer last entered.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub struct HoverState {
    hovered: Option<usize>,
}

impl HoverState {
    /// Starts with `index` already hovered.
    pub fn entered(index: usize) -> Self {
        Self {
            hovered: Some(index),
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer entered cell `index`. Returns `false` when it already was the
    /// hovered cell.
    pub fn enter(&mut self, index: usize) -> bool {
        if self.hovered == Some(index) {
            return false;
        }
        self.hovered = Some(index);
        true
    }

    /// Style of outline `index` in `scene`.
    pub fn outline_style(&self, scene: &Scene, index: usize) -> OutlineStyle {
        match self.hovered {
            None => OutlineStyle::RESTING,
            Some(h) if h == index => match scene.card(index) {
                Some(c) if c.card.is_placeholder() => OutlineStyle::PLACEHOLDER,
                Some(_) => OutlineStyle::CONTENT,
                None => OutlineStyle::DIMMED,
            },
            Some(_) => OutlineStyle::DIMMED,
        }
    }

    /// Whether image `index` carries the hover highlight.
    pub fn image_highlighted(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Item, is_todo};
    use crate::scene::{GlyphMetrics, LayoutSettings, SceneDraft};
    use crate::tessellation::DelaunayTessellator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene() -> Scene {
        let items = vec![
            Item {
                title: "A".into(),
                description: "todo: fix".into(),
                ..Default::default()
            },
            Item {
                title: "B".into(),
                description: "done".into(),
                path: Some("/b".into()),
                ..Default::default()
            },
            Item {
                title: "C".into(),
                description: "ready".into(),
                ..Default::default()
            },
        ];
        SceneDraft::build(
            items,
            &LayoutSettings::default(),
            is_todo,
            &DelaunayTessellator,
            &mut StdRng::seed_from_u64(17),
        )
        .fit(&GlyphMetrics::default())
    }

    #[test]
    fn resting_before_first_hover() {
        let scene = scene();
        let hover = HoverState::default();
        for i in 0..scene.len() {
            assert_eq!(hover.outline_style(&scene, i), OutlineStyle::RESTING);
            assert!(!hover.image_highlighted(i));
        }
    }

    #[test]
    fn placeholder_uses_neutral_branch() {
        let scene = scene();
        let hover = HoverState::entered(0);
        let style = hover.outline_style(&scene, 0);
        assert_eq!(style, OutlineStyle::PLACEHOLDER);
        assert_ne!(style.fill, OutlineFill::Accent);
        assert_eq!(hover.outline_style(&scene, 1), OutlineStyle::DIMMED);
        assert_eq!(hover.outline_style(&scene, 2), OutlineStyle::DIMMED);
    }

    #[test]
    fn content_uses_accent_branch() {
        let scene = scene();
        let hover = HoverState::entered(1);
        assert_eq!(hover.outline_style(&scene, 1), OutlineStyle::CONTENT);
        assert_eq!(hover.outline_style(&scene, 0), OutlineStyle::DIMMED);
    }

    #[test]
    fn next_enter_overrides_previous() {
        let scene = scene();
        let mut hover = HoverState::default();
        assert!(hover.enter(1));
        assert!(hover.enter(2));
        assert_eq!(hover.hovered(), Some(2));
        assert_eq!(hover.outline_style(&scene, 1), OutlineStyle::DIMMED);
        assert!(hover.image_highlighted(2));
        assert!(!hover.image_highlighted(1));
    }

    #[test]
    fn re_entering_same_cell_is_noop() {
        let mut hover = HoverState::entered(2);
        assert!(!hover.enter(2));
        assert_eq!(hover.hovered(), Some(2));
    }

    #[test]
    fn style_colour_carries_opacity() {
        let c = OutlineStyle::CONTENT.color();
        assert!((c.alpha() - ACCENT_OPACITY).abs() < 1e-6);
        assert_eq!(OutlineFill::Accent.css(), "red");
        assert_eq!(OutlineFill::Neutral.css(), "black");
    }
}
