//! Standalone SVG rendition of a fitted scene.
//!
//! The document mirrors the overview DOM: clip paths and the blur filter in
//! `<defs>`, then one `visCard` group per cell holding the clipped background
//! image, the outline path and the linked two-line label.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::interaction::HoverState;
use crate::scene::{FittedCard, Scene};

/// Id of the Gaussian blur filter applied to un-highlighted images.
pub const BLUR_FILTER_ID: &str = "blur-filter";
const BLUR_STD_DEVIATION: f32 = 2.0;

const STYLE: &str = "\
.background-images image { filter: url(#blur-filter); }
.background-images image.hoverEffect { filter: none; }
.labels a.todo { pointer-events: none; fill: #888; }
.labels text { font-family: sans-serif; font-size: 16px; }";

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `scene` with the outline and image styles of `hover`.
pub fn render(scene: &Scene, hover: &HoverState) -> String {
    let size = scene.size();
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}">"#,
        size.x, size.y
    );
    let _ = writeln!(out, "<style>{STYLE}</style>");

    out.push_str("<defs>\n");
    for fitted in scene.cards() {
        let card = &fitted.card;
        let _ = writeln!(
            out,
            r#"<clipPath id="{}"><path d="{}"/></clipPath>"#,
            card.clip_id(),
            card.path_data()
        );
    }
    let _ = writeln!(
        out,
        r#"<filter id="{BLUR_FILTER_ID}"><feGaussianBlur in="SourceGraphic" stdDeviation="{BLUR_STD_DEVIATION}"/></filter>"#
    );
    out.push_str("</defs>\n");

    out.push_str("<g class=\"visCard\">\n");
    for fitted in scene.cards() {
        write_card(&mut out, scene, fitted, hover);
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn write_card(out: &mut String, scene: &Scene, fitted: &FittedCard, hover: &HoverState) {
    let card = &fitted.card;
    let layout = &fitted.layout;
    out.push_str("<g>\n");

    out.push_str("<g class=\"background-images\">");
    let _ = write!(out, r#"<g clip-path="url(#{})">"#, card.clip_id());
    if let Some(image) = &card.image {
        let class = if hover.image_highlighted(card.index) {
            r#" class="hoverEffect""#
        } else {
            ""
        };
        let transform = layout
            .image
            .map(|fit| format!(r#" transform="{}""#, fit.svg_transform()))
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<image{class} xlink:href="{}"{transform}/>"#,
            escape(&image.path)
        );
    }
    out.push_str("</g></g>\n");

    let style = hover.outline_style(scene, card.index);
    let _ = writeln!(
        out,
        r#"<g class="polygons"><path id="{}" d="{}" data-title="{}" style="fill: {}; fill-opacity: {}"/></g>"#,
        card.polygon_id(),
        card.path_data(),
        escape(&card.item.title),
        style.fill.css(),
        style.opacity
    );

    let label = &card.label;
    let class = if label.placeholder { r#" class="todo""# } else { "" };
    let href = label
        .link
        .as_deref()
        .map(|link| format!(r#" xlink:href="{}""#, escape(link)))
        .unwrap_or_default();
    let shift = layout.label_shift;
    let _ = writeln!(
        out,
        r#"<g class="labels"><a{class}{href}><text x="{}" y="{}" transform="translate({} {})">{}<tspan x="{}" y="{}">{}</tspan></text></a></g>"#,
        label.title_offset.x,
        label.title_offset.y,
        shift.x,
        shift.y,
        escape(&label.title),
        label.description_offset.x,
        label.description_offset.y,
        escape(&label.description)
    );

    out.push_str("</g>\n");
}

/// Writes the rendered document to `path`.
pub fn export(scene: &Scene, hover: &HoverState, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, render(scene, hover)).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Item, is_todo};
    use crate::scene::{GlyphMetrics, LayoutSettings, SceneDraft};
    use crate::tessellation::DelaunayTessellator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scenario() -> Scene {
        let items = vec![
            Item {
                title: "A".into(),
                description: "todo: fix".into(),
                ..Default::default()
            },
            Item {
                title: "B & <C>".into(),
                description: "done".into(),
                image_path: Some("b.png".into()),
                image_width: Some(100.0),
                image_height: Some(50.0),
                path: Some("/b".into()),
            },
        ];
        SceneDraft::build(
            items,
            &LayoutSettings::default(),
            is_todo,
            &DelaunayTessellator,
            &mut StdRng::seed_from_u64(8),
        )
        .fit(&GlyphMetrics::default())
    }

    #[test]
    fn document_has_one_clip_and_polygon_per_cell() {
        let svg = render(&scenario(), &HoverState::default());
        assert_eq!(svg.matches("<clipPath ").count(), 2);
        assert!(svg.contains(r#"id="clipPath-0""#));
        assert!(svg.contains(r#"id="polygon-1""#));
        assert!(svg.contains(r#"<filter id="blur-filter">"#));
        assert!(svg.contains(r#"width="960" height="333""#));
    }

    #[test]
    fn placeholder_label_is_marked_and_unlinked() {
        let svg = render(&scenario(), &HoverState::default());
        assert_eq!(svg.matches(r#"<a class="todo">"#).count(), 1);
        assert_eq!(svg.matches(r#"xlink:href="/b""#).count(), 1);
    }

    #[test]
    fn placeholder_with_path_keeps_href_under_todo_class() {
        let items = vec![Item {
            title: "Treemap".into(),
            description: "todo".into(),
            path: Some("/treemap".into()),
            ..Default::default()
        }];
        let scene = SceneDraft::build(
            items,
            &LayoutSettings::default(),
            is_todo,
            &DelaunayTessellator,
            &mut StdRng::seed_from_u64(3),
        )
        .fit(&GlyphMetrics::default());
        let svg = render(&scene, &HoverState::default());
        assert!(svg.contains(r#"<a class="todo" xlink:href="/treemap">"#));
        assert!(STYLE.contains(".labels a.todo { pointer-events: none;"));
    }

    #[test]
    fn image_only_for_items_with_path() {
        let scene = scenario();
        let svg = render(&scene, &HoverState::default());
        assert_eq!(svg.matches("<image").count(), 1);
        let fit = scene.cards()[1].layout.image.unwrap();
        assert!(svg.contains(&fit.svg_transform()));
    }

    #[test]
    fn hover_state_is_applied() {
        let svg = render(&scenario(), &HoverState::entered(1));
        assert!(svg.contains("fill: red; fill-opacity: 0.1"));
        assert!(svg.contains("fill: black; fill-opacity: 0.05"));
        assert!(svg.contains(r#"<image class="hoverEffect""#));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render(&scenario(), &HoverState::default());
        assert!(svg.contains("B &amp; &lt;C&gt;"));
        assert!(!svg.contains("B & <C>"));
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let err = export(
            &scenario(),
            &HoverState::default(),
            Path::new("/no/such/dir/out.svg"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("out.svg"));
    }
}
