//! Headless SVG export.
//!
//! Runs the same scene build as the window, writes the SVG document and exits.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::interaction::HoverState;
use crate::overview::{self, Overview, OverviewConfig, PlaceholderRule};
use crate::svg;

/// Where to write the export and which cell, if any, to show hovered.
#[derive(Resource, Clone, Debug)]
pub struct ExportRequest {
    /// Output file.
    pub path: PathBuf,
    /// Cell rendered in the hovered state.
    pub hover: Option<usize>,
}

impl ExportRequest {
    /// Hover state to render for a scene of `len` cards. An out-of-range
    /// index renders as if nothing was hovered.
    pub fn hover_state(&self, len: usize) -> HoverState {
        match self.hover {
            Some(index) if index < len => HoverState::entered(index),
            Some(index) => {
                warn!("hover index {index} is out of range, nothing highlighted");
                HoverState::default()
            }
            None => HoverState::default(),
        }
    }
}

/// Builds the scene at startup, exports it and requests exit.
pub struct ExportPlugin {
    /// Scene settings, shared with the windowed overview.
    pub config: OverviewConfig,
    /// Export target.
    pub request: ExportRequest,
}

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(self.request.clone())
            .init_resource::<PlaceholderRule>()
            .add_systems(Startup, (overview::load_scene, write_svg).chain());
    }
}

fn write_svg(
    overview: Option<Res<Overview>>,
    request: Res<ExportRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    // Catalog failures already requested exit.
    let Some(overview) = overview else { return };
    let hover = request.hover_state(overview.0.len());
    match svg::export(&overview.0, &hover, &request.path) {
        Ok(()) => {
            info!("wrote {}", request.path.display());
            exit.write(AppExit::Success);
        }
        Err(err) => {
            error!("{err}");
            exit.write(AppExit::error());
        }
    }
}
