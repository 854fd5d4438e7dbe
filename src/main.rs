#![warn(missing_docs)]
//! Voronoi card overview.
//!
//! Partitions a fixed-width canvas into one random Voronoi cell per catalog
//! item and shows each cell as a card: clipped background image, centred
//! two-line label, link, and hover highlighting. `--export-svg` writes the
//! same scene as an SVG document instead of opening a window.

mod catalog;
mod export;
mod interaction;
pub mod math;
mod overview;
mod scene;
mod svg;
mod tessellation;

#[cfg(feature = "native")]
use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy::window::WindowResolution;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use crate::export::{ExportPlugin, ExportRequest};
use crate::overview::{OverviewConfig, OverviewPlugin};

/// Initial window height; taller canvases scroll.
const WINDOW_HEIGHT: u32 = 800;

/// Application-wide view state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum ViewState {
    /// Normal browsing.
    #[default]
    Viewing,
    /// World inspector open (Tab to toggle).
    Inspecting,
}

/// Command-line options.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(version, about = "Voronoi card overview")]
struct Args {
    /// JSON catalog of overview items (defaults to the bundled demo).
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// Seed for site placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the overview as SVG to FILE and exit instead of opening a window.
    #[arg(long, value_name = "FILE")]
    export_svg: Option<PathBuf>,
    /// With --export-svg: render card INDEX as hovered.
    #[arg(long, value_name = "INDEX", requires = "export_svg")]
    hover: Option<usize>,
    /// Root directory item image paths are resolved against.
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: String,
}

/// Resolved launch options.
struct Launch {
    config: OverviewConfig,
    asset_root: String,
    export: Option<ExportRequest>,
}

impl Launch {
    #[cfg(feature = "native")]
    fn from_env() -> Self {
        use clap::Parser;
        Self::from_args(Args::parse())
    }

    #[cfg(not(feature = "native"))]
    fn from_env() -> Self {
        Self {
            config: OverviewConfig::default(),
            asset_root: "assets".into(),
            export: None,
        }
    }

    #[cfg(feature = "native")]
    fn from_args(args: Args) -> Self {
        let config = OverviewConfig {
            catalog: args.catalog,
            seed: args.seed,
            ..default()
        };
        let export = args.export_svg.map(|path| ExportRequest {
            path,
            hover: args.hover,
        });
        Self {
            config,
            asset_root: args.assets,
            export,
        }
    }
}

fn main() -> AppExit {
    let Launch {
        config,
        asset_root,
        export,
    } = Launch::from_env();

    match export {
        Some(request) => export_app(config, request).run(),
        None => viewer_app(config, asset_root).run(),
    }
}

fn viewer_app(config: OverviewConfig, asset_root: String) -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Overview".into(),
                    resolution: WindowResolution::new(config.layout.width as u32, WINDOW_HEIGHT),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_root,
                ..default()
            }),
    )
    .register_type::<ViewState>()
    .init_state::<ViewState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(OverviewPlugin(config))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(ViewState::Inspecting)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app
}

fn export_app(config: OverviewConfig, request: ExportRequest) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(ExportPlugin { config, request });
    app
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<ViewState>>,
    mut next: ResMut<NextState<ViewState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            ViewState::Viewing => ViewState::Inspecting,
            ViewState::Inspecting => ViewState::Viewing,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
