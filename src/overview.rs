//! Windowed overview: cell meshes, clipped background images, labels and
//! hover highlighting.
//!
//! The scene is built once at startup. Everything spawned afterwards reads
//! the [`Overview`] resource; only [`HoverState`] changes at runtime.

mod entities;
mod startup_systems;
mod systems;

pub use entities::{FollowLink, Overview, PlaceholderRule};
pub(crate) use startup_systems::load_scene;

use std::path::PathBuf;

use bevy::prelude::*;

use crate::ViewState;
use crate::interaction::HoverState;
use crate::scene::{GlyphMetrics, LayoutSettings};

/// Configuration for the overview subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct OverviewConfig {
    /// Canvas size and label anchors.
    pub layout: LayoutSettings,
    /// Font estimate used by the layout-fit step before real text is measured.
    pub metrics: GlyphMetrics,
    /// JSON catalog to load; the bundled demo catalog when `None`.
    pub catalog: Option<PathBuf>,
    /// Site sampling seed; OS entropy when `None`.
    pub seed: Option<u64>,
    /// Label colour for cards with content.
    pub label_color: Color,
    /// Label colour for placeholder cards.
    pub placeholder_label_color: Color,
    /// Cell border colour.
    pub outline_color: Color,
    /// Tint of background images without the hover highlight.
    pub image_tint: Color,
    /// Tint of the highlighted background image.
    pub highlight_tint: Color,
    /// Background clear color.
    pub clear_color: Color,
    /// Canvas pixels scrolled per wheel line.
    pub scroll_speed: f32,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            metrics: GlyphMetrics::default(),
            catalog: None,
            seed: None,
            label_color: Color::srgb(0.1, 0.1, 0.1),
            placeholder_label_color: Color::srgb(0.55, 0.55, 0.55),
            outline_color: Color::WHITE,
            image_tint: Color::srgb(0.6, 0.6, 0.6),
            highlight_tint: Color::WHITE,
            clear_color: Color::srgb(0.96, 0.96, 0.96),
            scroll_speed: 40.0,
        }
    }
}

/// Pointer-driven systems; paused while the inspector is open.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Browsing;

/// Overview plugin: scene build at startup, hover and link handling at runtime.
pub struct OverviewPlugin(pub OverviewConfig);

impl Plugin for OverviewPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OverviewConfig>()
            .register_type::<HoverState>()
            .register_type::<entities::CardCell>()
            .register_type::<entities::CellOutline>()
            .register_type::<entities::CardImage>()
            .register_type::<entities::CardLabel>()
            .register_type::<entities::Hyperlink>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<PlaceholderRule>()
            .init_resource::<HoverState>()
            .add_message::<FollowLink>()
            .add_systems(
                Startup,
                (
                    startup_systems::load_scene,
                    startup_systems::spawn_camera,
                    startup_systems::spawn_cards,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::scroll_canvas,
                    systems::track_hover,
                    systems::apply_hover_styles.run_if(resource_changed::<HoverState>),
                )
                    .chain()
                    .in_set(Browsing),
            )
            .add_systems(
                Update,
                (systems::click_links, systems::log_followed_links)
                    .chain()
                    .after(systems::track_hover)
                    .in_set(Browsing),
            )
            .add_systems(Update, (systems::center_labels, systems::draw_outlines));
        configure_browsing(app);
    }
}

fn configure_browsing(app: &mut App) {
    app.configure_sets(Update, Browsing.run_if(in_state(ViewState::Viewing)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[derive(Resource, Default)]
    struct Ticks(u32);

    fn tick(mut ticks: ResMut<Ticks>) {
        ticks.0 += 1;
    }

    #[test]
    fn browsing_pauses_while_inspecting() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .insert_state(ViewState::Inspecting)
            .init_resource::<Ticks>()
            .add_systems(Update, tick.in_set(Browsing));
        configure_browsing(&mut app);

        app.update();
        assert_eq!(app.world().resource::<Ticks>().0, 0);

        app.world_mut()
            .resource_mut::<NextState<ViewState>>()
            .set(ViewState::Viewing);
        app.update();
        assert_eq!(app.world().resource::<Ticks>().0, 1);
    }
}
