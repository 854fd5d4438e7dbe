use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog;
use crate::math;
use crate::scene::Scene;

/// The fitted scene, inserted once the catalog is loaded.
#[derive(Resource)]
pub struct Overview(pub Scene);

/// Placeholder classifier applied to item descriptions.
#[derive(Resource, Clone, Copy)]
pub struct PlaceholderRule(pub fn(&str) -> bool);

impl Default for PlaceholderRule {
    fn default() -> Self {
        Self(catalog::is_todo)
    }
}

/// Marker for the overview camera.
#[derive(Component)]
pub struct OverviewCamera;

/// Parent entity of everything drawn for one card.
#[derive(Component, Reflect)]
pub struct CardCell {
    /// Card index in the scene.
    pub index: usize,
}

/// Outline fill mesh of a card (child of [`CardCell`]).
#[derive(Component, Reflect)]
pub struct CellOutline {
    /// Card index in the scene.
    pub index: usize,
    /// Polygon in world space, used for border gizmos.
    pub ring: Vec<Vec2>,
}

/// Clipped background image mesh of a card (child of [`CardCell`]).
#[derive(Component, Reflect)]
pub struct CardImage {
    /// Card index in the scene.
    pub index: usize,
}

/// Two-line label of a card (child of [`CardCell`]).
#[derive(Component, Reflect)]
pub struct CardLabel {
    /// Card index in the scene.
    pub index: usize,
    /// Centroid in world space; labels of undefined cells stay where spawned.
    pub target: Option<Vec2>,
}

/// Link target carried by a [`CardCell`] with a non-placeholder item.
#[derive(Component, Reflect)]
pub struct Hyperlink(pub String);

/// Emitted when a linked card is clicked; routing is up to the consumer.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct FollowLink {
    /// Card index in the scene.
    pub index: usize,
    /// Route taken from the item.
    pub path: String,
}

/// Primary window and overview camera, bundled for cursor hit tests.
#[derive(SystemParam)]
pub struct CursorProbe<'w, 's> {
    /// The primary window.
    pub windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    /// The overview camera.
    pub camera_q: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<OverviewCamera>>,
}

impl CursorProbe<'_, '_> {
    /// Cursor position in canvas space, if the cursor is over the window.
    pub fn canvas_pos(&self, canvas: Vec2) -> Option<Vec2> {
        let window = self.windows.single().ok()?;
        let cursor = window.cursor_position()?;
        let (camera, cam_tf) = self.camera_q.single().ok()?;
        let world = camera.viewport_to_world_2d(cam_tf, cursor).ok()?;
        Some(math::world_to_canvas(world, canvas))
    }
}
