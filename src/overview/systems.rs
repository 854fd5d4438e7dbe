use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::text::TextLayoutInfo;
use bevy::window::PrimaryWindow;

use super::OverviewConfig;
use super::entities::{
    CardImage, CardLabel, CellOutline, CursorProbe, FollowLink, Overview, OverviewCamera,
};
use crate::interaction::HoverState;
use crate::math;

/// Scrolls the camera along tall canvases with the mouse wheel.
pub fn scroll_canvas(
    mut wheel: MessageReader<MouseWheel>,
    overview: Option<Res<Overview>>,
    cfg: Res<OverviewConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<&mut Transform, With<OverviewCamera>>,
) {
    let delta: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y * cfg.scroll_speed,
            MouseScrollUnit::Pixel => ev.y,
        })
        .sum();
    if delta == 0.0 {
        return;
    }
    let Some(overview) = overview else { return };
    let Ok(window) = windows.single() else { return };
    let Ok(mut transform) = camera_q.single_mut() else {
        return;
    };
    transform.translation.y = math::clamp_scroll(
        transform.translation.y + delta,
        overview.0.size().y,
        window.height(),
    );
}

/// Enters the cell under the cursor. Leaving the canvas keeps the last cell.
pub fn track_hover(
    probe: CursorProbe,
    overview: Option<Res<Overview>>,
    mut hover: ResMut<HoverState>,
) {
    let Some(overview) = overview else { return };
    let Some(pos) = probe.canvas_pos(overview.0.size()) else {
        return;
    };
    let Some(index) = overview.0.cell_at(pos) else {
        return;
    };
    // Only touch the resource on a real transition so change detection stays quiet.
    if hover.hovered() != Some(index) {
        hover.enter(index);
        debug!("hover: card {index}");
    }
}

/// Restyles every outline and image after a hover transition.
pub fn apply_hover_styles(
    hover: Res<HoverState>,
    overview: Option<Res<Overview>>,
    cfg: Res<OverviewConfig>,
    outlines: Query<(&CellOutline, &MeshMaterial2d<ColorMaterial>)>,
    images: Query<(&CardImage, &MeshMaterial2d<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Some(overview) = overview else { return };

    for (outline, handle) in &outlines {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.color = hover.outline_style(&overview.0, outline.index).color();
        }
    }

    for (image, handle) in &images {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.color = if hover.image_highlighted(image.index) {
                cfg.highlight_tint
            } else {
                cfg.image_tint
            };
        }
    }
}

/// Emits [`FollowLink`] when a linked, non-placeholder card is clicked.
pub fn click_links(
    buttons: Res<ButtonInput<MouseButton>>,
    probe: CursorProbe,
    overview: Option<Res<Overview>>,
    mut follow: MessageWriter<FollowLink>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(overview) = overview else { return };
    let Some(pos) = probe.canvas_pos(overview.0.size()) else {
        return;
    };
    let Some(index) = overview.0.cell_at(pos) else {
        return;
    };
    if let Some(path) = overview.0.card(index).and_then(|c| c.card.active_link()) {
        follow.write(FollowLink {
            index,
            path: path.to_owned(),
        });
    }
}

/// Logs link requests; routing is outside this app.
pub fn log_followed_links(mut follow: MessageReader<FollowLink>) {
    for link in follow.read() {
        info!("follow link {} (card {})", link.path, link.index);
    }
}

/// Moves each label so its measured box is centred on its cell centroid.
///
/// Runs whenever text layout changes; the label is spawned top-left anchored
/// so its box spans `size` right of and below its translation.
pub fn center_labels(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut labels: Query<(&CardLabel, &TextLayoutInfo, &mut Transform), Changed<TextLayoutInfo>>,
) {
    let scale = windows.single().map_or(1.0, Window::scale_factor);
    for (label, info, mut transform) in &mut labels {
        let Some(target) = label.target else { continue };
        if info.size == Vec2::ZERO {
            continue;
        }
        let size = info.size / scale;
        let top_left = transform.translation.truncate();
        let bbox = Rect::new(top_left.x, top_left.y - size.y, top_left.x + size.x, top_left.y);
        transform.translation += math::center_offset(bbox, target).extend(0.0);
    }
}

/// Draws every cell border.
pub fn draw_outlines(mut gizmos: Gizmos, cfg: Res<OverviewConfig>, outlines: Query<&CellOutline>) {
    for outline in &outlines {
        let Some(&first) = outline.ring.first() else {
            continue;
        };
        gizmos.linestrip_2d(
            outline.ring.iter().copied().chain(std::iter::once(first)),
            cfg.outline_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measured_label_box_centres_on_target() {
        let mut app = App::new();
        app.add_systems(Update, center_labels);
        let label = app
            .world_mut()
            .spawn((
                CardLabel {
                    index: 0,
                    target: Some(Vec2::new(100.0, 50.0)),
                },
                TextLayoutInfo {
                    size: Vec2::new(40.0, 20.0),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
            ))
            .id();

        app.update();

        let tf = app.world().get::<Transform>(label).unwrap();
        // Top-left anchored box of 40x20 centred on (100, 50).
        assert_eq!(tf.translation, Vec3::new(80.0, 60.0, 2.0));
    }

    #[test]
    fn unmeasured_and_untargeted_labels_stay_put() {
        let mut app = App::new();
        app.add_systems(Update, center_labels);
        let unmeasured = app
            .world_mut()
            .spawn((
                CardLabel {
                    index: 0,
                    target: Some(Vec2::new(100.0, 50.0)),
                },
                TextLayoutInfo::default(),
                Transform::from_xyz(5.0, 5.0, 2.0),
            ))
            .id();
        let untargeted = app
            .world_mut()
            .spawn((
                CardLabel {
                    index: 1,
                    target: None,
                },
                TextLayoutInfo {
                    size: Vec2::new(40.0, 20.0),
                    ..default()
                },
                Transform::from_xyz(5.0, 5.0, 2.0),
            ))
            .id();

        app.update();

        for entity in [unmeasured, untargeted] {
            let tf = app.world().get::<Transform>(entity).unwrap();
            assert_eq!(tf.translation, Vec3::new(5.0, 5.0, 2.0));
        }
    }
}
