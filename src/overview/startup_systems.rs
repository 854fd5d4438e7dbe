use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::OverviewConfig;
use super::entities::{
    CardCell, CardImage, CardLabel, CellOutline, Hyperlink, Overview, OverviewCamera,
    PlaceholderRule,
};
use crate::catalog;
use crate::interaction::OutlineStyle;
use crate::math;
use crate::scene::{FittedCard, SceneDraft};
use crate::tessellation::DelaunayTessellator;

// ── Startup ─────────────────────────────────────────────────────────

/// Loads the catalog, builds and fits the scene, and inserts [`Overview`].
///
/// A catalog error is logged and ends the app with a failure code.
pub fn load_scene(
    mut commands: Commands,
    cfg: Res<OverviewConfig>,
    rule: Res<PlaceholderRule>,
    mut exit: MessageWriter<AppExit>,
) {
    let items = match &cfg.catalog {
        Some(path) => catalog::load(path),
        None => catalog::demo(),
    };
    let items = match items {
        Ok(items) => items,
        Err(err) => {
            error!("{err}");
            exit.write(AppExit::error());
            return;
        }
    };

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let scene = SceneDraft::build(items, &cfg.layout, rule.0, &DelaunayTessellator, &mut rng)
        .fit(&cfg.metrics);

    if scene.is_empty() {
        warn!("catalog has no items, nothing to show");
    }
    let undefined = scene
        .cards()
        .iter()
        .filter(|c| c.card.polygon.is_none())
        .count();
    if undefined > 0 {
        warn!("{undefined} cell(s) have no polygon and render empty");
    }
    info!(
        "overview: {} cards on a {}x{} canvas",
        scene.len(),
        scene.size().x,
        scene.size().y
    );
    commands.insert_resource(Overview(scene));
}

/// Spawns the 2D camera scrolled to the top of the canvas.
pub fn spawn_camera(
    mut commands: Commands,
    overview: Option<Res<Overview>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let canvas_height = overview.map_or(0.0, |o| o.0.size().y);
    let view_height = windows.single().map_or(canvas_height, Window::height);
    let y = math::clamp_scroll(f32::INFINITY, canvas_height, view_height);
    commands.spawn((
        Name::new("OverviewCamera"),
        Camera2d,
        Transform::from_xyz(0.0, y, 0.0),
        OverviewCamera,
    ));
}

/// Spawns one [`CardCell`] per card with its image, outline and label.
pub fn spawn_cards(
    mut commands: Commands,
    overview: Option<Res<Overview>>,
    cfg: Res<OverviewConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Some(overview) = overview else { return };
    let scene = &overview.0;
    let canvas = scene.size();

    for fitted in scene.cards() {
        let card = &fitted.card;
        let cell = commands
            .spawn((
                CardCell { index: card.index },
                Name::new(format!("Card({}) {}", card.index, card.item.title)),
                Transform::default(),
                Visibility::default(),
            ))
            .id();
        if let Some(link) = card.active_link() {
            commands.entity(cell).insert(Hyperlink(link.to_owned()));
        }

        if let Some(ring) = &card.polygon {
            let world: Vec<Vec2> = ring.iter().map(|p| math::canvas_to_world(*p, canvas)).collect();

            if let Some(image) = &card.image {
                match (fitted.layout.image, image.natural) {
                    (Some(fit), Some(natural)) => {
                        let uvs = ring.iter().map(|p| fit.uv(*p, natural).to_array()).collect();
                        let material = materials.add(ColorMaterial {
                            color: cfg.image_tint,
                            texture: Some(asset_server.load(image.path.clone())),
                            ..default()
                        });
                        let child = commands
                            .spawn((
                                CardImage { index: card.index },
                                Mesh2d(meshes.add(polygon_mesh(&world, uvs))),
                                MeshMaterial2d(material),
                                Transform::from_xyz(0.0, 0.0, 0.0),
                            ))
                            .id();
                        commands.entity(cell).add_child(child);
                    }
                    _ => warn!(
                        "card {}: image {} has no natural size, skipped",
                        card.index, image.path
                    ),
                }
            }

            let uvs = vec![[0.0, 0.0]; world.len()];
            let outline = commands
                .spawn((
                    CellOutline {
                        index: card.index,
                        ring: world.clone(),
                    },
                    Mesh2d(meshes.add(polygon_mesh(&world, uvs))),
                    MeshMaterial2d(materials.add(ColorMaterial::from(OutlineStyle::RESTING.color()))),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                ))
                .id();
            commands.entity(cell).add_child(outline);
        }

        let label = commands.spawn(label_bundle(fitted, canvas, &cfg)).id();
        commands.entity(cell).add_child(label);
    }
}

fn label_bundle(fitted: &FittedCard, canvas: Vec2, cfg: &OverviewConfig) -> impl Bundle {
    let card = &fitted.card;
    let layout = &fitted.layout;
    // Top-left of the estimated box; refined once the real text is measured.
    let top_left = math::canvas_to_world(layout.label_bounds.min + layout.label_shift, canvas);
    let color = if card.label.placeholder {
        cfg.placeholder_label_color
    } else {
        cfg.label_color
    };
    (
        CardLabel {
            index: card.index,
            target: card.centroid.map(|c| math::canvas_to_world(c, canvas)),
        },
        Text2d::new(format!("{}\n{}", card.label.title, card.label.description)),
        TextFont {
            font_size: cfg.metrics.font_size,
            ..default()
        },
        TextColor(color),
        Anchor::TOP_LEFT,
        Transform::from_xyz(top_left.x, top_left.y, 2.0),
    )
}

/// Triangle-fan mesh over a convex ring, wound counter-clockwise.
fn polygon_mesh(ring: &[Vec2], uvs: Vec<[f32; 2]>) -> Mesh {
    let mut positions: Vec<[f32; 3]> = ring.iter().map(|p| [p.x, p.y, 0.0]).collect();
    let mut uvs = uvs;
    if math::signed_area(ring) < 0.0 {
        positions.reverse();
        uvs.reverse();
    }
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(fan_indices(ring.len())))
}

fn fan_indices(vertex_count: usize) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i as u32, i as u32 + 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_of_square_has_two_triangles() {
        assert_eq!(fan_indices(4), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn fan_of_degenerate_rings_is_empty() {
        assert!(fan_indices(0).is_empty());
        assert!(fan_indices(2).is_empty());
    }

    #[test]
    fn mesh_keeps_one_vertex_per_corner() {
        let ring = [Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::new(1.0, 0.0)];
        let mesh = polygon_mesh(&ring, vec![[0.0, 0.0]; 4]);
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(6));
    }
}
