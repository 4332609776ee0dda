use bevy::asset::RenderAssetUsages;
use bevy::ecs::error::Result;
use bevy::mesh::Indices;
use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use hex_garden::{Board, FlowerId, Genome, HexLayout, math};
use hexx::PlaneMeshBuilder;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::GardenConfig;
use super::entities::{
    Bloom, BloomKit, GardenBoard, GardenCamera, GardenMeshes, GardenRng, SoilTile, Spin,
};
use super::systems;

// ── Startup ─────────────────────────────────────────────────────────

/// Top-down camera far enough up to frame the whole board.
pub fn spawn_camera(mut commands: Commands, cfg: Res<GardenConfig>) {
    let extent = math::board_extent(cfg.board.radius, cfg.board.hex_size);
    let height = math::framing_distance(extent, std::f32::consts::FRAC_PI_4) * 1.15;
    commands.spawn((
        Name::new("GardenCamera"),
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_4,
            ..default()
        }),
        // -Z is screen-up, so plane y grows downwards on screen.
        Transform::from_xyz(0.0, height, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z),
        GardenCamera,
    ));
}

/// Builds the shared sphere and the flat-top tile mesh.
pub fn load_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    cfg: Res<GardenConfig>,
) {
    let tile_layout = hexx::HexLayout {
        orientation: hexx::HexOrientation::Flat,
        scale: Vec2::splat(cfg.board.hex_size * cfg.board.tile_scale),
        ..default()
    };
    let info = PlaneMeshBuilder::new(&tile_layout).build();
    let tile = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, info.uvs)
    .with_inserted_indices(Indices::U16(info.indices));

    commands.insert_resource(GardenMeshes {
        sphere: meshes.add(Sphere::new(1.0)),
        tile: meshes.add(tile),
    });
}

/// Creates the board, seeds it, and spawns a bloom for every flower.
pub fn plant_garden(mut commands: Commands, mut kit: BloomKit) -> Result {
    let settings = &kit.cfg.board;
    let mut board = Board::new(settings.radius, HexLayout::new(settings.hex_size))?;
    let mut rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    let planted = board.seed(settings.layout, &mut rng)?;
    info!(
        radius = board.radius(),
        layout = ?settings.layout,
        seed = ?settings.seed,
        flowers = planted.len(),
        "garden planted"
    );

    let lift = kit.cfg.bloom.lift;
    for id in planted {
        let Some((genome, cell)) = board
            .flower(id)
            .and_then(|f| f.cell().map(|c| (*f.genome(), c)))
        else {
            continue;
        };
        let at = systems::cell_translation(&board, cell, lift);
        spawn_bloom(&mut commands, &mut kit, id, &genome, at);
    }

    commands.insert_resource(GardenBoard(board));
    commands.insert_resource(GardenRng(rng));
    Ok(())
}

/// One noise-tinted tile per board cell, in spiral order.
pub fn spawn_soil(
    mut commands: Commands,
    garden: Res<GardenBoard>,
    meshes: Res<GardenMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<GardenConfig>,
) {
    let g = &cfg.board;
    let soil: Fbm<Perlin> = Fbm::new(g.soil_noise_seed).set_octaves(g.soil_noise_octaves);
    let board = &garden.0;

    let root = commands
        .spawn((Name::new("Soil"), Transform::default(), Visibility::default()))
        .id();

    board.for_each_cell(|cell| {
        let pos = board.center(cell);
        let n = soil.get([
            pos.x as f64 / g.soil_noise_scale,
            pos.y as f64 / g.soil_noise_scale,
        ]);
        let lightness = math::map_noise_to_range(n, g.soil_min_lightness, g.soil_max_lightness);
        let material = materials.add(unlit(Color::hsl(g.soil_hue, 0.35, lightness)));

        let tile = commands
            .spawn((
                SoilTile,
                Name::new(format!("Soil{cell}")),
                Mesh3d(meshes.tile.clone()),
                MeshMaterial3d(material),
                Transform::from_xyz(pos.x, 0.0, pos.y),
                Pickable::IGNORE,
            ))
            .id();
        commands.entity(root).add_child(tile);
    });
}

// ── Bloom spawning ──────────────────────────────────────────────────

/// Spawns the visuals for one flower and wires up its pointer observers.
///
/// Layout: root (position, spin, pulse scale) → one pivot per petal, rotated
/// about Y → two gradient bands along +X. The centre disc sits on top.
pub(super) fn spawn_bloom(
    commands: &mut Commands,
    kit: &mut BloomKit,
    id: FlowerId,
    genome: &Genome,
    at: Vec3,
) {
    let b = &kit.cfg.bloom;
    let petals = genome.petal_count();
    let half_width = math::petal_half_width(petals);
    let [c0, c1, c2] = genome.petal_colors();
    let bands = math::gradient_bands(genome.petal_gradient_stops());
    let band_materials = [math::blend(c0, c1), math::blend(c1, c2)]
        .map(|color| kit.materials.add(unlit(color)));
    let center_material = kit.materials.add(unlit(genome.center_color()));
    let center_size = genome.center_size();

    let root = commands
        .spawn((
            Bloom { id },
            Spin::default(),
            Name::new(format!("Bloom{id}")),
            Transform::from_translation(at),
            Visibility::default(),
        ))
        .id();

    for i in 0..petals {
        let pivot = commands
            .spawn((
                Transform::from_rotation(Quat::from_rotation_y(math::petal_angle(i, petals, 0.0))),
                Visibility::default(),
            ))
            .id();
        for (&(start, end), material) in bands.iter().zip(&band_materials) {
            let half_length = b.petal_length * (end - start) / 2.0;
            if half_length <= 0.0 {
                continue;
            }
            let band = commands
                .spawn((
                    Mesh3d(kit.meshes.sphere.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_xyz(b.petal_length * (start + end) / 2.0, 0.0, 0.0)
                        .with_scale(Vec3::new(half_length, b.petal_thickness, half_width)),
                ))
                .id();
            commands.entity(pivot).add_child(band);
        }
        commands.entity(root).add_child(pivot);
    }

    let center = commands
        .spawn((
            Mesh3d(kit.meshes.sphere.clone()),
            MeshMaterial3d(center_material),
            Transform::from_xyz(0.0, b.petal_thickness, 0.0).with_scale(Vec3::new(
                center_size,
                b.petal_thickness,
                center_size,
            )),
        ))
        .id();
    commands.entity(root).add_child(center);

    commands
        .entity(root)
        .observe(systems::drag_bloom)
        .observe(systems::drop_bloom)
        .observe(systems::hover_bloom);

    kit.entities.map.insert(id, root);
}

pub(super) fn unlit(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    }
}
