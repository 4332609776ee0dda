//! Garden: soil tiles, flower visuals, drag-to-breed, pulses.
//!
//! Owns the simulation [`Board`](hex_garden::Board) as a resource and is the
//! only place that turns its state into meshes. The board itself never sees
//! an entity or a material.

mod entities;
mod startup_systems;
mod systems;

use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use hex_garden::SeedLayout;
use hex_garden::hex::DEFAULT_HEX_SIZE;

use crate::GameState;

/// Nested configuration for the garden subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct GardenConfig {
    /// Board shape and soil look.
    pub board: BoardSettings,
    /// Flower geometry and animation.
    pub bloom: BloomSettings,
    /// Background clear color.
    pub clear_color: Color,
}

/// Board size, projection and seeding.
#[derive(Clone, Debug, Reflect)]
pub struct BoardSettings {
    /// Rings around the centre cell.
    pub radius: u32,
    /// Hex edge length in world units.
    pub hex_size: f32,
    /// Seed for breeding and initial genomes; random when `None`.
    pub seed: Option<u64>,
    /// Initial flower placement.
    pub layout: SeedLayout,
    /// Visual tile size relative to `hex_size` (below 1 leaves a gap).
    pub tile_scale: f32,
    /// Seed for the soil tint noise.
    pub soil_noise_seed: u32,
    /// Octaves for the soil tint noise.
    pub soil_noise_octaves: usize,
    /// Spatial scale divisor for soil noise sampling.
    pub soil_noise_scale: f64,
    /// Soil hue in degrees.
    pub soil_hue: f32,
    /// Darkest soil lightness.
    pub soil_min_lightness: f32,
    /// Brightest soil lightness.
    pub soil_max_lightness: f32,
}

/// Flower geometry and pulse animation.
#[derive(Clone, Debug, Reflect)]
pub struct BloomSettings {
    /// Petal length from centre to tip.
    pub petal_length: f32,
    /// Vertical half-thickness of petal and centre discs.
    pub petal_thickness: f32,
    /// Resting height above the soil.
    pub lift: f32,
    /// Height while being dragged.
    pub drag_lift: f32,
    /// Seconds a pulse lasts.
    pub pulse_duration: f32,
    /// Extra scale at the peak of a pulse.
    pub pulse_amplitude: f32,
    /// Spin speed at the start of a pulse.
    pub pulse_rpm: f32,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            board: BoardSettings {
                radius: 3,
                hex_size: DEFAULT_HEX_SIZE,
                seed: None,
                layout: SeedLayout::Corners,
                tile_scale: 0.94,
                soil_noise_seed: 7,
                soil_noise_octaves: 3,
                soil_noise_scale: 90.0,
                soil_hue: 28.0,
                soil_min_lightness: 0.08,
                soil_max_lightness: 0.2,
            },
            bloom: BloomSettings {
                petal_length: 20.0,
                petal_thickness: 0.6,
                lift: 1.0,
                drag_lift: 8.0,
                pulse_duration: 0.6,
                pulse_amplitude: 0.25,
                pulse_rpm: 45.0,
            },
            clear_color: Color::srgb(0.03, 0.04, 0.03),
        }
    }
}

/// Garden plugin: board + camera at startup, drag/breed and pulses at runtime.
pub struct GardenPlugin(pub GardenConfig);

impl Plugin for GardenPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GardenConfig>()
            .register_type::<entities::Bloom>()
            .register_type::<entities::SoilTile>()
            .register_type::<entities::Spin>()
            .register_type::<entities::Pulse>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<entities::BloomEntities>()
            .init_resource::<entities::HoveredBloom>()
            .add_plugins(MeshPickingPlugin)
            .add_systems(
                Startup,
                (
                    startup_systems::spawn_camera,
                    startup_systems::load_meshes,
                    startup_systems::plant_garden,
                    startup_systems::spawn_soil,
                )
                    .chain(),
            )
            .add_systems(Update, systems::animate_blooms);

        app.add_systems(
            Update,
            systems::draw_flower_panel.run_if(in_state(GameState::Debugging)),
        );
    }
}
