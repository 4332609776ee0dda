use bevy::ecs::system::SystemParam;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hex_garden::{Board, FlowerId};
use rand_chacha::ChaCha8Rng;

use super::GardenConfig;

/// The simulation board. Only garden systems mutate it.
#[derive(Resource)]
pub struct GardenBoard(pub Board);

/// Random source for breeding; seeded from config when reproducibility matters.
#[derive(Resource)]
pub struct GardenRng(pub ChaCha8Rng);

/// Marker for the top-down camera.
#[derive(Component)]
pub struct GardenCamera;

/// Root entity of one flower's visuals.
#[derive(Component, Reflect)]
pub struct Bloom {
    /// Board identity of the flower drawn here.
    pub id: FlowerId,
}

/// Marker on soil tile entities.
#[derive(Component, Reflect)]
pub struct SoilTile;

/// Current rotation and spin speed of a bloom.
#[derive(Component, Reflect, Default)]
pub struct Spin {
    /// Angle in degrees, `[0, 360)`.
    pub degrees: f32,
    /// Revolutions per minute; zero when idle.
    pub rpm: f32,
}

/// Running pulse on a bloom activated by a move. Removed when it ends.
#[derive(Component, Reflect, Default)]
pub struct Pulse {
    /// Seconds since the pulse started.
    pub elapsed: f32,
}

/// Maps flower ids to their spawned [`Bloom`] entities.
#[derive(Resource, Default)]
pub struct BloomEntities {
    /// Lookup from flower to entity.
    pub map: HashMap<FlowerId, Entity>,
}

/// Flower under the pointer, shown in the debug panel.
#[derive(Resource, Default)]
pub struct HoveredBloom(pub Option<FlowerId>);

/// Shared mesh handles.
#[derive(Resource)]
pub struct GardenMeshes {
    /// Unit sphere, scaled into petals and centres.
    pub sphere: Handle<Mesh>,
    /// One flat-top hex, already sized to the board.
    pub tile: Handle<Mesh>,
}

/// Everything needed to spawn a bloom.
#[derive(SystemParam)]
pub struct BloomKit<'w> {
    /// Shared meshes.
    pub meshes: Res<'w, GardenMeshes>,
    /// Material storage; each bloom adds its own colours.
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
    /// Flower → entity lookup, updated on spawn.
    pub entities: ResMut<'w, BloomEntities>,
    /// Garden configuration.
    pub cfg: Res<'w, GardenConfig>,
}
