use bevy::prelude::*;
use bevy_egui::egui;
use hex_garden::{Board, Cell, Flower, FlowerId, MoveOutcome, math};
use rand::Rng;

use super::GardenConfig;
use super::entities::{
    Bloom, BloomKit, GardenBoard, GardenCamera, GardenRng, HoveredBloom, Pulse, Spin,
};
use super::startup_systems::spawn_bloom;

// ── Pure helpers ────────────────────────────────────────────────────

/// World position of a cell centre at `height` above the soil.
pub(super) fn cell_translation(board: &Board, cell: Cell, height: f32) -> Vec3 {
    let p = board.center(cell);
    Vec3::new(p.x, height, p.y)
}

/// Cell a drop at plane `point` should move to, if any.
///
/// Off-board, occupied, and same-cell drops all snap back.
fn drop_target(board: &Board, origin: Cell, point: Vec2) -> Option<Cell> {
    let cell = board.cell_from_point(point);
    if cell == origin || !matches!(board.is_occupied(cell), Ok(false)) {
        return None;
    }
    Some(cell)
}

/// Moves `id` to `target` and breeds around it.
fn move_and_breed<R: Rng + ?Sized>(
    board: &mut Board,
    id: FlowerId,
    target: Cell,
    rng: &mut R,
) -> hex_garden::Result<MoveOutcome> {
    board.set(target, id)?;
    board.resolve_move_at(target, rng)
}

/// Plane point under a viewport position, via the ground plane `y = 0`.
fn ground_point(camera: &Camera, cam_tf: &GlobalTransform, cursor: Vec2) -> Option<Vec2> {
    let ray = camera.viewport_to_world(cam_tf, cursor).ok()?;
    let distance = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))?;
    let hit = ray.get_point(distance);
    Some(Vec2::new(hit.x, hit.z))
}

// ── Pointer observers ───────────────────────────────────────────────

/// Carries a bloom under the pointer, lifted off the soil.
pub(super) fn drag_bloom(
    drag: On<Pointer<Drag>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<GardenCamera>>,
    mut blooms: Query<&mut Transform, With<Bloom>>,
    cfg: Res<GardenConfig>,
) {
    let Ok((camera, cam_tf)) = camera_q.single() else {
        return;
    };
    let Some(point) = ground_point(camera, cam_tf, drag.pointer_location.position) else {
        return;
    };
    if let Ok(mut transform) = blooms.get_mut(drag.entity) {
        transform.translation = Vec3::new(point.x, cfg.bloom.drag_lift, point.y);
    }
}

/// Commits a drag: moves the flower on the board, breeds, and pulses the
/// activated blooms. Invalid drops snap back to where the flower was.
pub(super) fn drop_bloom(
    drag_end: On<Pointer<DragEnd>>,
    mut commands: Commands,
    camera_q: Query<(&Camera, &GlobalTransform), With<GardenCamera>>,
    mut blooms: Query<(&Bloom, &mut Transform)>,
    mut garden: ResMut<GardenBoard>,
    mut rng: ResMut<GardenRng>,
    mut kit: BloomKit,
) {
    let Ok((bloom, mut transform)) = blooms.get_mut(drag_end.entity) else {
        return;
    };
    let id = bloom.id;
    let Some(origin) = garden.0.flower(id).and_then(Flower::cell) else {
        warn!(flower = %id, "dropped a bloom with no cell");
        return;
    };

    let cursor = drag_end.pointer_location.position;
    let target = camera_q
        .single()
        .ok()
        .and_then(|(camera, cam_tf)| ground_point(camera, cam_tf, cursor))
        .and_then(|point| drop_target(&garden.0, origin, point));
    let board = &mut garden.0;

    if let Some(target) = target {
        match move_and_breed(board, id, target, &mut rng.0) {
            Ok(outcome) => {
                info!(
                    flower = %id,
                    from = %origin,
                    to = %target,
                    activated = outcome.activated.len(),
                    spawned = outcome.spawned.len(),
                    "moved"
                );
                let lift = kit.cfg.bloom.lift;
                for (child, cell) in outcome.spawned {
                    let Some(genome) = board.flower(child).map(|f| *f.genome()) else {
                        continue;
                    };
                    let at = cell_translation(board, cell, lift);
                    spawn_bloom(&mut commands, &mut kit, child, &genome, at);
                }
                for active in outcome.activated {
                    if let Some(&entity) = kit.entities.map.get(&active) {
                        commands.entity(entity).insert(Pulse::default());
                    }
                }
            }
            Err(err) => warn!(flower = %id, %target, "move failed: {err}"),
        }
    }

    let settled = board.flower(id).and_then(Flower::cell).unwrap_or(origin);
    transform.translation = cell_translation(board, settled, kit.cfg.bloom.lift);
}

/// Remembers the bloom under the pointer for the debug panel.
pub(super) fn hover_bloom(
    over: On<Pointer<Over>>,
    blooms: Query<&Bloom>,
    mut hovered: ResMut<HoveredBloom>,
) {
    if let Ok(bloom) = blooms.get(over.entity) {
        hovered.0 = Some(bloom.id);
    }
}

// ── Animation ───────────────────────────────────────────────────────

/// Advances spins and pulses; a finished pulse stops the spin.
pub fn animate_blooms(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GardenConfig>,
    mut blooms: Query<(Entity, &mut Spin, &mut Transform, Option<&mut Pulse>)>,
) {
    let dt = time.delta_secs();
    let b = &cfg.bloom;

    for (entity, mut spin, mut transform, pulse) in &mut blooms {
        let mut scale = 1.0;
        if let Some(mut pulse) = pulse {
            pulse.elapsed += dt;
            let frame =
                math::pulse_frame(pulse.elapsed, b.pulse_duration, b.pulse_amplitude, b.pulse_rpm);
            match frame {
                Some(frame) => {
                    scale = frame.scale;
                    spin.rpm = frame.rpm;
                }
                None => {
                    spin.rpm = 0.0;
                    commands.entity(entity).remove::<Pulse>();
                }
            }
        }
        spin.degrees = math::advance_spin(spin.degrees, spin.rpm, dt);
        transform.rotation = Quat::from_rotation_y(spin.degrees.to_radians());
        transform.scale = Vec3::splat(scale);
    }
}

// ── Debug panel ─────────────────────────────────────────────────────

/// Shows the genome and phenotype of the hovered flower.
pub fn draw_flower_panel(
    mut egui_ctx: Query<&mut bevy_egui::EguiContext>,
    garden: Option<Res<GardenBoard>>,
    hovered: Res<HoveredBloom>,
    mut ready: Local<bool>,
) {
    if !*ready {
        *ready = true;
        return;
    }
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let Some(garden) = garden else {
        return;
    };
    let board = &garden.0;

    egui::Window::new("Flower")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
        .resizable(false)
        .show(ctx.get_mut(), |ui| {
            ui.label(format!("flowers: {}", board.len()));
            let Some((id, flower)) = hovered.0.and_then(|id| board.flower(id).map(|f| (id, f)))
            else {
                ui.label("hover a flower");
                return;
            };
            let genome = flower.genome();
            let [start, mid, end] = genome.petal_gradient_stops();
            ui.separator();
            ui.label(format!("flower {id}"));
            if let Some(cell) = flower.cell() {
                ui.label(format!("cell {cell}"));
            }
            ui.monospace(genome.to_string());
            ui.label(format!("petals: {}", genome.petal_count()));
            ui.label(format!("gradient: {start} / {mid} / {end}"));
            ui.label(format!("centre: {:.2}", genome.center_size()));
        });
}

#[cfg(test)]
mod tests {
    use hex_garden::{Genome, HexLayout, SeedLayout};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn board_with_flower_at(cell: Cell) -> Board {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut board = Board::new(2, HexLayout::default()).unwrap();
        board.plant(cell, Genome::random(&mut rng)).unwrap();
        board
    }

    // ── drop_target ─────────────────────────────────────────────────

    #[test]
    fn drop_on_empty_cell_moves() {
        let board = board_with_flower_at(Cell::ORIGIN);
        let target = Cell::axial(1, 0);
        let point = board.center(target);
        assert_eq!(drop_target(&board, Cell::ORIGIN, point), Some(target));
    }

    #[test]
    fn drop_on_own_cell_snaps_back() {
        let board = board_with_flower_at(Cell::ORIGIN);
        assert_eq!(drop_target(&board, Cell::ORIGIN, Vec2::new(1.0, -1.0)), None);
    }

    #[test]
    fn drop_off_board_snaps_back() {
        let board = board_with_flower_at(Cell::ORIGIN);
        let far = board.center(Cell::axial(5, 0));
        assert_eq!(drop_target(&board, Cell::ORIGIN, far), None);
    }

    #[test]
    fn drop_on_occupied_cell_snaps_back() {
        let mut board = board_with_flower_at(Cell::ORIGIN);
        let other = Cell::axial(0, 1);
        board
            .plant(other, Genome::random(&mut ChaCha8Rng::seed_from_u64(4)))
            .unwrap();
        assert_eq!(drop_target(&board, Cell::ORIGIN, board.center(other)), None);
    }

    // ── move_and_breed ──────────────────────────────────────────────

    #[test]
    fn move_updates_board_and_returns_outcome() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut board = Board::new(2, HexLayout::default()).unwrap();
        board.seed(SeedLayout::Corners, &mut rng).unwrap();
        let (id, origin) = board
            .flowers()
            .find_map(|(id, f)| f.cell().map(|c| (id, c)))
            .unwrap();

        let target = Cell::ORIGIN;
        let outcome = move_and_breed(&mut board, id, target, &mut rng).unwrap();

        assert_eq!(board.get(target).unwrap(), Some(id));
        assert_eq!(board.get(origin).unwrap(), None);
        assert_eq!(outcome.activated.first(), Some(&id));
    }

    #[test]
    fn cell_translation_maps_plane_y_to_world_z() {
        let board = Board::new(1, HexLayout::new(10.0)).unwrap();
        let cell = Cell::axial(0, 1);
        let p = board.center(cell);
        assert_eq!(cell_translation(&board, cell, 2.0), Vec3::new(p.x, 2.0, p.y));
    }
}
