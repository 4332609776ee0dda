//! Flat-top hexagonal grid in cube coordinates.
//!
//! Everything here is a pure function of its inputs. Cells are small `Copy`
//! values with structural equality, so they double as map keys for the board.
//!
//! See <https://www.redblobgames.com/grids/hexagons/> for the coordinate
//! conventions (cube `x, y, z` with axial `q = x`, `r = z`).

use std::fmt;
use std::ops::{Add, Mul};

use bevy::math::Vec2;

use crate::error::{GardenError, Result};

/// Default hex edge length (centre to corner) in plane units.
pub const DEFAULT_HEX_SIZE: f32 = 23.0;

const SQRT_3: f32 = 1.732_050_8;

/// A cell address with the invariant `x + y + z == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Cell {
    x: i32,
    y: i32,
    z: i32,
}

/// The six unit steps, in the order every walk on the grid uses them.
pub const DIRECTIONS: [Cell; 6] = [
    Cell { x: 1, y: -1, z: 0 },
    Cell { x: 1, y: 0, z: -1 },
    Cell { x: 0, y: 1, z: -1 },
    Cell { x: -1, y: 1, z: 0 },
    Cell { x: -1, y: 0, z: 1 },
    Cell { x: 0, y: -1, z: 1 },
];

impl Cell {
    /// The centre of the board.
    pub const ORIGIN: Cell = Cell { x: 0, y: 0, z: 0 };

    /// Validating constructor: rejects triples that are not cube coordinates.
    ///
    /// ```
    /// # use hex_garden::hex::Cell;
    /// assert!(Cell::new(1, -1, 0).is_ok());
    /// assert!(Cell::new(1, 1, 0).is_err());
    /// ```
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self> {
        if i64::from(x) + i64::from(y) + i64::from(z) != 0 {
            return Err(GardenError::InvalidCell { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Builds a cell from axial `(q, r)`; always valid.
    pub const fn axial(q: i32, r: i32) -> Self {
        Self {
            x: q,
            y: -q - r,
            z: r,
        }
    }

    /// Cube x.
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Cube y.
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Cube z.
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Multiplies every component by `k`.
    pub const fn scale(self, k: i32) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }

    /// The adjacent cell in direction `index` (taken modulo 6).
    pub const fn neighbor(self, index: usize) -> Self {
        let d = DIRECTIONS[index % 6];
        Self {
            x: self.x + d.x,
            y: self.y + d.y,
            z: self.z + d.z,
        }
    }

    /// All six neighbours in direction order `d0..d5`.
    pub fn neighbors(self) -> [Cell; 6] {
        std::array::from_fn(|i| self.neighbor(i))
    }

    /// Hex distance from the origin, `max(|x|, |y|, |z|)`.
    pub fn length(self) -> u32 {
        self.x
            .unsigned_abs()
            .max(self.y.unsigned_abs())
            .max(self.z.unsigned_abs())
    }

    /// Hex distance between two cells.
    pub fn distance(self, other: Cell) -> u32 {
        Cell {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
        .length()
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Mul<i32> for Cell {
    type Output = Cell;

    fn mul(self, k: i32) -> Cell {
        self.scale(k)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// `max(|x|,|y|,|z|) <= radius`.
pub fn is_in_bounds(cell: Cell, radius: u32) -> bool {
    cell.length() <= radius
}

/// Cells at exactly `radius` steps from `center`.
///
/// Starts at `center + d4 * radius` and walks `radius` steps along each of
/// `d0..d5`, so the result holds `6 * radius` cells (just `center` for 0).
pub fn ring(center: Cell, radius: u32) -> Vec<Cell> {
    if radius == 0 {
        return vec![center];
    }
    let steps = radius as i32;
    let mut cells = Vec::with_capacity(6 * radius as usize);
    let mut next = center + DIRECTIONS[4] * steps;
    for direction in DIRECTIONS {
        for _ in 0..steps {
            cells.push(next);
            next = next + direction;
        }
    }
    cells
}

/// `center` followed by rings `1..=max_radius`: `1 + 3r(r+1)` distinct cells.
pub fn spiral(center: Cell, max_radius: u32) -> Vec<Cell> {
    let r = max_radius as usize;
    let mut cells = Vec::with_capacity(1 + 3 * r * (r + 1));
    cells.push(center);
    for radius in 1..=max_radius {
        cells.extend(ring(center, radius));
    }
    cells
}

/// Rounds a fractional cube coordinate to the nearest valid cell.
///
/// Components are rounded independently, then the one with the largest
/// rounding error is rebuilt from the other two. Ties go to `x`, then `y`.
pub fn round_cube(x: f32, y: f32, z: f32) -> Cell {
    let mut rx = x.round();
    let mut ry = y.round();
    let mut rz = z.round();

    let dx = (rx - x).abs();
    let dy = (ry - y).abs();
    let dz = (rz - z).abs();

    if dx >= dy && dx >= dz {
        rx = -ry - rz;
    } else if dy >= dz {
        ry = -rx - rz;
    } else {
        rz = -rx - ry;
    }

    Cell {
        x: rx as i32,
        y: ry as i32,
        z: rz as i32,
    }
}

/// Flat-top projection between cells and plane positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    size: f32,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(DEFAULT_HEX_SIZE)
    }
}

impl HexLayout {
    /// Layout whose hexes have edge length `size`.
    pub const fn new(size: f32) -> Self {
        Self { size }
    }

    /// Edge length of one hex.
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Plane position of a cell centre.
    ///
    /// ```
    /// # use hex_garden::hex::{Cell, HexLayout};
    /// let layout = HexLayout::new(2.0);
    /// assert_eq!(layout.center(Cell::ORIGIN).x, 0.0);
    /// assert_eq!(layout.center(Cell::axial(2, 0)).x, 6.0);
    /// ```
    pub fn center(&self, cell: Cell) -> Vec2 {
        let x = cell.x as f32;
        let z = cell.z as f32;
        Vec2::new(
            x * 1.5 * self.size,
            (z + x / 2.0) * SQRT_3 * self.size,
        )
    }

    /// The cell whose hexagon contains `point`.
    pub fn cell_from_point(&self, point: Vec2) -> Cell {
        let q = (2.0 / 3.0) * point.x / self.size;
        let r = (-point.x / 3.0 + (SQRT_3 / 3.0) * point.y) / self.size;
        round_cube(q, -q - r, r)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    // ── Cell ────────────────────────────────────────────────────────

    #[test]
    fn new_rejects_non_cube_triples() {
        assert_eq!(
            Cell::new(1, 1, 1),
            Err(GardenError::InvalidCell { x: 1, y: 1, z: 1 })
        );
        assert_eq!(Cell::new(2, -3, 1).map(|c| c.y()), Ok(-3));
    }

    #[test]
    fn new_rejects_triples_whose_sum_overflows() {
        // Wrapping i32 addition would sum these to 0.
        assert!(Cell::new(i32::MAX, i32::MAX, 2).is_err());
        assert!(Cell::new(i32::MIN, i32::MAX, 1).is_ok());
    }

    #[test]
    fn directions_are_unit_and_opposed() {
        for (i, d) in DIRECTIONS.iter().enumerate() {
            assert_eq!(d.x() + d.y() + d.z(), 0);
            assert_eq!(d.length(), 1);
            assert_eq!(*d + DIRECTIONS[(i + 3) % 6], Cell::ORIGIN, "d{i} has no opposite");
        }
    }

    #[test]
    fn add_and_scale_keep_invariant() {
        let a = Cell::axial(3, -1);
        let b = DIRECTIONS[2] * 4;
        let sum = a + b;
        assert_eq!(sum.x() + sum.y() + sum.z(), 0);
        assert_eq!(sum, Cell::axial(3, -5));
    }

    #[test]
    fn distance_is_max_component() {
        assert_eq!(Cell::ORIGIN.distance(Cell::axial(2, 1)), 3);
        assert_eq!(Cell::axial(-1, 0).distance(Cell::axial(1, 0)), 2);
    }

    // ── Rings & spirals ─────────────────────────────────────────────

    #[test]
    fn ring_zero_is_center() {
        let c = Cell::axial(1, 1);
        assert_eq!(ring(c, 0), vec![c]);
    }

    #[test]
    fn ring_has_six_r_cells_at_distance_r() {
        let center = Cell::axial(-2, 1);
        for r in 1..=6 {
            let cells = ring(center, r);
            assert_eq!(cells.len(), 6 * r as usize);
            assert!(cells.iter().all(|c| c.distance(center) == r));
        }
    }

    #[test]
    fn ring_starts_at_d4() {
        let cells = ring(Cell::ORIGIN, 2);
        assert_eq!(cells[0], DIRECTIONS[4] * 2);
        assert_eq!(cells[1], DIRECTIONS[4] * 2 + DIRECTIONS[0]);
    }

    #[test]
    fn spiral_count_and_distinct() {
        for r in 0..=7u32 {
            let cells = spiral(Cell::ORIGIN, r);
            let expected = 1 + 3 * r * (r + 1);
            assert_eq!(cells.len(), expected as usize);
            let unique: HashSet<Cell> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len(), "duplicates at radius {r}");
        }
    }

    #[test]
    fn spiral_cells_are_valid_and_bounded() {
        let r = 5;
        for c in spiral(Cell::ORIGIN, r) {
            assert_eq!(c.x() + c.y() + c.z(), 0);
            assert!(is_in_bounds(c, r), "{c} escapes radius {r}");
        }
    }

    #[test]
    fn spiral_starts_at_center_then_ring_one() {
        let cells = spiral(Cell::ORIGIN, 1);
        assert_eq!(cells[0], Cell::ORIGIN);
        assert_eq!(&cells[1..], ring(Cell::ORIGIN, 1).as_slice());
    }

    #[test]
    fn bounds_check() {
        assert!(is_in_bounds(Cell::axial(3, -3), 3));
        assert!(!is_in_bounds(Cell::axial(4, -1), 3));
    }

    // ── Projection ──────────────────────────────────────────────────

    #[test]
    fn center_matches_flat_top_formula() {
        let layout = HexLayout::new(23.0);
        let p = layout.center(DIRECTIONS[0]);
        assert!((p.x - 34.5).abs() < 1e-4);
        assert!((p.y - 0.5 * SQRT_3 * 23.0).abs() < 1e-4);

        let p = layout.center(Cell::axial(0, 1));
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - SQRT_3 * 23.0).abs() < 1e-4);
    }

    #[test]
    fn point_roundtrip_within_five() {
        let layout = HexLayout::default();
        for c in spiral(Cell::ORIGIN, 5) {
            let back = layout.cell_from_point(layout.center(c));
            assert_eq!(back, c, "roundtrip failed for {c}");
        }
    }

    #[test]
    fn point_near_center_snaps_to_cell() {
        let layout = HexLayout::new(10.0);
        for c in spiral(Cell::ORIGIN, 3) {
            let p = layout.center(c) + Vec2::new(3.0, -4.0);
            assert_eq!(layout.cell_from_point(p), c);
        }
    }

    #[test]
    fn round_cube_restores_invariant() {
        // Independent rounding gives (0, 0, -1), which sums to -1.
        let c = round_cube(0.4, 0.2, 0.6 - 1.2);
        assert_eq!(c.x() + c.y() + c.z(), 0);

        let c = round_cube(1.4, -0.3, -1.1);
        assert_eq!(c, Cell::axial(1, -1));
    }

    #[test]
    fn round_cube_tie_prefers_x() {
        // Rounds to (1, 1, -1) with dx == dy == 0.5. Rebuilding y instead
        // would give (1, 0, -1).
        assert_eq!(round_cube(0.5, 0.5, -1.0), Cell::axial(0, -1));
    }

    #[test]
    fn round_cube_tie_prefers_y_over_z() {
        // Rounds to (-1, 1, 1) with dy == dz == 0.5. Rebuilding z instead
        // would give (-1, 1, 0).
        assert_eq!(round_cube(-1.0, 0.5, 0.5), Cell::axial(-1, 1));
    }
}
