//! Bounded hex board, flower identity, and move resolution (breeding).

use std::fmt;

use bevy::log::{debug, trace};
use bevy::math::Vec2;
use bevy::platform::collections::HashMap;
use bevy::reflect::Reflect;
use rand::Rng;

use crate::error::{GardenError, Result};
use crate::genome::Genome;
use crate::hex::{self, Cell, DIRECTIONS, HexLayout};

/// Stable identity of a flower for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct FlowerId(u64);

impl fmt::Display for FlowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A flower owned by the board: a fixed genome and its current cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    genome: Genome,
    cell: Option<Cell>,
}

impl Flower {
    /// Genome assigned at creation.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Cell the flower currently occupies, if any.
    pub fn cell(&self) -> Option<Cell> {
        self.cell
    }
}

/// How [`Board::seed`] populates a fresh board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SeedLayout {
    /// One random flower in each of the six corners.
    #[default]
    Corners,
    /// Every cell, each genome mixed with the previously planted one.
    Full,
    /// No flowers.
    Empty,
}

/// What a call to [`Board::resolve_move_at`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveOutcome {
    /// The moved flower followed by its neighbours, in direction order.
    pub activated: Vec<FlowerId>,
    /// Flowers created by the move, with the cells they were planted in.
    pub spawned: Vec<(FlowerId, Cell)>,
}

/// Sparse occupancy of a hexagon-shaped board.
///
/// Every key of the map is in bounds, and each flower is referenced by at
/// most one cell.
#[derive(Debug, Clone)]
pub struct Board {
    radius: u32,
    layout: HexLayout,
    cells: HashMap<Cell, FlowerId>,
    flowers: HashMap<FlowerId, Flower>,
    next_id: u64,
}

impl Board {
    /// An empty board spanning `radius` rings around the origin.
    pub fn new(radius: u32, layout: HexLayout) -> Result<Self> {
        if radius == 0 {
            return Err(GardenError::InvalidRadius(radius));
        }
        Ok(Self {
            radius,
            layout,
            cells: HashMap::new(),
            flowers: HashMap::new(),
            next_id: 0,
        })
    }

    /// Number of rings around the centre cell.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Plane projection used by [`Board::center`].
    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    // ── Geometry ────────────────────────────────────────────────────

    /// Whether `cell` lies on this board.
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        hex::is_in_bounds(cell, self.radius)
    }

    fn check(&self, cell: Cell) -> Result<()> {
        if self.is_in_bounds(cell) {
            Ok(())
        } else {
            Err(GardenError::OutOfBounds {
                cell,
                radius: self.radius,
            })
        }
    }

    /// Plane position of a cell centre.
    pub fn center(&self, cell: Cell) -> Vec2 {
        self.layout.center(cell)
    }

    /// Cell under a plane position; may be out of bounds.
    pub fn cell_from_point(&self, point: Vec2) -> Cell {
        self.layout.cell_from_point(point)
    }

    /// Calls `f` for every cell on the board in spiral order.
    pub fn for_each_cell(&self, mut f: impl FnMut(Cell)) {
        for cell in hex::spiral(Cell::ORIGIN, self.radius) {
            f(cell);
        }
    }

    // ── Occupancy ───────────────────────────────────────────────────

    /// Flower occupying `cell`.
    pub fn get(&self, cell: Cell) -> Result<Option<FlowerId>> {
        self.check(cell)?;
        Ok(self.cells.get(&cell).copied())
    }

    /// Whether some flower occupies `cell`.
    pub fn is_occupied(&self, cell: Cell) -> Result<bool> {
        self.check(cell)?;
        Ok(self.cells.contains_key(&cell))
    }

    /// Looks up a flower record.
    pub fn flower(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.get(&id)
    }

    /// Every flower record, in no particular order, including displaced
    /// flowers that hold no cell.
    pub fn flowers(&self) -> impl Iterator<Item = (FlowerId, &Flower)> {
        self.flowers.iter().map(|(&id, flower)| (id, flower))
    }

    /// Number of flowers standing on a cell.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Creates a flower with `genome` and places it at `cell`.
    pub fn plant(&mut self, cell: Cell, genome: Genome) -> Result<FlowerId> {
        self.check(cell)?;
        let id = FlowerId(self.next_id);
        self.next_id += 1;
        self.flowers.insert(id, Flower { genome, cell: None });
        self.set(cell, id)?;
        Ok(id)
    }

    /// Moves flower `id` to `cell`, dropping its previous mapping first.
    ///
    /// Returns any other flower that was standing on `cell`. Its record is
    /// kept so the caller can `set` it somewhere else; until then it does not
    /// count towards [`Board::len`].
    pub fn set(&mut self, cell: Cell, id: FlowerId) -> Result<Option<FlowerId>> {
        self.check(cell)?;
        let previous = self
            .flowers
            .get(&id)
            .ok_or(GardenError::UnknownFlower(id))?
            .cell;

        if let Some(old) = previous {
            self.cells.remove(&old);
        }
        let displaced = self.cells.insert(cell, id).filter(|&other| other != id);
        if let Some(other) = displaced
            && let Some(flower) = self.flowers.get_mut(&other)
        {
            flower.cell = None;
        }
        if let Some(flower) = self.flowers.get_mut(&id) {
            flower.cell = Some(cell);
        }
        trace!(flower = %id, from = ?previous, to = %cell, "set");
        Ok(displaced)
    }

    /// Removes whatever flower occupies `cell` from the board entirely.
    pub fn clear(&mut self, cell: Cell) -> Result<Option<Flower>> {
        self.check(cell)?;
        let Some(id) = self.cells.remove(&cell) else {
            return Ok(None);
        };
        Ok(self.flowers.remove(&id).map(|mut flower| {
            flower.cell = None;
            flower
        }))
    }

    // ── Breeding ────────────────────────────────────────────────────

    /// Breeds into the empty cells around `target` after a flower moved there.
    ///
    /// The moved flower and its neighbours are activated. Each empty in-bounds
    /// neighbour of `target` that touches two or more activated flowers gets a
    /// new flower whose genome mixes theirs. Every decision reads the board as
    /// it was before this call; new flowers never breed in the same call.
    pub fn resolve_move_at<R: Rng + ?Sized>(
        &mut self,
        target: Cell,
        rng: &mut R,
    ) -> Result<MoveOutcome> {
        self.check(target)?;

        let mut activated = Vec::with_capacity(DIRECTIONS.len() + 1);
        activated.extend(self.cells.get(&target).copied());
        activated.extend(
            target
                .neighbors()
                .iter()
                .filter_map(|n| self.cells.get(n).copied()),
        );

        let candidates: Vec<Cell> = target
            .neighbors()
            .into_iter()
            .filter(|c| self.is_in_bounds(*c) && !self.cells.contains_key(c))
            .collect();

        let mut scheduled = Vec::new();
        for cell in candidates {
            let parents: Vec<Genome> = cell
                .neighbors()
                .iter()
                .filter_map(|n| self.cells.get(n))
                .filter(|id| activated.contains(id))
                .filter_map(|id| self.flowers.get(id))
                .map(|flower| flower.genome)
                .collect();
            if parents.len() >= 2 {
                scheduled.push((cell, Genome::mix(&parents, rng)?));
            }
        }

        let mut spawned = Vec::with_capacity(scheduled.len());
        for (cell, genome) in scheduled {
            let id = self.plant(cell, genome)?;
            debug!(flower = %id, %cell, %genome, "spawned");
            spawned.push((id, cell));
        }

        debug!(
            %target,
            activated = activated.len(),
            spawned = spawned.len(),
            "resolved move"
        );
        Ok(MoveOutcome { activated, spawned })
    }

    /// Fills empty cells according to `layout`, returning the new flowers.
    pub fn seed<R: Rng + ?Sized>(&mut self, layout: SeedLayout, rng: &mut R) -> Result<Vec<FlowerId>> {
        let mut planted = Vec::new();
        match layout {
            SeedLayout::Corners => {
                let reach = self.radius as i32;
                for direction in DIRECTIONS {
                    let cell = direction * reach;
                    if !self.cells.contains_key(&cell) {
                        planted.push(self.plant(cell, Genome::random(rng))?);
                    }
                }
            }
            SeedLayout::Full => {
                let mut last = Genome::random(rng);
                for cell in hex::spiral(Cell::ORIGIN, self.radius) {
                    if self.cells.contains_key(&cell) {
                        continue;
                    }
                    let genome = Genome::mix(&[Genome::random(rng), last], rng)?;
                    planted.push(self.plant(cell, genome)?);
                    last = genome;
                }
            }
            SeedLayout::Empty => {}
        }
        Ok(planted)
    }
}
