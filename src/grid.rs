use crate::config::check_dimensions;
use crate::error::Result;
use crate::render::SemanticColor;
use core::fmt;
use grid_util::point::Point;
use log::{debug, warn};
use petgraph::unionfind::UnionFind;
use rand::Rng;
use smallvec::SmallVec;

/// Index of a cell in its [Grid], fixed when the grid is built.
pub type CellId = usize;

/// Endpoint role of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Free,
    Source,
    Destination,
}

/// A single square of the grid. `position` is the pixel coordinate of its top-left corner, the
/// `g`, `h` and `f` fields are scratch values written by the best-first searches.
#[derive(Clone, Debug)]
pub struct Cell {
    pub index: CellId,
    pub position: Point,
    pub active: bool,
    pub role: Role,
    pub g: u32,
    pub h: f64,
    pub f: f64,
}

impl Cell {
    fn new(index: CellId, position: Point) -> Cell {
        Cell {
            index,
            position,
            active: true,
            role: Role::Free,
            g: 0,
            h: 0.0,
            f: 0.0,
        }
    }

    pub fn is_endpoint(&self) -> bool {
        self.role != Role::Free
    }

    /// Color the collaborator should use when the cell is not marked by a run.
    pub fn color(&self) -> SemanticColor {
        match self.role {
            Role::Source => SemanticColor::Source,
            Role::Destination => SemanticColor::Destination,
            Role::Free if !self.active => SemanticColor::Wall,
            Role::Free => SemanticColor::Idle,
        }
    }

    fn reset_scratch(&mut self) {
        self.g = 0;
        self.h = 0.0;
        self.f = 0.0;
    }
}

/// Straight-line distance between two cell positions.
pub fn euclidean(p1: &Point, p2: &Point) -> f64 {
    (squared_distance(p1, p2) as f64).sqrt()
}

pub fn squared_distance(p1: &Point, p2: &Point) -> i64 {
    let dx = (p1.x - p2.x) as i64;
    let dy = (p1.y - p2.y) as i64;
    dx * dx + dy * dy
}

/// [Grid] owns the cells of the canvas laid out column by column, one pixel apart, together with
/// the source and destination assignment. Connectivity of active cells is tracked with a
/// [UnionFind] structure that is flagged dirty whenever a wall is placed and regenerated on the
/// next query.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Cell>,
    columns: usize,
    rows: usize,
    cell_size: i32,
    source: Option<CellId>,
    destination: Option<CellId>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Builds a grid of `columns` x `rows` active cells. Cell sizes below one pixel are raised to
    /// one.
    ///
    /// Panics if the pixel coordinates of the grid overflow an `i32`; [Grid::from_canvas] checks
    /// this up front.
    pub fn new(columns: usize, rows: usize, cell_size: i32) -> Grid {
        let cell_size = cell_size.max(1);
        let pitch = cell_size + 1;
        let mut cells = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                let position = Point::new(column as i32 * pitch, row as i32 * pitch);
                cells.push(Cell::new(cells.len(), position));
            }
        }
        let mut grid = Grid {
            cells,
            columns,
            rows,
            cell_size,
            source: None,
            destination: None,
            components: UnionFind::new(columns * rows),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Fills a `width` x `height` pixel canvas with cells. A partially visible last column or row
    /// still gets cells.
    pub fn from_canvas(width: i32, height: i32, cell_size: i32) -> Result<Grid> {
        let (columns, rows) = check_dimensions(width, height, cell_size)?;
        Ok(Grid::new(columns, rows, cell_size))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Distance between the corners of two adjacent cells.
    pub fn pitch(&self) -> i32 {
        self.cell_size + 1
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Panics if `id` is not a cell of this grid.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id]
    }

    pub fn source(&self) -> Option<CellId> {
        self.source
    }

    pub fn destination(&self) -> Option<CellId> {
        self.destination
    }

    /// Index of the cell in the given column and row.
    pub fn cell_index(&self, column: usize, row: usize) -> Option<CellId> {
        (column < self.columns && row < self.rows).then(|| column * self.rows + row)
    }

    /// Hit test with inclusive bounds `[x, x + size]` on both axes.
    pub fn find_cell_at(&self, point: Point) -> Option<CellId> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let pitch = self.pitch();
        let (column, row) = ((point.x / pitch) as usize, (point.y / pitch) as usize);
        let id = self.cell_index(column, row)?;
        let corner = self.cells[id].position;
        let inside = point.x <= corner.x + self.cell_size && point.y <= corner.y + self.cell_size;
        inside.then_some(id)
    }

    /// Cells one pitch to the left, right, above and below, in that order, regardless of walls.
    pub fn adjacent(&self, id: CellId) -> SmallVec<[CellId; 4]> {
        let pitch = self.pitch();
        let p = self.cells[id].position;
        [
            Point::new(p.x - pitch, p.y),
            Point::new(p.x + pitch, p.y),
            Point::new(p.x, p.y - pitch),
            Point::new(p.x, p.y + pitch),
        ]
        .into_iter()
        .filter_map(|probe| self.find_cell_at(probe))
        .collect()
    }

    /// Adjacent cells that can be stepped on.
    pub fn neighbors(&self, id: CellId) -> SmallVec<[CellId; 4]> {
        self.adjacent(id)
            .into_iter()
            .filter(|n| self.cells[*n].active)
            .collect()
    }

    /// Flips a cell between wall and open. Endpoints are left untouched and `false` is returned.
    pub fn toggle_obstacle(&mut self, id: CellId) -> bool {
        if self.cells[id].is_endpoint() {
            debug!("Ignoring wall toggle on endpoint cell {id}");
            return false;
        }
        let active = self.cells[id].active;
        self.set_active(id, !active);
        true
    }

    /// Resets a cell to an open cell without a role.
    pub fn clear_obstacle(&mut self, id: CellId) {
        match self.cells[id].role {
            Role::Source => self.source = None,
            Role::Destination => self.destination = None,
            Role::Free => {}
        }
        self.cells[id].role = Role::Free;
        self.set_active(id, true);
    }

    /// Assigns a role to a cell. Endpoint roles reopen the cell if it was a wall, and any other
    /// holder of the same role loses it.
    pub fn set_role(&mut self, id: CellId, role: Role) {
        match self.cells[id].role {
            Role::Source if role != Role::Source => self.source = None,
            Role::Destination if role != Role::Destination => self.destination = None,
            _ => {}
        }
        let previous = match role {
            Role::Source => self.source.replace(id),
            Role::Destination => self.destination.replace(id),
            Role::Free => None,
        };
        if let Some(previous) = previous.filter(|p| *p != id) {
            self.cells[previous].role = Role::Free;
        }
        self.cells[id].role = role;
        if role != Role::Free {
            self.set_active(id, true);
        }
    }

    /// Reopens every cell and drops both endpoints.
    pub fn reset_all(&mut self) {
        for cell in &mut self.cells {
            cell.active = true;
            cell.role = Role::Free;
            cell.reset_scratch();
        }
        self.source = None;
        self.destination = None;
        self.generate_components();
    }

    pub(crate) fn reset_scratch(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset_scratch);
    }

    /// Reopens every non-endpoint cell and then turns it into a wall with probability `rate`.
    /// Returns the cells that were touched.
    pub fn randomize_obstacles<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) -> Vec<CellId> {
        let mut touched = Vec::with_capacity(self.cells.len());
        for cell in self.cells.iter_mut().filter(|c| !c.is_endpoint()) {
            cell.active = rng.gen::<f64>() >= rate;
            touched.push(cell.index);
        }
        self.generate_components();
        touched
    }

    /// Assigns a random source and destination where they are unset. Up to `retries` uniform draws
    /// look for an open free cell; after that an open free cell is taken directly, and only when
    /// there is none a wall is cleared. Returns the newly assigned cells.
    pub fn randomize_endpoints<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        retries: u32,
    ) -> SmallVec<[CellId; 2]> {
        let mut assigned = SmallVec::new();
        for role in [Role::Source, Role::Destination] {
            let unset = match role {
                Role::Source => self.source.is_none(),
                _ => self.destination.is_none(),
            };
            if !unset {
                continue;
            }
            match self.pick_endpoint_cell(rng, retries) {
                Some(id) => {
                    self.set_role(id, role);
                    assigned.push(id);
                }
                None => warn!("No free cell left for the {role:?} endpoint"),
            }
        }
        assigned
    }

    fn pick_endpoint_cell<R: Rng + ?Sized>(&self, rng: &mut R, retries: u32) -> Option<CellId> {
        if self.cells.is_empty() {
            return None;
        }
        for _ in 0..retries {
            let cell = &self.cells[rng.gen_range(0..self.cells.len())];
            if cell.active && !cell.is_endpoint() {
                return Some(cell.index);
            }
        }
        let open = self
            .cells
            .iter()
            .filter(|c| c.active && !c.is_endpoint())
            .map(|c| c.index)
            .collect::<Vec<_>>();
        let candidates = if open.is_empty() {
            let walls = self
                .cells
                .iter()
                .filter(|c| !c.is_endpoint())
                .map(|c| c.index)
                .collect::<Vec<_>>();
            if !walls.is_empty() {
                warn!("Grid is fully walled, clearing a wall for an endpoint");
            }
            walls
        } else {
            open
        };
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }

    fn set_active(&mut self, id: CellId, active: bool) {
        let was_active = self.cells[id].active;
        self.cells[id].active = active;
        if was_active && !active {
            self.components_dirty = true;
        } else if !was_active && active {
            for n in self.neighbors(id) {
                self.components.union(id, n);
            }
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up active neighbours to the same components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.cells.len());
        self.components_dirty = false;
        for id in 0..self.cells.len() {
            if self.cells[id].active {
                for n in self.neighbors(id) {
                    self.components.union(id, n);
                }
            }
        }
    }

    /// Checks if both cells are open and on the same connected component.
    pub fn reachable(&mut self, a: CellId, b: CellId) -> bool {
        self.update();
        a < self.cells.len()
            && b < self.cells.len()
            && self.cells[a].active
            && self.cells[b].active
            && self.components.equiv(a, b)
    }

    /// Number of open cells on the component of `id`, zero for a wall.
    pub fn component_size(&mut self, id: CellId) -> usize {
        self.update();
        if !self.cells[id].active {
            return 0;
        }
        self.cells
            .iter()
            .filter(|c| c.active && self.components.equiv(id, c.index))
            .count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let line = (0..self.columns)
                .map(|column| {
                    let cell = &self.cells[column * self.rows + row];
                    match cell.color() {
                        SemanticColor::Source => 'S',
                        SemanticColor::Destination => 'D',
                        SemanticColor::Wall => '#',
                        _ => '.',
                    }
                })
                .collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
