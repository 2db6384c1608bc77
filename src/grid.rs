use rand::Rng;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Alive = 1,
    Tree = 2,
}

impl Cell {
    /// Numeric id used for GPU upload and color lookup.
    pub fn id(self) -> u32 {
        self as u32
    }
}

/// Read-only view of the live buffer, handed to the aggregator and renderer.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub width: u32,
    pub height: u32,
    cells: &'a [Cell],
}

impl<'a> GridView<'a> {
    /// Cell at `(row, col)` with toroidal wrapping.
    pub fn get_wrapped(&self, row: i32, col: i32) -> Cell {
        let w = self.width as i32;
        let h = self.height as i32;
        let wr = ((row % h) + h) % h;
        let wc = ((col % w) + w) % w;
        self.cells[(wr * w + wc) as usize]
    }

    /// Cell at in-bounds `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> Cell {
        self.cells[(row * self.width + col) as usize]
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Count cells currently in the given state.
    pub fn population(&self, state: Cell) -> u64 {
        self.cells.iter().filter(|&&c| c == state).count() as u64
    }
}

/// Owns the cell state as a two-buffer arena. One buffer is "live" and
/// readable; the other is scratch for building the next tick. `swap` is an
/// index flip, so no references ever move.
pub struct Grid {
    pub width: u32,
    pub height: u32,
    buffers: [Vec<Cell>; 2],
    /// Index of the live buffer (0 or 1).
    live: usize,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        let len = (width * height) as usize;
        Self {
            width,
            height,
            buffers: [vec![Cell::Empty; len], vec![Cell::Empty; len]],
            live: 0,
        }
    }

    pub fn view(&self) -> GridView<'_> {
        GridView {
            width: self.width,
            height: self.height,
            cells: &self.buffers[self.live],
        }
    }

    /// Cell at in-bounds `(row, col)` of the live buffer.
    pub fn get(&self, row: u32, col: u32) -> Cell {
        self.buffers[self.live][(row * self.width + col) as usize]
    }

    /// Write a cell into the live buffer. Used by brush edits and the
    /// in-place tree rule; the Life rule writes to scratch instead.
    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.buffers[self.live][(row * self.width + col) as usize] = cell;
    }

    /// Fill every live cell with the given state.
    pub fn fill(&mut self, cell: Cell) {
        self.buffers[self.live].fill(cell);
    }

    /// Randomize the live buffer: Alive with probability `density`, else
    /// Empty, independently per cell.
    pub fn randomize<R: Rng>(&mut self, density: f64, rng: &mut R) {
        for cell in &mut self.buffers[self.live] {
            *cell = if rng.gen_range(0.0..1.0) < density {
                Cell::Alive
            } else {
                Cell::Empty
            };
        }
    }

    /// Paint a square block of side `2*radius + 1` centered on `(row, col)`.
    /// Clamped to bounds, never wraps, so edits near an edge cannot land on
    /// the far side of the torus.
    pub fn brush(&mut self, row: i32, col: i32, radius: u32, cell: Cell) {
        let r = radius as i32;
        let h = self.height as i32;
        let w = self.width as i32;
        let r0 = (row - r).max(0);
        let r1 = (row + r).min(h - 1);
        let c0 = (col - r).max(0);
        let c1 = (col + r).min(w - 1);
        if r0 > r1 || c0 > c1 {
            return;
        }
        for rr in r0..=r1 {
            for cc in c0..=c1 {
                self.buffers[self.live][(rr * w + cc) as usize] = cell;
            }
        }
    }

    /// Split into a view of the live buffer and the mutable scratch buffer,
    /// so a rule can read frozen state while writing next state without
    /// aliasing.
    pub fn split(&mut self) -> (GridView<'_>, &mut [Cell]) {
        let (a, b) = self.buffers.split_at_mut(1);
        let (live, scratch) = if self.live == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };
        (
            GridView {
                width: self.width,
                height: self.height,
                cells: live,
            },
            scratch.as_mut_slice(),
        )
    }

    /// Mutable slice of the live buffer, for rules that update in place.
    pub(crate) fn live_mut(&mut self) -> &mut [Cell] {
        &mut self.buffers[self.live]
    }

    /// Promote the scratch buffer to live. O(1).
    pub fn swap(&mut self) {
        self.live = 1 - self.live;
    }

    pub fn population(&self, state: Cell) -> u64 {
        self.view().population(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_new_empty() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.view().cells().len(), 80);
        assert_eq!(grid.population(Cell::Empty), 80);
    }

    #[test]
    #[should_panic]
    fn test_grid_zero_dimension_panics() {
        let _ = Grid::new(0, 10);
    }

    #[test]
    fn test_set_get() {
        let mut grid = Grid::new(10, 10);
        grid.set(3, 4, Cell::Tree);
        assert_eq!(grid.get(3, 4), Cell::Tree);
        assert_eq!(grid.get(0, 0), Cell::Empty);
    }

    #[test]
    fn test_wrapped_lookup() {
        let mut grid = Grid::new(10, 10);
        grid.set(9, 9, Cell::Alive);
        assert_eq!(grid.view().get_wrapped(-1, -1), Cell::Alive);
        assert_eq!(grid.view().get_wrapped(19, 19), Cell::Alive);
    }

    #[test]
    fn test_randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(32, 32);
        grid.randomize(0.0, &mut rng);
        assert_eq!(grid.population(Cell::Alive), 0);
        grid.randomize(1.0, &mut rng);
        assert_eq!(grid.population(Cell::Alive), 32 * 32);
    }

    #[test]
    fn test_randomize_density() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut grid = Grid::new(100, 100);
        grid.randomize(0.5, &mut rng);
        let pop = grid.population(Cell::Alive);
        assert!(pop > 1000 && pop < 9000);
    }

    #[test]
    fn test_fill_clear_idempotent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::new(16, 16);
        grid.randomize(0.8, &mut rng);
        grid.fill(Cell::Empty);
        assert_eq!(grid.population(Cell::Empty), 256);
        grid.fill(Cell::Empty);
        assert_eq!(grid.population(Cell::Empty), 256);
    }

    #[test]
    fn test_brush_clamps_to_bounds() {
        let mut grid = Grid::new(10, 10);
        // Centered on the corner; only the overlapping quadrant lands.
        grid.brush(0, 0, 2, Cell::Alive);
        assert_eq!(grid.population(Cell::Alive), 9);
        // Far corner must stay untouched (no wrap).
        assert_eq!(grid.get(9, 9), Cell::Empty);

        let mut grid = Grid::new(10, 10);
        grid.brush(-5, -5, 1, Cell::Alive);
        assert_eq!(grid.population(Cell::Alive), 0);
    }

    #[test]
    fn test_brush_erase() {
        let mut grid = Grid::new(10, 10);
        grid.brush(5, 5, 1, Cell::Tree);
        assert_eq!(grid.population(Cell::Tree), 9);
        grid.brush(5, 5, 1, Cell::Empty);
        assert_eq!(grid.population(Cell::Tree), 0);
    }

    #[test]
    fn test_swap_flips_live_buffer() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, Cell::Alive);
        {
            let (live, scratch) = grid.split();
            assert_eq!(live.get(1, 1), Cell::Alive);
            scratch.fill(Cell::Tree);
        }
        grid.swap();
        assert_eq!(grid.population(Cell::Tree), 16);
        grid.swap();
        assert_eq!(grid.get(1, 1), Cell::Alive);
    }
}
