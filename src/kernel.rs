use std::collections::HashMap;

use crate::grid::{Cell, GridView};

/// Square neighborhood mask of radius `r` with the center excluded, stored
/// as relative `(drow, dcol)` offsets.
#[derive(Debug, Clone)]
pub struct Kernel {
    pub radius: u32,
    offsets: Vec<(i32, i32)>,
}

impl Kernel {
    pub fn moore(radius: u32) -> Self {
        let r = radius as i32;
        let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1) - 1) as usize);
        for dy in -r..=r {
            for dx in -r..=r {
                if dy == 0 && dx == 0 {
                    continue;
                }
                offsets.push((dy, dx));
            }
        }
        Self { radius, offsets }
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }
}

/// Lazily builds and reuses kernels per radius. The tree rule's spread
/// radius is adjustable at runtime, so distinct radii come and go; each is
/// built once.
#[derive(Debug, Default)]
pub struct KernelCache {
    kernels: HashMap<u32, Kernel>,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, radius: u32) -> &Kernel {
        self.kernels
            .entry(radius)
            .or_insert_with(|| Kernel::moore(radius))
    }
}

/// Dense per-cell neighbor counts, recomputed each tick per rule.
pub type CountMap = Vec<u16>;

/// Toroidal correlation: for every cell, count the neighbors under `kernel`
/// for which `predicate` holds. Reads only the frozen live view, so the
/// result is independent of traversal order.
pub fn count<F>(view: GridView<'_>, kernel: &Kernel, predicate: F) -> CountMap
where
    F: Fn(Cell) -> bool,
{
    let w = view.width as i32;
    let h = view.height as i32;
    let mut counts = vec![0u16; (w * h) as usize];

    for row in 0..h {
        for col in 0..w {
            let mut n = 0u16;
            for &(dy, dx) in kernel.offsets() {
                if predicate(view.get_wrapped(row + dy, col + dx)) {
                    n += 1;
                }
            }
            counts[(row * w + col) as usize] = n;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_moore_kernel_sizes() {
        assert_eq!(Kernel::moore(1).offsets().len(), 8);
        assert_eq!(Kernel::moore(2).offsets().len(), 24);
        assert_eq!(Kernel::moore(3).offsets().len(), 48);
    }

    #[test]
    fn test_kernel_excludes_center() {
        assert!(!Kernel::moore(2).offsets().contains(&(0, 0)));
    }

    #[test]
    fn test_cache_reuses_kernels() {
        let mut cache = KernelCache::new();
        assert_eq!(cache.get(2).offsets().len(), 24);
        assert_eq!(cache.get(2).offsets().len(), 24);
        assert_eq!(cache.get(1).offsets().len(), 8);
    }

    #[test]
    fn test_all_alive_counts_eight_everywhere() {
        let mut grid = Grid::new(7, 5);
        grid.fill(Cell::Alive);
        let kernel = Kernel::moore(1);
        let counts = count(grid.view(), &kernel, |c| c == Cell::Alive);
        // Toroidal wrap means edges and corners see 8 neighbors too.
        assert!(counts.iter().all(|&n| n == 8));
    }

    #[test]
    fn test_corner_wrap() {
        let mut grid = Grid::new(8, 8);
        grid.set(0, 0, Cell::Tree);
        let kernel = Kernel::moore(1);
        let counts = count(grid.view(), &kernel, |c| c == Cell::Tree);
        // The opposite corner is a wrapped diagonal neighbor.
        assert_eq!(counts[(7 * 8 + 7) as usize], 1);
        assert_eq!(counts[(0 * 8 + 1) as usize], 1);
        // The tree itself has no tree neighbors.
        assert_eq!(counts[0], 0);
    }

    #[test]
    fn test_predicate_selects_state() {
        let mut grid = Grid::new(5, 5);
        grid.set(2, 2, Cell::Alive);
        grid.set(2, 3, Cell::Tree);
        let kernel = Kernel::moore(1);
        let alive = count(grid.view(), &kernel, |c| c == Cell::Alive);
        let trees = count(grid.view(), &kernel, |c| c == Cell::Tree);
        assert_eq!(alive[(2 * 5 + 3) as usize], 1);
        assert_eq!(trees[(2 * 5 + 3) as usize], 0);
        assert_eq!(trees[(2 * 5 + 2) as usize], 1);
    }

    #[test]
    fn test_radius_two_reach() {
        let mut grid = Grid::new(9, 9);
        grid.set(4, 4, Cell::Tree);
        let kernel = Kernel::moore(2);
        let counts = count(grid.view(), &kernel, |c| c == Cell::Tree);
        assert_eq!(counts[(4 * 9 + 6) as usize], 1);
        assert_eq!(counts[(4 * 9 + 7) as usize], 0);
    }
}
