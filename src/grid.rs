use crate::geometry::Vertex;
use glam::Vec2;
use rand::Rng;
use std::fmt;

/// Side length of the world square the board occupies, `[-1, 1]` on both axes.
const WORLD_SPAN: f32 = 2.0;

/// Result of forwarding a world-space click to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Flipped { index: usize, alive: bool },
    OutOfBounds,
}

/// Square board of on/off cells laid out over `[-1, 1] x [-1, 1]`.
///
/// Row 0 is the top row. Cells are stored row-major, so the cell at
/// `(col, row)` lives at `row * size + col`.
pub struct Grid {
    size: usize,
    cell_size: f32,
    cells: Vec<bool>,
    lines: Vec<Vertex>,
    dirty: bool,
}

impl Grid {
    /// Build a board where every cell is independently alive with `alive_probability`.
    pub fn random<R: Rng>(size: usize, alive_probability: f64, rng: &mut R) -> Self {
        let size = clamp_size(size);
        let p = alive_probability.clamp(0.0, 1.0);
        let cells = (0..size * size).map(|_| rng.random_bool(p)).collect();
        Self::with_cells(size, cells)
    }

    /// Build a board from a known row-major cell list. `None` if the length isn't `size * size`.
    pub fn from_cells(size: usize, cells: Vec<bool>) -> Option<Self> {
        if size == 0 || cells.len() != size * size {
            return None;
        }
        Some(Self::with_cells(size, cells))
    }

    fn with_cells(size: usize, cells: Vec<bool>) -> Self {
        let cell_size = WORLD_SPAN / size as f32;
        Self {
            size,
            cell_size,
            cells,
            lines: line_vertices(size, cell_size),
            dirty: true,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_alive(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.cells[row * self.size + col]
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Endpoint pairs for every grid line. Built once, never changes.
    pub fn line_vertices(&self) -> &[Vertex] {
        &self.lines
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Grid coordinates `(col, row)` under a world-space point, if it lands on the board.
    pub fn cell_at(&self, world: Vec2) -> Option<(usize, usize)> {
        let col = ((world.x + 1.0) / self.cell_size).floor();
        let row = ((1.0 - world.y) / self.cell_size).floor();
        let n = self.size as f32;
        // NaN fails both comparisons and falls through to None.
        if (0.0..n).contains(&col) && (0.0..n).contains(&row) {
            Some((col as usize, row as usize))
        } else {
            None
        }
    }

    /// Flip the cell under a world-space click.
    pub fn toggle_at(&mut self, world: Vec2) -> Toggle {
        let Some((col, row)) = self.cell_at(world) else {
            log::warn!("Click at ({:.3}, {:.3}) is out of grid bounds", world.x, world.y);
            return Toggle::OutOfBounds;
        };

        let index = row * self.size + col;
        self.cells[index] = !self.cells[index];
        self.dirty = true;

        log::info!("Grid cell index: {}", index);
        log::debug!("Board:\n{}", self);

        Toggle::Flipped { index, alive: self.cells[index] }
    }

    /// Two triangles per live cell, in cell order. Rebuilt from scratch on every call.
    pub fn fill_vertices(&self) -> Vec<Vertex> {
        let cs = self.cell_size;
        let mut out = Vec::with_capacity(self.live_count() * 6);

        for (i, _) in self.cells.iter().enumerate().filter(|&(_, &alive)| alive) {
            let col = i % self.size;
            let row = i / self.size;

            let left = -1.0 + col as f32 * cs;
            let right = left + cs;
            let top = 1.0 - row as f32 * cs;
            let bottom = top - cs;

            out.extend_from_slice(&[
                Vertex::new(left, top),
                Vertex::new(right, top),
                Vertex::new(left, bottom),
                Vertex::new(left, bottom),
                Vertex::new(right, top),
                Vertex::new(right, bottom),
            ]);
        }

        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for &alive in row {
                f.write_str(if alive { "1 " } else { "0 " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn clamp_size(size: usize) -> usize {
    if size == 0 {
        log::warn!("Grid size 0 requested, using 1");
        1
    } else {
        size
    }
}

fn line_vertices(size: usize, cell_size: f32) -> Vec<Vertex> {
    let mut lines = Vec::with_capacity(4 * (size + 1));
    for i in 0..=size {
        let pos = -1.0 + i as f32 * cell_size;
        // horizontal
        lines.push(Vertex::new(-1.0, pos));
        lines.push(Vertex::new(1.0, pos));
        // vertical
        lines.push(Vertex::new(pos, -1.0));
        lines.push(Vertex::new(pos, 1.0));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn empty(size: usize) -> Grid {
        Grid::from_cells(size, vec![false; size * size]).unwrap()
    }

    #[test]
    fn test_cell_and_line_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=12 {
            let grid = Grid::random(n, 0.34, &mut rng);
            assert_eq!(grid.cells().len(), n * n);
            assert_eq!(grid.line_vertices().len(), 4 * (n + 1));
            assert!((grid.cell_size() - 2.0 / n as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::random(0, 0.5, &mut rng);
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.cells().len(), 1);
        assert!(Grid::from_cells(0, vec![]).is_none());
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        assert!(Grid::from_cells(3, vec![false; 8]).is_none());
        assert!(Grid::from_cells(3, vec![false; 9]).is_some());
    }

    #[test]
    fn test_random_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(Grid::random(6, 0.0, &mut rng).live_count(), 0);
        assert_eq!(Grid::random(6, 1.0, &mut rng).live_count(), 36);
    }

    #[test]
    fn test_random_density_is_roughly_a_third() {
        let mut rng = StdRng::seed_from_u64(2024);
        let grid = Grid::random(100, 0.34, &mut rng);
        let density = grid.live_count() as f64 / 10_000.0;
        assert!((0.30..0.38).contains(&density), "density {density}");
    }

    #[test]
    fn test_line_geometry_spans_the_board() {
        let grid = empty(2);
        let lines = grid.line_vertices();
        // first horizontal line sits on the bottom edge
        assert_eq!(lines[0], Vertex::new(-1.0, -1.0));
        assert_eq!(lines[1], Vertex::new(1.0, -1.0));
        // first vertical line sits on the left edge
        assert_eq!(lines[2], Vertex::new(-1.0, -1.0));
        assert_eq!(lines[3], Vertex::new(-1.0, 1.0));
        // middle pair at 0
        assert_eq!(lines[4], Vertex::new(-1.0, 0.0));
        assert_eq!(lines[6], Vertex::new(0.0, -1.0));
        assert!(lines.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn test_two_by_two_click_toggles_index_one() {
        let mut grid = empty(2);
        grid.take_dirty();

        let click = Vec2::new(0.5, 0.5);
        assert_eq!(grid.cell_at(click), Some((1, 0)));
        assert_eq!(grid.toggle_at(click), Toggle::Flipped { index: 1, alive: true });
        assert_eq!(grid.cells(), &[false, true, false, false]);
        assert!(grid.is_dirty());

        assert_eq!(grid.toggle_at(click), Toggle::Flipped { index: 1, alive: false });
        assert_eq!(grid.cells(), &[false, false, false, false]);
    }

    #[test]
    fn test_double_toggle_restores_every_cell() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut grid = Grid::random(5, 0.34, &mut rng);
        let before = grid.cells().to_vec();
        let cs = grid.cell_size();

        for row in 0..5 {
            for col in 0..5 {
                let center = Vec2::new(
                    -1.0 + (col as f32 + 0.5) * cs,
                    1.0 - (row as f32 + 0.5) * cs,
                );
                grid.toggle_at(center);
                assert_ne!(grid.is_alive(col, row), before[row * 5 + col]);
                grid.toggle_at(center);
            }
        }

        assert_eq!(grid.cells(), &before[..]);
    }

    #[test]
    fn test_clicks_outside_world_square_change_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::random(4, 0.5, &mut rng);
        let before = grid.cells().to_vec();
        grid.take_dirty();

        let outside = [
            Vec2::new(-1.01, 0.0),
            Vec2::new(1.5, 0.0),
            Vec2::new(0.0, 1.2),
            Vec2::new(0.0, -1.0001),
            Vec2::new(-3.0, -3.0),
            Vec2::new(f32::NAN, 0.0),
        ];
        for p in outside {
            assert_eq!(grid.toggle_at(p), Toggle::OutOfBounds);
        }

        assert_eq!(grid.cells(), &before[..]);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_edges_follow_floor_mapping() {
        let grid = empty(4);
        // top-left corner belongs to (0, 0)
        assert_eq!(grid.cell_at(Vec2::new(-1.0, 1.0)), Some((0, 0)));
        // right and bottom edges are exclusive
        assert_eq!(grid.cell_at(Vec2::new(1.0, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(0.0, -1.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(0.99, -0.99)), Some((3, 3)));
    }

    #[test]
    fn test_fill_vertex_count_matches_live_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..=8 {
            let grid = Grid::random(n, 0.34, &mut rng);
            assert_eq!(grid.fill_vertices().len(), 6 * grid.live_count());
        }
        assert!(empty(3).fill_vertices().is_empty());
    }

    #[test]
    fn test_fill_triangles_cover_the_cell() {
        // 2x2, only bottom-right alive (col 1, row 1)
        let grid = Grid::from_cells(2, vec![false, false, false, true]).unwrap();
        let verts = grid.fill_vertices();
        let expected = [
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(0.0, -1.0),
            Vertex::new(0.0, -1.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(1.0, -1.0),
        ];
        assert_eq!(verts, expected);
    }

    #[test]
    fn test_dirty_flag_cycle() {
        let mut grid = empty(3);
        assert!(grid.take_dirty());
        assert!(!grid.take_dirty());
        grid.toggle_at(Vec2::ZERO);
        assert!(grid.take_dirty());
    }

    #[test]
    fn test_display_dumps_rows() {
        let grid = Grid::from_cells(2, vec![true, false, false, true]).unwrap();
        assert_eq!(grid.to_string(), "1 0 \n0 1 \n");
    }
}
