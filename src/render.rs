use crate::geometry::GeometryBuffer;
use crate::grid::Grid;
use crate::shader::{Primitive, ShaderProgram};
use crate::vertex_array::VertexArray;

/// Vertex attribute slot the board geometry feeds.
pub const POSITION_LOCATION: u32 = 0;
/// Components per position (x, y, z).
pub const POSITION_COMPONENTS: u32 = 3;

const VERTEX_SLOT: u32 = 0;

/// GPU side of the board: the static line mesh and the filled-cell mesh.
pub struct GridRenderer {
    line_array: VertexArray,
    lines: GeometryBuffer,
    cell_array: VertexArray,
    cells: GeometryBuffer,
}

impl GridRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, vertex_array: &VertexArray, grid: &mut Grid) -> Self {
        let lines = GeometryBuffer::new(device, queue, "Grid Lines", grid.line_vertices());
        let cells = GeometryBuffer::new(device, queue, "Filled Cells", &grid.fill_vertices());
        grid.take_dirty();

        log::info!(
            "Grid renderer ready: {} line points, {} cell vertices",
            lines.len(),
            cells.len()
        );

        Self {
            line_array: vertex_array.clone(),
            lines,
            cell_array: vertex_array.clone(),
            cells,
        }
    }

    /// Rebuild the filled-cell mesh if the board changed since the last upload.
    /// Returns whether anything was uploaded.
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, grid: &mut Grid) -> bool {
        if !grid.take_dirty() {
            return false;
        }
        let vertices = grid.fill_vertices();
        self.cells.update(device, queue, &vertices);
        log::debug!("Regenerated {} cell vertices", vertices.len());
        true
    }

    pub fn draw_grid_lines<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, shader: &'a ShaderProgram) {
        shader.bind(pass, Primitive::Lines);
        self.line_array.draw(pass, VERTEX_SLOT, &self.lines);
    }

    /// Draw whatever the last [`sync`](Self::sync) uploaded.
    pub fn draw_filled_cells<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, shader: &'a ShaderProgram) {
        if self.cells.is_empty() {
            return;
        }
        shader.bind(pass, Primitive::Triangles);
        self.cell_array.draw(pass, VERTEX_SLOT, &self.cells);
    }

    pub fn cell_vertex_count(&self) -> u32 {
        self.cells.len()
    }

    pub fn release(self) {
        self.lines.delete();
        self.cells.delete();
    }
}
