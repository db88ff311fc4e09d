use bytemuck::{Pod, Zeroable};

/// One point of board geometry, as laid out in the vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Vertex>() as wgpu::BufferAddress;

    /// A point on the board plane (z = 0).
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y, 0.0] }
    }
}

/// A GPU vertex buffer holding a list of board points.
///
/// Capacity only grows. Updates that fit are written in place; anything
/// larger reallocates to the next power of two.
pub struct GeometryBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u32,
}

impl GeometryBuffer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, label: &'static str, points: &[Vertex]) -> Self {
        let capacity = capacity_for(points.len());
        let buffer = create_vertex_buffer(device, label, capacity);
        let mut geometry = Self { label, buffer, capacity, len: 0 };
        geometry.write(queue, points);
        geometry
    }

    /// Replace the contents with `points`.
    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, points: &[Vertex]) {
        if points.len() as u64 > self.capacity {
            let capacity = capacity_for(points.len());
            log::debug!("Growing {} from {} to {} vertices", self.label, self.capacity, capacity);
            self.buffer.destroy();
            self.buffer = create_vertex_buffer(device, self.label, capacity);
            self.capacity = capacity;
        }
        self.write(queue, points);
    }

    fn write(&mut self, queue: &wgpu::Queue, points: &[Vertex]) {
        if !points.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(points));
        }
        self.len = points.len() as u32;
    }

    /// Number of vertices currently uploaded.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Attach the uploaded vertices to `slot` for the rest of the pass.
    /// Does nothing while the buffer is empty.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, slot: u32) {
        if self.is_empty() {
            return;
        }
        let bytes = self.len as u64 * Vertex::SIZE;
        pass.set_vertex_buffer(slot, self.buffer.slice(..bytes));
    }

    /// Free the GPU allocation.
    pub fn delete(self) {
        log::debug!("Deleting {}", self.label);
        self.buffer.destroy();
    }
}

fn capacity_for(vertices: usize) -> u64 {
    (vertices.max(1) as u64).next_power_of_two()
}

fn create_vertex_buffer(device: &wgpu::Device, label: &'static str, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: capacity * Vertex::SIZE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_three_packed_floats() {
        assert_eq!(Vertex::SIZE, 12);
        let v = [Vertex::new(1.0, -2.0)];
        let floats: &[f32] = bytemuck::cast_slice(&v);
        assert_eq!(floats, &[1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_capacity_rounds_up() {
        assert_eq!(capacity_for(0), 1);
        assert_eq!(capacity_for(1), 1);
        assert_eq!(capacity_for(6), 8);
        assert_eq!(capacity_for(24), 32);
        assert_eq!(capacity_for(64), 64);
    }
}
