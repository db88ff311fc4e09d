use crate::geometry::{GeometryBuffer, Vertex};

/// Describes how a [`GeometryBuffer`] feeds a shader attribute slot.
#[derive(Debug, Clone)]
pub struct VertexArray {
    attributes: [wgpu::VertexAttribute; 1],
}

impl VertexArray {
    /// Link `components` floats at the start of each [`Vertex`] to shader `location`.
    /// Returns `None` for component counts wgpu has no float format for.
    pub fn link(location: u32, components: u32) -> Option<Self> {
        let format = match components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            4 => wgpu::VertexFormat::Float32x4,
            _ => return None,
        };
        if format.size() > Vertex::SIZE {
            return None;
        }
        Some(Self {
            attributes: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: location,
                format,
            }],
        })
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: Vertex::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Bind `geometry` to `slot` and draw every vertex in it.
    pub fn draw<'a>(&self, pass: &mut wgpu::RenderPass<'a>, slot: u32, geometry: &'a GeometryBuffer) {
        if geometry.is_empty() {
            return;
        }
        geometry.bind(pass, slot);
        pass.draw(0..geometry.len(), 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_layout() {
        let vao = VertexArray::link(0, 3).unwrap();
        let layout = vao.layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn test_rejects_unsupported_component_counts() {
        assert!(VertexArray::link(0, 0).is_none());
        // a vertex only holds three floats
        assert!(VertexArray::link(0, 4).is_none());
        assert!(VertexArray::link(1, 2).is_some());
    }
}
