use glam::Vec4;
use std::path::PathBuf;

/// Compiled-in settings for the board and its window.
#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Cells per side of the square board.
    pub grid_size: usize,
    /// Chance that a cell starts alive.
    pub alive_probability: f64,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// Padding around the board before the first resize event arrives.
    pub startup_margin: f32,
    /// Padding added to the longer axis on every resize.
    pub resize_buffer: f32,
    pub clear_color: wgpu::Color,
    pub line_color: Vec4,
    pub fill_color: Vec4,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Game of Life".to_string(),
            window_width: 800,
            window_height: 600,
            grid_size: 5,
            alive_probability: 0.34,
            vertex_shader: PathBuf::from("shaders/shader.vert.wgsl"),
            fragment_shader: PathBuf::from("shaders/shader.frag.wgsl"),
            startup_margin: 0.2,
            resize_buffer: 0.05,
            clear_color: wgpu::Color { r: 0.1, g: 0.1, b: 0.12, a: 1.0 },
            line_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            fill_color: Vec4::new(0.35, 0.8, 0.45, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_small_board() {
        let config = Config::default();
        assert_eq!(config.grid_size, 5);
        assert!((config.alive_probability - 0.34).abs() < f64::EPSILON);
        assert!(config.startup_margin > config.resize_buffer);
        assert!(config.window_width > 0 && config.window_height > 0);
    }
}
