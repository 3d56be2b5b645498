use crate::error::Result;
use crate::grid::{CellState, Grid};

/// Opaque pixel color: the two classes the canvas distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelColor {
    #[default]
    Background,
    Foreground,
}

impl From<CellState> for PixelColor {
    fn from(state: CellState) -> Self {
        match state {
            CellState::Empty => PixelColor::Background,
            CellState::Filled => PixelColor::Foreground,
        }
    }
}

/// Drawing surface the grid is projected onto
pub trait Renderer {
    fn render_init(&mut self, width: u32, height: u32) -> Result<()>;

    fn set_pixel(&mut self, x: u32, y: u32, color: PixelColor);

    /// Flush pending pixel writes
    fn refresh(&mut self) -> Result<()>;

    fn get_pixel(&self, x: u32, y: u32) -> PixelColor;
}

/// Draw the whole grid and refresh
pub fn project<R: Renderer + ?Sized>(grid: &Grid, renderer: &mut R) -> Result<()> {
    renderer.render_init(grid.side(), grid.side())?;
    for (x, y, state) in grid.cells() {
        renderer.set_pixel(x, y, state.into());
    }
    renderer.refresh()
}

/// Draw one newly frozen cell and refresh
pub fn project_freeze<R: Renderer + ?Sized>(renderer: &mut R, x: u32, y: u32) -> Result<()> {
    renderer.set_pixel(x, y, PixelColor::Foreground);
    renderer.refresh()
}

/// In-memory pixel buffer
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PixelColor>,
    refreshes: u64,
}

impl FrameBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of refreshes since the last `render_init`
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn pixels(&self) -> &[PixelColor] {
        &self.pixels
    }
}

impl Renderer for FrameBuffer {
    fn render_init(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.pixels = vec![PixelColor::Background; width as usize * height as usize];
        self.refreshes = 0;
        Ok(())
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: PixelColor) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    fn refresh(&mut self) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn get_pixel(&self, x: u32, y: u32) -> PixelColor {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            PixelColor::Background
        }
    }
}

/// Renderer for headless runs that need no picture
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn set_pixel(&mut self, _x: u32, _y: u32, _color: PixelColor) {}

    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_pixel(&self, _x: u32, _y: u32) -> PixelColor {
        PixelColor::Background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_mirrors_grid() {
        let grid = Grid::new(7).unwrap();
        let mut fb = FrameBuffer::default();
        project(&grid, &mut fb).unwrap();

        assert_eq!((fb.width(), fb.height()), (7, 7));
        assert_eq!(fb.refreshes(), 1);
        for (x, y, state) in grid.cells() {
            assert_eq!(fb.get_pixel(x, y), PixelColor::from(state));
        }
    }

    #[test]
    fn test_freeze_projection() {
        let grid = Grid::new(7).unwrap();
        let mut fb = FrameBuffer::default();
        project(&grid, &mut fb).unwrap();

        assert_eq!(fb.get_pixel(3, 3), PixelColor::Background);
        fb.set_pixel(3, 3, PixelColor::Foreground);
        fb.refresh().unwrap();
        assert_eq!(fb.get_pixel(3, 3), PixelColor::Foreground);

        project_freeze(&mut fb, 2, 2).unwrap();
        assert_eq!(fb.get_pixel(2, 2), PixelColor::Foreground);
        assert_eq!(fb.refreshes(), 3);
    }

    #[test]
    fn test_out_of_range_pixels_ignored() {
        let mut fb = FrameBuffer::default();
        fb.render_init(3, 3).unwrap();
        fb.set_pixel(5, 1, PixelColor::Foreground);
        assert_eq!(fb.get_pixel(5, 1), PixelColor::Background);
    }

    #[test]
    fn test_projection_through_trait_object() {
        let grid = Grid::new(5).unwrap();
        let mut null = NullRenderer;
        let renderer: &mut dyn Renderer = &mut null;
        project(&grid, renderer).unwrap();
        assert_eq!(renderer.get_pixel(0, 0), PixelColor::Background);
    }
}
