use crate::renderer::{PixelColor, Renderer};

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
}

/// Downsample a `width` x `height` surface into Braille characters.
/// Foreground pixels become dots; cells without dots are skipped.
pub fn render_to_braille<R: Renderer + ?Sized>(
    surface: &R,
    width: u32,
    height: u32,
    canvas_width: u16,
    canvas_height: u16,
) -> Vec<BrailleCell> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Braille effective resolution
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;

    // Keep the grid square on screen: use the tighter of the two scales
    let scale = (width as f32 / braille_width.max(1) as f32)
        .max(height as f32 / braille_height.max(1) as f32);

    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let src_x = ((base_bx + dx) as f32 * scale) as u32;
                    let src_y = ((base_by + dy) as f32 * scale) as u32;

                    if src_x < width
                        && src_y < height
                        && surface.get_pixel(src_x, src_y) == PixelColor::Foreground
                    {
                        pattern |= BRAILLE_DOTS[dx][dy];
                    }
                }
            }

            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                });
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameBuffer;

    #[test]
    fn test_braille_pattern() {
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_one_to_one_rendering() {
        let mut fb = FrameBuffer::default();
        fb.render_init(4, 4).unwrap();
        fb.set_pixel(0, 0, PixelColor::Foreground);
        fb.set_pixel(3, 3, PixelColor::Foreground);

        let cells = render_to_braille(&fb, 4, 4, 2, 1);
        assert_eq!(
            cells,
            vec![
                BrailleCell { x: 0, y: 0, char: '\u{2801}' },
                BrailleCell { x: 1, y: 0, char: '\u{2880}' },
            ]
        );
    }

    #[test]
    fn test_blank_surface_emits_nothing() {
        let mut fb = FrameBuffer::default();
        fb.render_init(64, 64).unwrap();
        assert!(render_to_braille(&fb, 64, 64, 10, 5).is_empty());
        assert!(render_to_braille(&fb, 0, 0, 10, 5).is_empty());
    }
}
