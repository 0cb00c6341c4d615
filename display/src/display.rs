use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use ocho_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use ocho_core::state::FrameBuffer;

/// Lit and unlit pixel colors as RGB triples
const FOREGROUND: [u8; 3] = [0xE8, 0xE8, 0xE8];
const BACKGROUND: [u8; 3] = [0x10, 0x10, 0x18];

/// # Display
/// Presents the 64x32 frame buffer in an SDL2 window.
///
/// The core hands over a grid of 0/1 pixels; everything about presentation
/// (colors, scaling, the window itself) lives here. `render` is only called
/// when the frame buffer has actually changed.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Creates a window of the requested size bound to an sdl2 context
    pub fn new(sdl: &sdl2::Sdl, width: u32, height: u32) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window("ocho", width, height)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        Ok(Display { canvas })
    }

    /// Streams the frame buffer into an RGB24 texture and stretches it over
    /// the window
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], _pitch: usize| {
            buffer.copy_from_slice(&frame_to_rgb(frame));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// Expands the 0/1 frame buffer into concatenated rows of RGB pixels
fn frame_to_rgb(frame: &FrameBuffer) -> Vec<u8> {
    frame
        .iter()
        .flatten()
        .flat_map(|&pixel| if pixel == 0x1 { FOREGROUND } else { BACKGROUND })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_rgb_maps_colors() {
        let mut frame: FrameBuffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        frame[0][1] = 1;
        frame[1][0] = 1;
        let rgb = frame_to_rgb(&frame);

        assert_eq!(rgb.len(), DISPLAY_WIDTH * DISPLAY_HEIGHT * 3);
        assert_eq!(rgb[0..3], BACKGROUND);
        assert_eq!(rgb[3..6], FOREGROUND);
        let second_row = DISPLAY_WIDTH * 3;
        assert_eq!(rgb[second_row..second_row + 3], FOREGROUND);
        assert_eq!(rgb[second_row + 3..second_row + 6], BACKGROUND);
    }
}
