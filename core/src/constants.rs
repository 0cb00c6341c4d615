/// Display dimensions measured in Chip-8 pixels
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory
pub const RAM_SIZE: usize = 4096;

/// Where ROMs are loaded into memory
pub const ROM_ADDRESS: usize = 0x200;

/// The largest ROM that fits between the load address and the end of memory
pub const MAX_ROM_SIZE: usize = RAM_SIZE - ROM_ADDRESS;

/// Return address slots available to nested subroutine calls
pub const STACK_SIZE: usize = 16;

/// The delay and sound timers count down at a fixed rate regardless of the
/// cpu clock speed
pub const TIMER_CLOCK_HZ: u32 = 60;

/// Default cpu clock speed in instructions per second
pub const DEFAULT_CLOCK_HZ: u32 = 700;

/// Where the hexadecimal font lives in memory
pub const FONT_ADDRESS: usize = 0x50;

/// Bytes per font glyph
pub const FONT_GLYPH_SIZE: usize = 5;

/// The built-in hexadecimal font: 16 glyphs of 5 rows, one byte per row with
/// the sprite in the high nibble
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
