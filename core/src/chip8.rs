use std::io::Read;
use std::time::{Duration, Instant};

use crate::constants::{DEFAULT_CLOCK_HZ, MAX_ROM_SIZE, ROM_ADDRESS, TIMER_CLOCK_HZ};
use crate::error::Error;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// # Chip8
/// The Chip-8 execution engine.
///
/// Owns the machine `State` exclusively and mutates it one
/// fetch-decode-dispatch cycle at a time. The engine is driven by wall-clock
/// time rather than a fixed-step loop: the host calls [`Chip8::update`] once
/// per frame and the engine runs however many cpu and timer cycles have
/// accrued since the previous call.
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing emulation by elapsed wall-clock time
/// - reading the frame buffer when it has changed
/// - observing the sound timer
pub struct Chip8 {
    state: State,
    quirks: Quirks,
    clock_hz: u32,
    last_update: Option<Instant>,
    pending_cpu_cycles: f64,
    pending_timer_cycles: f64,
}

impl Chip8 {
    pub fn new(clock_hz: u32) -> Self {
        Self::with_quirks(clock_hz, Quirks::default())
    }

    pub fn with_quirks(clock_hz: u32, quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            quirks,
            clock_hz,
            last_update: None,
            pending_cpu_cycles: 0.0,
            pending_timer_cycles: 0.0,
        }
    }

    /// Resets the machine and loads a rom at the load address
    ///
    /// # Arguments
    /// * `reader` a byte source containing a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        self.state.reset();
        self.last_update = None;
        self.pending_cpu_cycles = 0.0;
        self.pending_timer_cycles = 0.0;
        self.state.memory[ROM_ADDRESS..ROM_ADDRESS + rom.len()].copy_from_slice(&rom);
        log::info!("loaded {} byte rom", rom.len());
        Ok(())
    }

    /// Catches emulation up to the present
    ///
    /// Computes the wall-clock time elapsed since the previous call (zero on
    /// the first call) and advances by it.
    pub fn update(&mut self) -> Result<(), Error> {
        let now = Instant::now();
        let elapsed = self
            .last_update
            .map_or(Duration::ZERO, |last_update| now - last_update);
        self.last_update = Some(now);
        self.advance(elapsed)
    }

    /// Advances emulation by an elapsed slice of wall-clock time
    ///
    /// Converts the elapsed time into pending cpu and timer cycles, runs the
    /// whole cycles of each, and carries the fractional remainders forward
    /// so partial cycles are neither lost nor double counted. A failed
    /// dispatch cycle aborts the cycles still pending for this call and
    /// propagates.
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), Error> {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.pending_cpu_cycles += elapsed_ms * f64::from(self.clock_hz) / 1000.0;
        self.pending_timer_cycles += elapsed_ms * f64::from(TIMER_CLOCK_HZ) / 1000.0;

        let timer_cycles = self.pending_timer_cycles as u64;
        let cpu_cycles = self.pending_cpu_cycles as u64;
        self.pending_timer_cycles -= timer_cycles as f64;
        self.pending_cpu_cycles -= cpu_cycles as f64;

        for _ in 0..timer_cycles {
            self.state.tick_timers();
        }
        for _ in 0..cpu_cycles {
            self.step()?;
        }
        Ok(())
    }

    /// Runs a single fetch-decode-dispatch cycle
    pub fn step(&mut self) -> Result<(), Error> {
        let op = self.fetch();
        let instruction = Instruction::decode(op)?;
        log::trace!(
            "{:#06X} {:?} pc={:#05X} i={:#05X}",
            op.word(),
            instruction,
            self.state.pc,
            self.state.i
        );
        instruction.execute(&mut self.state, self.quirks);
        Ok(())
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the hexadecimal index of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.state.key_state[key as usize & 0xF] = 0x1;
    }

    /// Unset the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the hexadecimal index of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.state.key_state[key as usize & 0xF] = 0x0;
    }

    /// Returns the frame buffer if it has changed since the last read,
    /// clearing the dirty flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether the host should be emitting a tone
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Combines the two memory bytes at the program counter into an opcode
    /// word
    fn fetch(&self) -> Opcode {
        let high = self.state.read_byte(self.state.pc);
        let low = self.state.read_byte(self.state.pc.wrapping_add(1));
        Opcode::from_bytes(high, low)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A rom that increments V1 forever; each executed cycle is observable
    /// as one increment
    fn counting_rom() -> Vec<u8> {
        std::iter::repeat([0x71, 0x01])
            .take(MAX_ROM_SIZE / 2)
            .flatten()
            .collect()
    }

    #[test]
    fn test_fetch_is_big_endian() {
        let mut chip8 = Chip8::default();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch(), Opcode::new(0xAABB));
    }

    #[test]
    fn test_load_rom_copies_to_load_address() {
        let mut chip8 = Chip8::default();
        chip8.load_rom(&mut [0x00u8, 0xE0].as_slice()).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn test_load_rom_resets_the_machine() {
        let mut chip8 = Chip8::default();
        chip8.state.v[0x1] = 0xAB;
        chip8.state.pc = 0x400;
        chip8.pending_cpu_cycles = 0.7;
        chip8.load_rom(&mut [0x00u8, 0xE0].as_slice()).unwrap();
        assert_eq!(chip8.state.v[0x1], 0);
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.pending_cpu_cycles, 0.0);
    }

    #[test]
    fn test_load_rom_rejects_oversized_roms() {
        let mut chip8 = Chip8::default();
        let rom = vec![0u8; MAX_ROM_SIZE + 1];
        match chip8.load_rom(&mut rom.as_slice()) {
            Err(Error::RomTooLarge { size, max }) => {
                assert_eq!(size, MAX_ROM_SIZE + 1);
                assert_eq!(max, MAX_ROM_SIZE);
            }
            other => panic!("expected RomTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rom_accepts_max_sized_roms() {
        let mut chip8 = Chip8::default();
        let rom = vec![0x71u8; MAX_ROM_SIZE];
        assert!(chip8.load_rom(&mut rom.as_slice()).is_ok());
    }

    #[test]
    fn test_advance_runs_whole_cycles() {
        let mut chip8 = Chip8::new(400);
        chip8.load_rom(&mut counting_rom().as_slice()).unwrap();
        // 25ms at 400Hz is exactly 10 cycles
        chip8.advance(Duration::from_millis(25)).unwrap();
        assert_eq!(chip8.state.v[0x1], 10);
    }

    #[test]
    fn test_advance_carries_fractional_cycles() {
        let mut chip8 = Chip8::new(400);
        chip8.load_rom(&mut counting_rom().as_slice()).unwrap();
        // 13ms at 400Hz is 5.2 cycles; the 0.2 must carry, not vanish
        chip8.advance(Duration::from_millis(13)).unwrap();
        assert_eq!(chip8.state.v[0x1], 5);
        chip8.advance(Duration::from_millis(13)).unwrap();
        assert_eq!(chip8.state.v[0x1], 10);
    }

    #[test]
    fn test_advance_ticks_timers_at_sixty_hz() {
        let mut chip8 = Chip8::default();
        // A jump-to-self keeps the cpu busy while the timers drain
        chip8.load_rom(&mut [0x12u8, 0x00].as_slice()).unwrap();
        chip8.state.delay_timer = 5;
        chip8.advance(Duration::from_millis(100)).unwrap();
        assert_eq!(chip8.state.delay_timer, 0);
        chip8.advance(Duration::from_millis(100)).unwrap();
        assert_eq!(chip8.state.delay_timer, 0);
    }

    #[test]
    fn test_step_unknown_opcode_is_fatal_and_leaves_state_alone() {
        let mut chip8 = Chip8::default();
        chip8.load_rom(&mut [0xFFu8, 0xFF].as_slice()).unwrap();
        match chip8.step() {
            Err(Error::UnknownOpcode { opcode }) => assert_eq!(opcode, 0xFFFF),
            other => panic!("expected UnknownOpcode, got {other:?}"),
        }
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.state.v, [0; 16]);
    }

    #[test]
    fn test_advance_aborts_pending_cycles_on_failure() {
        let mut chip8 = Chip8::new(1000);
        chip8
            .load_rom(&mut [0x71u8, 0x01, 0xFF, 0xFF, 0x71, 0x01].as_slice())
            .unwrap();
        // 3ms at 1000Hz is 3 cycles; the second faults and the third never
        // runs
        assert!(chip8.advance(Duration::from_millis(3)).is_err());
        assert_eq!(chip8.state.v[0x1], 1);
    }

    #[test]
    fn test_wait_key_stalls_until_a_key_press() {
        let mut chip8 = Chip8::default();
        chip8.load_rom(&mut [0xF5u8, 0x0A].as_slice()).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_press(0xB);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x5], 0xB);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_key_release_unsets_state() {
        let mut chip8 = Chip8::default();
        chip8.key_press(0x3);
        assert_eq!(chip8.state.key_state[0x3], 0x1);
        chip8.key_release(0x3);
        assert_eq!(chip8.state.key_state[0x3], 0x0);
    }

    #[test]
    fn test_take_frame_clears_the_dirty_flag() {
        let mut chip8 = Chip8::default();
        assert!(chip8.take_frame().is_none());
        chip8.load_rom(&mut [0x00u8, 0xE0].as_slice()).unwrap();
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_sound_active_observes_the_sound_timer() {
        let mut chip8 = Chip8::default();
        assert!(!chip8.sound_active());
        chip8.state.sound_timer = 2;
        assert!(chip8.sound_active());
        chip8.state.tick_timers();
        chip8.state.tick_timers();
        assert!(!chip8.sound_active());
    }
}
