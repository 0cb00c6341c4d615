use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Error};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use ocho_core::{Chip8, Quirks};
use ocho_display::Display;

use crate::audio::Audio;
use crate::keymap::keymap;
use crate::Args;

/// How long to sleep between host frames; the cpu catches up to real time
/// on every update, so the frame rate only bounds input and render latency
const FRAME_TIME: Duration = Duration::from_micros(1_000_000 / 60);

pub fn run(args: &Args) -> Result<(), Error> {
    let quirks = Quirks {
        shift_reads_vy: args.shift_quirk,
        jump_adds_vx: args.jump_quirk,
    };
    let mut chip8 = Chip8::with_quirks(args.clock, quirks);

    let file = File::open(&args.rom)
        .with_context(|| format!("unable to open rom {}", args.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader).context("unable to load rom")?;

    let sdl = sdl2::init().map_err(Error::msg)?;
    let mut display = Display::new(&sdl, args.width, args.height).map_err(Error::msg)?;
    let audio = Audio::new(&sdl).map_err(Error::msg)?;
    let mut events = sdl.event_pump().map_err(Error::msg)?;

    'event: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    scancode: Some(scancode),
                    ..
                } => {
                    if let Some(key) = keymap(scancode) {
                        chip8.key_press(key);
                    }
                }
                Event::KeyUp {
                    scancode: Some(scancode),
                    ..
                } => {
                    if let Some(key) = keymap(scancode) {
                        chip8.key_release(key);
                    }
                }
                _ => {}
            }
        }

        chip8.update().context("emulation halted")?;

        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(Error::msg)?;
        }
        audio.set_playing(chip8.sound_active());

        thread::sleep(FRAME_TIME);
    }

    Ok(())
}
