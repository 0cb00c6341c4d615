use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const TONE_HZ: f32 = 1000.0;
const SAMPLE_HZ: i32 = 44_100;

/// # Audio
/// The Chip-8 has a single fixed tone, played for as long as the sound
/// timer is nonzero. The core only exposes whether the timer is running;
/// the waveform lives here.
pub struct Audio {
    device: AudioDevice<Tone>,
}

impl Audio {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_HZ),
            channels: Some(1),
            samples: Some(2048),
        };
        let device = subsystem.open_playback(None, &desired, |spec| Tone {
            phase: 0.0,
            phase_step: TONE_HZ / spec.freq as f32,
            volume: 0.25,
        })?;
        Ok(Audio { device })
    }

    /// Resumes or pauses the tone to follow the sound timer
    pub fn set_playing(&self, playing: bool) {
        if playing {
            self.device.resume();
        } else {
            self.device.pause();
        }
    }
}

/// A sine wave generator fed to the audio device callback
struct Tone {
    phase: f32,
    phase_step: f32,
    volume: f32,
}

impl AudioCallback for Tone {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = (self.phase * std::f32::consts::TAU).sin() * self.volume;
            self.phase = (self.phase + self.phase_step) % 1.0;
        }
    }
}
