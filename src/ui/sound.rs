/// Sound effects: procedural chiptune blips via rodio.
///
/// Every effect is synthesized once into an in-memory WAV buffer when the
/// engine starts, then played fire-and-forget on a detached Sink.
///
/// Without the "sound" feature the stub SoundEngine does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_shoot: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
        sfx_fizzle: Arc<Vec<u8>>,
        sfx_start: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(make_wav(&sweep(320.0, 760.0, 0.11, 0.22))),
                sfx_shoot: Arc::new(make_wav(&gen_shoot())),
                sfx_land: Arc::new(make_wav(&gen_land())),
                sfx_fizzle: Arc::new(make_wav(&sweep(900.0, 500.0, 0.05, 0.08))),
                sfx_start: Arc::new(make_wav(&gen_start())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                match rodio::Decoder::new(cursor) {
                    Ok(src) => {
                        sink.append(src);
                        sink.detach();
                    }
                    Err(e) => debug!("sfx decode failed: {e}"),
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_shoot(&self) { self.play(&self.sfx_shoot); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
        pub fn play_fizzle(&self) { self.play(&self.sfx_fizzle); }
        pub fn play_start(&self) { self.play(&self.sfx_start); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    /// Sine glide from `from` Hz to `to` Hz with a linear fade out.
    fn sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - t) * volume
            })
            .collect()
    }

    /// Snowball throw: square-ish chirp over a pinch of noise.
    fn gen_shoot() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.07) as usize;
        let mut rng: u32 = 2024;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 1400.0 - t * 700.0;
                phase += freq / SAMPLE_RATE as f32;
                let square = if (phase * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (square * 0.7 + noise * 0.3) * (1.0 - t).powf(1.5) * 0.15
            })
            .collect()
    }

    /// Landing: low thud.
    fn gen_land() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.06) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * 110.0 * TAU).sin() * (1.0 - t).powf(2.0) * 0.35
            })
            .collect()
    }

    /// Level start: rising three-note chime.
    fn gen_start() -> Vec<f32> {
        let notes = [659.0_f32, 784.0, 988.0]; // E5, G5, B5
        let note_dur = 0.08;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder
    // ════════════════════════════════════════════════════════════

    /// 16-bit mono PCM WAV around `samples`, clamped to [-1, 1].
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let block_align: u16 = bits_per_sample / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API (no-ops when the sound feature is off)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_shoot(&self) {}
    pub fn play_land(&self) {}
    pub fn play_fizzle(&self) {}
    pub fn play_start(&self) {}
}
