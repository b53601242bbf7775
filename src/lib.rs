pub mod chunk; // Bounded, resumable processing protocol
pub mod domain; // Fixed-point and floating-point numeric domains
pub mod dsp;
pub mod rate;

pub use chunk::MAX_CHUNK_SIZE;
pub use domain::{Base, Domain, Fixed16, Float32, Signal};
pub use dsp::envelope::{EnvParams, Envelope, EnvelopeStage};
pub use dsp::filter::{FilterChunk, FilterFrame, SVFilter};
pub use dsp::oscillator::{OscChunk, Oscillator, Waveforms};
pub use rate::{SampleRate, UnsupportedRate};

pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
