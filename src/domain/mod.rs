//! The two numeric domains the engines are instantiated over.
//!
//! Every generator in [crate::dsp] is written once, generically, against
//! the traits here. [Float32] runs the math in `f32`; [Fixed16] runs it
//! in 16-bit Q-format fixed point with wider internal accumulators. The
//! state machines and the chunking protocol are shared; only the
//! per-sample arithmetic kernels differ.

pub mod fixed;
pub mod float;
pub(crate) mod tables;

use core::fmt::Debug;
use core::ops::{Add, Sub};

use crate::dsp::envelope::EnvKernel;
use crate::dsp::filter::FilterKernel;
use crate::dsp::oscillator::OscKernel;

pub use self::fixed::Fixed16;
pub use self::float::Float32;

/// The operations every signal-carrying type must support so the shared
/// state machines can compare, accumulate, and buffer it.
///
/// Deliberately small: anything beyond add/subtract/compare lives in the
/// per-domain kernels, where the representation is known.
pub trait Signal:
    Copy
    + Default
    + Debug
    + PartialOrd
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Send
    + 'static
{
}

impl<T> Signal for T where
    T: Copy
        + Default
        + Debug
        + PartialOrd
        + Add<T, Output = T>
        + Sub<T, Output = T>
        + Send
        + 'static
{
}

/// The signal roles of one numeric domain, plus the conversions shared by
/// more than one generator.
///
/// For [Float32] every associated type is `f32`. For [Fixed16] each role
/// carries its own Q format so the decimal point is tracked by the type
/// system rather than by convention.
pub trait Base: Copy + Default + Send + Sized + 'static {
    /// An audio sample, signed, centered at zero.
    type Sample: Signal;
    /// A pitch, in MIDI note-number terms (69.0 = A440).
    type Note: Signal;
    /// A signed offset to a [Base::Note].
    type Tune: Signal;
    /// A control value in `[0, 1)`: waveform shape, sustain, resonance.
    type Scalar: Signal;
    /// An envelope stage duration, in seconds.
    type EnvTime: Signal;
    /// The envelope's internal level accumulator. Wider than
    /// [Base::Scalar] so the slowest ramp still moves every sample.
    type Level: Signal;
    /// The oscillator's phase accumulator, normalized so one cycle spans
    /// `[-1, 1)`.
    type Phase: Signal;
    /// A filter integrator state. Wider than [Base::Sample] so resonant
    /// feedback has headroom.
    type FiltState: Signal;

    /// Gate samples at or above this value read as "held down".
    const GATE_ON: Self::Sample;
    /// The envelope's full-scale level.
    const LEVEL_FULL: Self::Level;

    /// Clamp a pitch to the representable playback range. Keeps the
    /// implied frequency below Nyquist at both supported rates.
    fn clamp_note(note: Self::Note) -> Self::Note;
    /// Add a tuning offset to a pitch, saturating at the range ends.
    fn apply_tune(note: Self::Note, tune: Self::Tune) -> Self::Note;
    /// Widen a control value into envelope-level precision.
    fn level_of(scalar: Self::Scalar) -> Self::Level;
    /// Narrow an envelope level back to a control value.
    fn scalar_of(level: Self::Level) -> Self::Scalar;
}

/// A complete numeric domain: the types plus the arithmetic kernel of
/// every generator. This is the bound the public generators take.
pub trait Domain: Base + OscKernel + EnvKernel + FilterKernel {}

impl<T: Base + OscKernel + EnvKernel + FilterKernel> Domain for T {}
