//! The 32-bit floating-point numeric domain.
//!
//! Every signal role is `f32` and the kernels are the textbook forms of
//! each algorithm. This is the domain to read first when following the
//! math; the fixed-point domain mirrors it operation for operation.

use crate::dsp::envelope::EnvKernel;
use crate::dsp::filter::{FilterFrame, FilterKernel};
use crate::dsp::oscillator::{OscKernel, Waveforms};
use crate::rate::SampleRate;
use crate::MIN_TIME;

use super::Base;

/// Top of the playable pitch range. Matches the fixed-point note type's
/// ceiling, about 12.5 kHz - below Nyquist at both supported rates.
const NOTE_MAX: f32 = 127.998;

/// Shape is phase distortion; at 1.0 the math degenerates (one half of
/// the cycle would take zero time), so the control clips at 15/16.
const SHAPE_CLIP: f32 = 0.9375;

/// Resonance ceiling. Above this the damping term gets small enough
/// that the integrators ring without bound.
const RES_CEIL: f32 = 0.9375;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
fn note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Marker for the `f32` engine family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float32;

impl Base for Float32 {
    type Sample = f32;
    type Note = f32;
    type Tune = f32;
    type Scalar = f32;
    type EnvTime = f32;
    type Level = f32;
    type Phase = f32;
    type FiltState = f32;

    const GATE_ON: f32 = 0.5;
    const LEVEL_FULL: f32 = 1.0;

    fn clamp_note(note: f32) -> f32 {
        note.clamp(0.0, NOTE_MAX)
    }

    fn apply_tune(note: f32, tune: f32) -> f32 {
        note + tune
    }

    fn level_of(scalar: f32) -> f32 {
        scalar.clamp(0.0, 1.0)
    }

    fn scalar_of(level: f32) -> f32 {
        level
    }
}

impl OscKernel for Float32 {
    fn waveforms(phase: f32) -> Waveforms<Self> {
        // Phase lives in [-1, 1) half-cycles; every waveform is a
        // closed form over it.
        let ramp = 2.0 * phase;
        let (square, triangle) = if phase < 0.0 {
            (-1.0, if phase < -0.5 { -ramp - 2.0 } else { ramp })
        } else {
            (1.0, if phase < 0.5 { ramp } else { 2.0 - ramp })
        };
        Waveforms {
            sine: (core::f32::consts::PI * phase).sin(),
            square,
            triangle,
            saw: phase,
        }
    }

    fn advance_phase(rate: SampleRate, phase: f32, note: f32, shape: f32) -> f32 {
        let increment = 2.0 * note_to_freq(note) / rate.hz_f32();
        let k = shape.clamp(0.0, SHAPE_CLIP);

        // Phase distortion: spend (1+k)/2 of the period in the negative
        // half-cycle and (1-k)/2 in the positive, keeping the
        // fundamental while skewing the waveform symmetry.
        let step = if phase < 0.0 {
            increment / (1.0 + k)
        } else {
            increment / (1.0 - k)
        };
        let old = phase;
        let mut phase = phase + step;

        // Crossing into the fast half mid-step: the residual advance
        // happened at the wrong speed, rescale it.
        if old < 0.0 && phase > 0.0 && k != 0.0 {
            phase = phase * (1.0 + k) / (1.0 - k);
        }
        // Wrap at the top, rescaling the residual back into the slow
        // half for asymmetric shapes.
        if phase >= 1.0 {
            if k == 0.0 {
                phase -= 2.0;
            } else {
                phase = (phase - 1.0) * (1.0 - k) / (1.0 + k) - 1.0;
            }
        }
        phase
    }
}

impl EnvKernel for Float32 {
    fn ramp_increment(rate: SampleRate, span: f32, duration: f32) -> f32 {
        span / (duration.max(MIN_TIME) * rate.hz_f32())
    }
}

impl FilterKernel for Float32 {
    fn filter_step(
        rate: SampleRate,
        input: f32,
        cutoff: f32,
        resonance: f32,
        low_z: &mut f32,
        band_z: &mut f32,
    ) -> FilterFrame<Self> {
        let f_c = note_to_freq(Self::clamp_note(cutoff));
        let g = (core::f32::consts::PI * f_c / rate.hz_f32()).tan();
        let damp = 1.0 - resonance.clamp(0.0, RES_CEIL);

        let denom = g * g + 2.0 * damp * g + 1.0;
        let high = (input - (2.0 * damp + g) * *band_z - *low_z) / denom;

        // Trapezoidal integrators: each output is the state plus half a
        // step, and the state advances a full step.
        let band_gain = g * high;
        let band = band_gain + *band_z;
        *band_z = band + band_gain;

        let low_gain = g * band;
        let low = low_gain + *low_z;
        *low_z = low + low_gain;

        FilterFrame { low, band, high }
    }
}
