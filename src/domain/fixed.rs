//! The 16-bit fixed-point numeric domain.
//!
//! Signals cross the API as 16-bit Q-format numbers, one format per
//! role, so the position of the binary point is part of the type:
//!
//!   Sample    I4F12   unity at 4096, 9 dB of headroom before clipping
//!   Note      U7F9    MIDI note number, ~0.2 cent resolution
//!   Tune      I7F9    signed note offset
//!   Scalar    U0F16   controls in [0, 1)
//!   EnvTime   U3F13   stage durations, 0 to 8 seconds
//!
//! Internal accumulators are wider (32-bit) where a 16-bit value would
//! starve: the envelope level needs increments as small as full-scale
//! over eight seconds of samples, the oscillator phase needs sub-cent
//! pitch resolution, and the filter integrators need resonant headroom.
//!
//! Kernels saturate instead of panicking: a hostile parameter stream may
//! sound wrong, but it must never take the audio thread down.

use fixed::types::{I12F20, I1F15, I4F12, I4F28, I7F9, U0F16, U16F0, U1F31, U3F13, U5F27, U7F9};

use crate::dsp::envelope::EnvKernel;
use crate::dsp::filter::{FilterFrame, FilterKernel};
use crate::dsp::oscillator::{OscKernel, Waveforms};
use crate::rate::SampleRate;

use super::{tables, Base};

/// An audio sample: signed, 12 fractional bits.
pub type Sample = I4F12;
/// A pitch in MIDI note-number terms.
pub type Note = U7F9;
/// A signed pitch offset.
pub type Tune = I7F9;
/// A control value in `[0, 1)`.
pub type Scalar = U0F16;
/// An envelope duration in seconds, 0 to 8.
pub type EnvTime = U3F13;
/// Oscillator phase in half-cycles, nominally `[-1, 1)`.
pub type Phase = I4F28;
/// Envelope level accumulator.
pub type Level = U1F31;
/// Filter integrator state.
pub type FiltState = I12F20;

/// Shape ceiling, 15/16. See the float domain for why the control
/// cannot reach 1.
const SHAPE_CLIP: Scalar = Scalar::lit("0x0.F000");

/// Resonance ceiling, 15/16.
const RES_CEIL: Scalar = Scalar::lit("0x0.F000");

/// Marker for the 16-bit fixed-point engine family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed16;

impl Base for Fixed16 {
    type Sample = Sample;
    type Note = Note;
    type Tune = Tune;
    type Scalar = Scalar;
    type EnvTime = EnvTime;
    type Level = Level;
    type Phase = Phase;
    type FiltState = FiltState;

    const GATE_ON: Sample = Sample::lit("0.5");
    const LEVEL_FULL: Level = Level::ONE;

    fn clamp_note(note: Note) -> Note {
        // U7F9 tops out just below note 128; the type is the clamp.
        note
    }

    fn apply_tune(note: Note, tune: Tune) -> Note {
        note.saturating_add_signed(tune)
    }

    fn level_of(scalar: Scalar) -> Level {
        Level::from_num(scalar)
    }

    fn scalar_of(level: Level) -> Scalar {
        Scalar::saturating_from_num(level)
    }
}

fn clip_shape(shape: Scalar) -> Scalar {
    if shape > SHAPE_CLIP {
        SHAPE_CLIP
    } else {
        shape
    }
}

impl OscKernel for Fixed16 {
    fn waveforms(phase: Phase) -> Waveforms<Self> {
        let x = I1F15::saturating_from_num(phase);
        let saw = Sample::from_num(x);
        let two = Sample::lit("2");
        let ramp = saw.unwrapped_shl(1);
        let (square, triangle) = if x < I1F15::ZERO {
            let tri = if x < I1F15::lit("-0.5") {
                ramp.unwrapped_neg() - two
            } else {
                ramp
            };
            (Sample::NEG_ONE, tri)
        } else {
            let tri = if x < I1F15::lit("0.5") { ramp } else { two - ramp };
            (Sample::ONE, tri)
        };
        Waveforms {
            sine: Sample::from_num(tables::sin_pi(x)),
            square,
            triangle,
            saw,
        }
    }

    fn advance_phase(rate: SampleRate, phase: Phase, note: Note, shape: Scalar) -> Phase {
        let increment = tables::phase_increment(rate, note);
        let k = clip_shape(shape);
        // U5F27 holds the worst-case warp factor 1/(1 - 15/16) = 16
        // exactly, and the warped step (under 10) with room to spare.
        let one = U5F27::ONE;
        let k_w = U5F27::from_num(k);

        let warp = if phase < Phase::ZERO {
            one / (one + k_w)
        } else {
            one / (one - k_w)
        };
        let step = U5F27::from_num(increment).saturating_mul(warp);

        let old = phase;
        let mut phase = phase.saturating_add(Phase::saturating_from_num(step));

        if old < Phase::ZERO && phase > Phase::ZERO && k != Scalar::ZERO {
            // Residual advance crossed into the fast half at the wrong
            // speed; rescale it.
            let corrected = U5F27::from_num(phase)
                .saturating_mul(one + k_w)
                .saturating_div(one - k_w);
            phase = Phase::saturating_from_num(corrected);
        }
        if phase >= Phase::ONE {
            if k == Scalar::ZERO {
                phase -= Phase::lit("2");
            } else {
                let residual = U5F27::from_num(phase - Phase::ONE)
                    .saturating_mul(one - k_w)
                    .saturating_div(one + k_w);
                phase = Phase::saturating_from_num(residual) - Phase::ONE;
            }
        }
        phase
    }
}

impl EnvKernel for Fixed16 {
    fn ramp_increment(rate: SampleRate, span: Level, duration: EnvTime) -> Level {
        let sr = U16F0::from_num(rate.hz() as u16);
        // A zero duration degenerates to a single-sample ramp.
        let steps = duration.wide_mul(sr).to_num::<u32>().max(1);
        span / steps
    }
}

impl FilterKernel for Fixed16 {
    fn filter_step(
        rate: SampleRate,
        input: Sample,
        cutoff: Note,
        resonance: Scalar,
        low_z: &mut FiltState,
        band_z: &mut FiltState,
    ) -> FilterFrame<Self> {
        let g = tables::tan_ratio(tables::prewarp_angle(rate, cutoff));
        let res = if resonance > RES_CEIL { RES_CEIL } else { resonance };
        let damp = Scalar::MAX - res;

        let g_w = FiltState::from_num(g);
        let damp2 = FiltState::from_num(damp).unwrapped_shl(1);
        let denom = g_w * g_w + damp2 * g_w + FiltState::ONE;

        // Feedback taps narrow through Sample first so a ringing
        // integrator cannot overflow the products.
        let band_fb = Sample::saturating_from_num(*band_z);
        let feedback = (damp2 + g_w) * FiltState::from_num(band_fb);
        let acc = FiltState::from_num(input)
            .saturating_sub(feedback)
            .saturating_sub(*low_z);
        let numerator = Sample::saturating_from_num(acc);
        let high = Sample::saturating_from_num(FiltState::from_num(numerator) / denom);

        let band_gain = g_w * FiltState::from_num(high);
        let band = band_gain.saturating_add(*band_z);
        *band_z = band.saturating_add(band_gain);
        let band = Sample::saturating_from_num(band);

        let low_gain = g_w * FiltState::from_num(band);
        let low = low_gain.saturating_add(*low_z);
        *low_z = low.saturating_add(low_gain);
        let low = Sample::saturating_from_num(low);

        FilterFrame { low, band, high }
    }
}
