//! Constant tables and small approximations backing the fixed-point
//! kernels.
//!
//! Everything here is generated at compile time. The generators never
//! divide by the sample rate or evaluate an exponential at runtime; they
//! look up a per-rate entry and linearly interpolate on the fractional
//! bits. Interpolation error against the exact curves stays near one
//! cent of pitch, which is below what the 9 fractional note bits can
//! express anyway.

use fixed::types::{I1F15, I4F28, U0F16, U1F15, U1F31};

use crate::rate::SampleRate;

use super::fixed::{Note, Phase};

/// One entry per MIDI semitone, plus a top anchor for interpolation.
const SEMITONES: usize = 129;

/// 2^(1/12), the equal-temperament semitone ratio.
const SEMITONE_RATIO: f64 = 1.059_463_094_359_295_3;

const fn note_frequency(n: i64) -> f64 {
    // Walk outward from A440 by semitone ratios; exact enough in f64
    // over the 128-step MIDI range.
    let mut f = 440.0f64;
    let mut i = 69i64;
    while i < n {
        f *= SEMITONE_RATIO;
        i += 1;
    }
    while i > n {
        f /= SEMITONE_RATIO;
        i -= 1;
    }
    f
}

const fn increment_table(rate_hz: f64) -> [I4F28; SEMITONES] {
    let mut table = [I4F28::ZERO; SEMITONES];
    let mut n = 0;
    while n < SEMITONES {
        // Phase is normalized to half-cycles, so a full cycle is 2.0.
        let half_cycles = 2.0 * note_frequency(n as i64) / rate_hz;
        table[n] = I4F28::from_bits((half_cycles * (1u64 << 28) as f64) as i32);
        n += 1;
    }
    table
}

static INC_44100: [I4F28; SEMITONES] = increment_table(44_100.0);
static INC_48000: [I4F28; SEMITONES] = increment_table(48_000.0);

/// Per-sample phase advance (in half-cycles) for `note` at `rate`,
/// interpolated between semitone entries on the note's fractional bits.
pub(crate) fn phase_increment(rate: SampleRate, note: Note) -> Phase {
    let table = match rate {
        SampleRate::Hz44100 => &INC_44100,
        SampleRate::Hz48000 => &INC_48000,
    };
    let bits = note.to_bits();
    let idx = (bits >> 9) as usize;
    let frac = (bits & 0x1FF) as i64;
    let lo = table[idx].to_bits() as i64;
    let hi = table[idx + 1].to_bits() as i64;
    Phase::from_bits((lo + (((hi - lo) * frac) >> 9)) as i32)
}

/// The filter's prewarp angle `pi * f_c / rate`, as a binary fraction of
/// one radian. The phase increment is `2 * f_c / rate`, so this is the
/// same table scaled by pi/2.
pub(crate) fn prewarp_angle(rate: SampleRate, cutoff: Note) -> U0F16 {
    const FRAC_PI_2: U1F31 = U1F31::lit("1.5707963");
    let inc = U1F31::from_num(phase_increment(rate, cutoff));
    U0F16::from_num(inc * FRAC_PI_2)
}

const SINE_POINTS: usize = 257;

const fn sin_pi_f64(x: f64) -> f64 {
    // Taylor series for sin(pi*x); 12 terms holds error below 1e-9
    // across |x| <= 1.
    let t = x * core::f64::consts::PI;
    let t2 = t * t;
    let mut term = t;
    let mut acc = t;
    let mut k = 1i64;
    while k <= 12 {
        term = -term * t2 / ((2 * k) as f64 * (2 * k + 1) as f64);
        acc += term;
        k += 1;
    }
    acc
}

const fn sine_table() -> [I1F15; SINE_POINTS] {
    let mut table = [I1F15::ZERO; SINE_POINTS];
    let mut i = 0;
    while i < SINE_POINTS {
        let x = (i as f64) / 128.0 - 1.0;
        let mut v = (sin_pi_f64(x) * 32_768.0) as i64;
        // +1.0 itself is not representable in I1F15
        if v > 32_767 {
            v = 32_767;
        }
        if v < -32_768 {
            v = -32_768;
        }
        table[i] = I1F15::from_bits(v as i16);
        i += 1;
    }
    table
}

static SINE: [I1F15; SINE_POINTS] = sine_table();

/// sin(pi * x) for x in `[-1, 1)`, table lookup with linear
/// interpolation on the low 8 bits.
pub(crate) fn sin_pi(x: I1F15) -> I1F15 {
    let bits = (x.to_bits() as i32).wrapping_add(1 << 15) as u16;
    let idx = (bits >> 8) as usize;
    let frac = (bits & 0xFF) as i32;
    let lo = SINE[idx].to_bits() as i32;
    let hi = SINE[idx + 1].to_bits() as i32;
    I1F15::from_bits((lo + (((hi - lo) * frac) >> 8)) as i16)
}

/// tan(x) for x in radians below one, via the odd-series head
/// `x * (1 + x^2/3)`.
///
/// Coarse above roughly half the Nyquist angle, but the filter only
/// needs tuning accuracy at musical cutoffs, where this is within a
/// cent.
pub(crate) fn tan_ratio(x: U0F16) -> U1F15 {
    const FRAC_1_3: U0F16 = U0F16::lit("0x0.5555");
    let x2 = x.wide_mul(x);
    let x2_over_3 = U0F16::from_num(x2).wide_mul(FRAC_1_3);
    let series = U1F15::ONE + U1F15::from_num(x2_over_3);
    U1F15::from_num(series.wide_mul(x))
}
