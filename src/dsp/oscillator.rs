use crate::chunk::{self, MAX_CHUNK_SIZE};
use crate::domain::fixed::{self, Fixed16};
use crate::domain::{Base, Domain};
use crate::rate::SampleRate;

/*
Phase-Accumulator Oscillator
============================

One accumulator, four waveforms. Every sample the oscillator derives
sine, square, triangle, and sawtooth values from the same phase, so the
outputs stay phase-locked forever - a caller can crossfade between them
without beating artifacts.

Vocabulary
----------

  phase       Where we are in the current cycle. Normalized to
              [-1.0, 1.0) in units of half-cycles: -1 is the start of
              the negative half, 0 the upward crossing, +1 wraps back
              to -1.

  increment   How far phase advances per sample: 2 * frequency / rate.
              At 440 Hz and 48 kHz that's about 0.0183 half-cycles.

  note        Pitch as a MIDI-style note number (69 = A440). Converted
              to an increment per sample, so pitch can glide freely.

  shape       Phase distortion amount, 0 to 15/16. Warps how fast the
              two half-cycles are traversed without changing the
              fundamental.


The Waveforms
-------------

All four are closed forms over the normalized phase x:

  saw       x                      ramp from -1 to +1, snap back
  square    sign(x)                -1 below the crossing, +1 above
  triangle  2x folded at |x|=1/2   constant slope up then down
  sine      sin(pi * x)            the smooth reference

            -1        0        +1
  saw        ╲________╱╲________
  square     ──┐  ┌───────┐
  triangle     ╲ ╱╲  ... and so on


Shape = Phase Distortion
------------------------

Rather than selecting a waveform, shape skews all of them at once. With
distortion k, the negative half-cycle is traversed at 1/(1+k) speed and
the positive half at 1/(1-k). The period is unchanged - one half gets
longer exactly as the other gets shorter - so pitch holds while square
duty, saw curvature, and triangle symmetry all morph together.

Two corrections keep asymmetric phase honest at the seams: a step that
crosses zero mid-sample has its residual rescaled into the fast half's
speed, and a step that wraps past +1 has its residual rescaled back
into the slow half. Without these the waveform would jitter by up to a
sample's worth of phase at every transition.

Pitches that would push the fundamental toward Nyquist are clamped at
the top of the note range (about 12.5 kHz) rather than aliasing wildly
or faulting.
*/

/// Per-domain oscillator arithmetic: waveform shaping and the distorted
/// phase advance.
pub trait OscKernel: Base {
    /// All four waveform values at `phase`.
    fn waveforms(phase: Self::Phase) -> Waveforms<Self>;
    /// The next phase after one sample at `note` with distortion
    /// `shape`.
    fn advance_phase(
        rate: SampleRate,
        phase: Self::Phase,
        note: Self::Note,
        shape: Self::Scalar,
    ) -> Self::Phase;
}

/// One sample of the four correlated outputs.
#[derive(Clone, Copy)]
pub struct Waveforms<D: Base> {
    pub sine: D::Sample,
    pub square: D::Sample,
    pub triangle: D::Sample,
    pub saw: D::Sample,
}

/// One chunk of oscillator output: four equal-length slices borrowed
/// from the instance, valid until the next process call.
pub struct OscChunk<'a, D: Base> {
    pub sine: &'a [D::Sample],
    pub square: &'a [D::Sample],
    pub triangle: &'a [D::Sample],
    pub saw: &'a [D::Sample],
}

impl<D: Base> OscChunk<'_, D> {
    /// Samples produced by the call that returned this chunk.
    pub fn len(&self) -> usize {
        self.sine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sine.is_empty()
    }
}

/// A variable-pitch, audio-rate oscillator.
///
/// Feed it synchronized per-sample Note and Shape streams; it produces
/// four phase-locked output streams through the chunked protocol. State
/// is one phase accumulator, so chunk boundaries are invisible in the
/// output.
pub struct Oscillator<D: Domain> {
    phase: D::Phase,
    sine: [D::Sample; MAX_CHUNK_SIZE],
    square: [D::Sample; MAX_CHUNK_SIZE],
    triangle: [D::Sample; MAX_CHUNK_SIZE],
    saw: [D::Sample; MAX_CHUNK_SIZE],
}

impl<D: Domain> Oscillator<D> {
    pub fn new() -> Self {
        Self {
            phase: <D::Phase>::default(),
            sine: [<D::Sample>::default(); MAX_CHUNK_SIZE],
            square: [<D::Sample>::default(); MAX_CHUNK_SIZE],
            triangle: [<D::Sample>::default(); MAX_CHUNK_SIZE],
            saw: [<D::Sample>::default(); MAX_CHUNK_SIZE],
        }
    }

    /// Return the phase accumulator to the start of a cycle.
    pub fn reset(&mut self) {
        self.phase = <D::Phase>::default();
    }

    /// Produce up to [MAX_CHUNK_SIZE] samples starting at `offset` into
    /// the input streams. The returned slices' length is the count
    /// produced; an offset at or past the shortest stream produces
    /// nothing and changes nothing.
    pub fn process(
        &mut self,
        rate: SampleRate,
        note: &[D::Note],
        shape: &[D::Scalar],
        offset: usize,
    ) -> OscChunk<'_, D> {
        let count = chunk::span(offset, &[note.len(), shape.len()]);
        self.render(rate, offset, count, shape, |j| note[j]);
        self.chunk(count)
    }

    fn render(
        &mut self,
        rate: SampleRate,
        offset: usize,
        count: usize,
        shape: &[D::Scalar],
        note_at: impl Fn(usize) -> D::Note,
    ) {
        for i in 0..count {
            let j = offset + i;
            let w = D::waveforms(self.phase);
            self.sine[i] = w.sine;
            self.square[i] = w.square;
            self.triangle[i] = w.triangle;
            self.saw[i] = w.saw;
            self.phase = D::advance_phase(rate, self.phase, D::clamp_note(note_at(j)), shape[j]);
        }
    }

    fn chunk(&self, count: usize) -> OscChunk<'_, D> {
        OscChunk {
            sine: &self.sine[..count],
            square: &self.square[..count],
            triangle: &self.triangle[..count],
            saw: &self.saw[..count],
        }
    }
}

impl Oscillator<Fixed16> {
    /// [Oscillator::process] with an additional fine-tune stream, added
    /// to the note (saturating) before frequency conversion.
    pub fn process_tuned(
        &mut self,
        rate: SampleRate,
        note: &[fixed::Note],
        tune: &[fixed::Tune],
        shape: &[fixed::Scalar],
        offset: usize,
    ) -> OscChunk<'_, Fixed16> {
        let count = chunk::span(offset, &[note.len(), tune.len(), shape.len()]);
        self.render(rate, offset, count, shape, |j| {
            Fixed16::apply_tune(note[j], tune[j])
        });
        self.chunk(count)
    }
}

impl<D: Domain> Default for Oscillator<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fixed16, Float32};
    use std::f32::consts::TAU;

    const A4: f32 = 69.0;

    fn render_float(note: f32, shape: f32, len: usize) -> (Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>) {
        let notes = vec![note; len];
        let shapes = vec![shape; len];
        let mut osc = Oscillator::<Float32>::new();
        let (mut sn, mut sq, mut tr, mut sw) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let mut done = 0;
        while done < len {
            let out = osc.process(SampleRate::Hz48000, &notes, &shapes, done);
            assert!(!out.is_empty());
            sn.extend_from_slice(out.sine);
            sq.extend_from_slice(out.square);
            tr.extend_from_slice(out.triangle);
            sw.extend_from_slice(out.saw);
            done += out.len();
        }
        (sn, sq, tr, sw)
    }

    #[test]
    fn sine_matches_closed_form() {
        let (sine, _, _, _) = render_float(A4, 0.0, 128);

        // sample n should be sin(2pi f n / sr), f = 440Hz (MIDI 69)
        for n in [0, 12, 77, 127] {
            let expected = (TAU * 440.0 * n as f32 / 48_000.0).sin();
            assert!(
                (sine[n] - expected).abs() < 5e-4,
                "sample {n}: expected {expected}, got {}",
                sine[n]
            );
        }
    }

    #[test]
    fn outputs_are_phase_locked() {
        let (sine, square, triangle, saw) = render_float(A4, 0.0, 1024);
        for n in 0..1024 {
            let expected_square = if saw[n] >= 0.0 { 1.0 } else { -1.0 };
            assert_eq!(square[n], expected_square, "sample {n}");
            assert!(sine[n].abs() <= 1.0);
            assert!(triangle[n].abs() <= 1.0 + 1e-6);
            assert!((-1.0..1.0).contains(&saw[n]));
        }
    }

    #[test]
    fn shape_skews_square_duty() {
        // With distortion k the negative half takes (1+k)/2 of the
        // period; at k = 0.5 that's 75% low duty.
        let (_, square, _, _) = render_float(A4, 0.5, 48_000);
        let low = square.iter().filter(|&&s| s < 0.0).count();
        let duty = low as f32 / 48_000.0;
        assert!((duty - 0.75).abs() < 0.01, "low duty was {duty}");
    }

    #[test]
    fn pitch_above_the_range_is_clamped_not_broken() {
        let (sine, _, _, saw) = render_float(500.0, 0.0, 4096);
        for n in 0..4096 {
            assert!(sine[n].is_finite() && saw[n].is_finite());
            assert!(sine[n].abs() <= 1.0);
        }
    }

    fn rising_edges(square: &[fixed::Sample]) -> usize {
        square
            .windows(2)
            .filter(|w| w[0] < fixed::Sample::ZERO && w[1] >= fixed::Sample::ZERO)
            .count()
    }

    #[test]
    fn fixed_point_pitch_matches_the_note() {
        let len = 44_100;
        let notes = vec![fixed::Note::from_num(69); len];
        let shapes = vec![fixed::Scalar::ZERO; len];
        let mut osc = Oscillator::<Fixed16>::new();
        let mut square = Vec::new();
        let mut done = 0;
        while done < len {
            let out = osc.process(SampleRate::Hz44100, &notes, &shapes, done);
            square.extend_from_slice(out.square);
            done += out.len();
        }
        // One second of A440: expect 440 cycles, give or take an edge.
        let edges = rising_edges(&square);
        assert!(
            (438..=442).contains(&edges),
            "expected ~440 rising edges, got {edges}"
        );
    }

    #[test]
    fn tune_stream_shifts_the_pitch() {
        let len = 44_100;
        let notes = vec![fixed::Note::from_num(57); len];
        let octave_up = vec![fixed::Tune::from_num(12); len];
        let shapes = vec![fixed::Scalar::ZERO; len];
        let mut osc = Oscillator::<Fixed16>::new();
        let mut square = Vec::new();
        let mut done = 0;
        while done < len {
            let out = osc.process_tuned(SampleRate::Hz44100, &notes, &octave_up, &shapes, done);
            square.extend_from_slice(out.square);
            done += out.len();
        }
        // Note 57 tuned +12 semitones should land on A440.
        let edges = rising_edges(&square);
        assert!(
            (438..=442).contains(&edges),
            "expected ~440 rising edges, got {edges}"
        );
    }

    #[test]
    fn offset_past_the_input_produces_nothing() {
        let notes = vec![69.0f32; 10];
        let shapes = vec![0.0f32; 10];
        let mut osc = Oscillator::<Float32>::new();
        let out = osc.process(SampleRate::Hz48000, &notes, &shapes, 10);
        assert_eq!(out.len(), 0);
        let out = osc.process(SampleRate::Hz48000, &notes, &shapes, 5000);
        assert!(out.is_empty());
    }
}
