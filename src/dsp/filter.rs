use crate::chunk::{self, MAX_CHUNK_SIZE};
use crate::domain::{Base, Domain};
use crate::rate::SampleRate;

/*
State-Variable Filter
=====================

Two cascaded integrators in a feedback loop. The classic topology's
selling point is that the three responses fall out of one computation:

| output    | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| band-pass | around cutoff   | elsewhere    |
| high-pass | above cutoff    | below cutoff |

All three are emitted every sample; selecting or mixing them is the
caller's business.

Per sample, from the cutoff (a note-number pitch) and resonance:

  g     = tan(pi * f_c / rate)      integrator gain, prewarped so the
                                    digital cutoff lands where the
                                    analog one would
  damp  = 1 - resonance             how hard the band output is fed
                                    back to oppose ringing

  high  = (in - (2*damp + g)*band_z - low_z) / (g^2 + 2*damp*g + 1)
  band  = g*high + band_z           (integrator state advances 2x gain)
  low   = g*band + low_z

Resonance and the stability ceiling
-----------------------------------

As resonance approaches 1 the damping term vanishes and the loop rings
unboundedly. The engine clamps resonance at 15/16 - above that the
filter is already screaming - so the recurrence stays contractive and
the integrator states can never diverge, no matter what the automation
stream says. Clamped, not rejected: out-of-range automation must bend
the sound, not stop it.
*/

/// Per-domain state-variable recurrence.
pub trait FilterKernel: Base {
    /// Run one sample through the recurrence, updating the two
    /// integrator states in place. Implementations clamp resonance at
    /// the stability ceiling.
    fn filter_step(
        rate: SampleRate,
        input: Self::Sample,
        cutoff: Self::Note,
        resonance: Self::Scalar,
        low_z: &mut Self::FiltState,
        band_z: &mut Self::FiltState,
    ) -> FilterFrame<Self>;
}

/// One sample of the three simultaneous responses.
#[derive(Clone, Copy)]
pub struct FilterFrame<D: Base> {
    pub low: D::Sample,
    pub band: D::Sample,
    pub high: D::Sample,
}

/// One chunk of filter output: three equal-length slices borrowed from
/// the instance, valid until the next process call.
pub struct FilterChunk<'a, D: Base> {
    pub low: &'a [D::Sample],
    pub band: &'a [D::Sample],
    pub high: &'a [D::Sample],
}

impl<D: Base> FilterChunk<'_, D> {
    /// Samples produced by the call that returned this chunk.
    pub fn len(&self) -> usize {
        self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }
}

/// A two-pole state-variable filter with low, band, and high outputs.
///
/// State is the two integrator memories, so chunk boundaries are
/// invisible in the output.
pub struct SVFilter<D: Domain> {
    low_z: D::FiltState,
    band_z: D::FiltState,
    low: [D::Sample; MAX_CHUNK_SIZE],
    band: [D::Sample; MAX_CHUNK_SIZE],
    high: [D::Sample; MAX_CHUNK_SIZE],
}

impl<D: Domain> SVFilter<D> {
    pub fn new() -> Self {
        Self {
            low_z: <D::FiltState>::default(),
            band_z: <D::FiltState>::default(),
            low: [<D::Sample>::default(); MAX_CHUNK_SIZE],
            band: [<D::Sample>::default(); MAX_CHUNK_SIZE],
            high: [<D::Sample>::default(); MAX_CHUNK_SIZE],
        }
    }

    /// Zero both integrators.
    pub fn reset(&mut self) {
        self.low_z = <D::FiltState>::default();
        self.band_z = <D::FiltState>::default();
    }

    /// Filter up to [MAX_CHUNK_SIZE] samples starting at `offset` into
    /// the input and parameter streams. The returned slices' length is
    /// the count produced.
    pub fn process(
        &mut self,
        rate: SampleRate,
        input: &[D::Sample],
        cutoff: &[D::Note],
        resonance: &[D::Scalar],
        offset: usize,
    ) -> FilterChunk<'_, D> {
        let count = chunk::span(offset, &[input.len(), cutoff.len(), resonance.len()]);
        for i in 0..count {
            let j = offset + i;
            let frame = D::filter_step(
                rate,
                input[j],
                cutoff[j],
                resonance[j],
                &mut self.low_z,
                &mut self.band_z,
            );
            self.low[i] = frame.low;
            self.band[i] = frame.band;
            self.high[i] = frame.high;
        }
        FilterChunk {
            low: &self.low[..count],
            band: &self.band[..count],
            high: &self.high[..count],
        }
    }
}

impl<D: Domain> Default for SVFilter<D> {
    fn default() -> Self {
        Self::new()
    }
}
