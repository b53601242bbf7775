#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chunk::{self, MAX_CHUNK_SIZE};
use crate::domain::{Base, Domain};
use crate::rate::SampleRate;

/*
ADSR Envelope Generator
=======================

A gate-driven amplitude contour: the workhorse that turns a raw
oscillator tone into a note with a beginning, middle, and end.

Vocabulary
----------

  level       The envelope's current output, 0 to full scale. Carried
              in a widened accumulator per domain so even an 8-second
              ramp moves every sample.

  gate        The "key held down" stream. Any sample at or above the
              domain's threshold reads as high. Edges drive the state
              machine; the level itself never jumps on an edge.

  stage       Idle, Attack, Decay, Sustain, or Release.

  increment   Per-sample level change for the active ramp:

                  increment = span / (duration * sample_rate)

              recomputed from the parameter streams every sample, so a
              duration that changes mid-stage takes effect immediately.

The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Ramps are straight lines in both domains - the same span-over-samples
arithmetic in f32 and in fixed point, so the two engines trace the same
contour to within quantization.

The State Machine
-----------------

    Idle ──rising gate──→ Attack ──hits full──→ Decay ──hits S──→ Sustain
      ↑                      │                     │                 │
      │                      └──────falling gate───┴─────────────────┘
      │                                            ↓
      └──────────────level reaches 0────────── Release

Two rules matter more than the happy path:

  * A rising edge in ANY stage restarts Attack from the CURRENT level.
    A retriggered note mid-release climbs from where it is - no reset
    to zero, no click.

  * A falling edge in any active stage starts Release from the current
    level. Release remembers that starting level so its slope stays
    fixed: span-at-entry over the release duration.

Zero-length durations clamp to a single-sample ramp rather than being
rejected; a synth must keep producing samples no matter what the
automation lanes hand it.
*/

/// Per-domain ramp arithmetic.
pub trait EnvKernel: Base {
    /// Per-sample level change that crosses `span` in `duration`
    /// seconds at `rate`. Implementations clamp degenerate durations to
    /// a single sample rather than erroring.
    fn ramp_increment(rate: SampleRate, span: Self::Level, duration: Self::EnvTime)
        -> Self::Level;
}

/// The current stage of the envelope state machine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// The four ADSR parameter streams, one value per sample, matching the
/// gate stream's indexing.
#[derive(Clone, Copy)]
pub struct EnvParams<'a, D: Base> {
    /// Seconds from zero to full scale.
    pub attack: &'a [D::EnvTime],
    /// Seconds from full scale down to the sustain level.
    pub decay: &'a [D::EnvTime],
    /// Level held while the gate stays high. A level, not a duration.
    pub sustain: &'a [D::Scalar],
    /// Seconds from the release point down to zero.
    pub release: &'a [D::EnvTime],
}

/// A gate-driven ADSR envelope generator.
///
/// One Scalar-typed output stream through the chunked protocol. State
/// is the stage, the current level, and the latched gate, so chunk
/// boundaries are invisible in the contour.
pub struct Envelope<D: Domain> {
    stage: EnvelopeStage,
    level: D::Level,
    gate_high: bool,
    // level when Release began; fixes the release slope
    released_from: D::Level,
    out: [D::Scalar; MAX_CHUNK_SIZE],
}

impl<D: Domain> Envelope<D> {
    pub fn new() -> Self {
        Self {
            stage: EnvelopeStage::Idle,
            level: <D::Level>::default(),
            gate_high: false,
            released_from: <D::Level>::default(),
            out: [<D::Scalar>::default(); MAX_CHUNK_SIZE],
        }
    }

    /// The stage the machine will be in for the next sample.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// True while the envelope is contributing signal. Callers use this
    /// to know when a voice can be retired.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// The current output level.
    pub fn level(&self) -> D::Scalar {
        D::scalar_of(self.level)
    }

    /// Return to Idle at zero level, gate unlatched.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = <D::Level>::default();
        self.gate_high = false;
        self.released_from = <D::Level>::default();
    }

    fn step(
        &mut self,
        rate: SampleRate,
        gate: D::Sample,
        attack: D::EnvTime,
        decay: D::EnvTime,
        sustain: D::Scalar,
        release: D::EnvTime,
    ) -> D::Scalar {
        let gate_high = gate >= D::GATE_ON;
        if gate_high && !self.gate_high {
            // Retrigger from the current level, whatever the stage.
            self.stage = EnvelopeStage::Attack;
        } else if !gate_high && self.gate_high && self.stage != EnvelopeStage::Idle {
            self.released_from = self.level;
            self.stage = EnvelopeStage::Release;
        }
        self.gate_high = gate_high;

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = <D::Level>::default();
            }
            EnvelopeStage::Attack => {
                let inc = D::ramp_increment(rate, D::LEVEL_FULL, attack);
                let remaining = D::LEVEL_FULL - self.level;
                if inc >= remaining {
                    self.level = D::LEVEL_FULL;
                    self.stage = EnvelopeStage::Decay;
                } else {
                    self.level = self.level + inc;
                }
            }
            EnvelopeStage::Decay => {
                let target = D::level_of(sustain);
                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeStage::Sustain;
                } else {
                    let dec = D::ramp_increment(rate, D::LEVEL_FULL - target, decay);
                    if dec >= self.level - target {
                        self.level = target;
                        self.stage = EnvelopeStage::Sustain;
                    } else {
                        self.level = self.level - dec;
                    }
                }
            }
            EnvelopeStage::Sustain => {
                // Track the parameter stream while the gate holds.
                self.level = D::level_of(sustain);
            }
            EnvelopeStage::Release => {
                let dec = D::ramp_increment(rate, self.released_from, release);
                if dec >= self.level {
                    self.level = <D::Level>::default();
                    self.stage = EnvelopeStage::Idle;
                } else {
                    self.level = self.level - dec;
                }
            }
        }
        D::scalar_of(self.level)
    }

    /// Produce up to [MAX_CHUNK_SIZE] samples of the contour starting
    /// at `offset` into the gate and parameter streams. The returned
    /// slice's length is the count produced.
    pub fn process(
        &mut self,
        rate: SampleRate,
        gate: &[D::Sample],
        params: EnvParams<'_, D>,
        offset: usize,
    ) -> &[D::Scalar] {
        let count = chunk::span(
            offset,
            &[
                gate.len(),
                params.attack.len(),
                params.decay.len(),
                params.sustain.len(),
                params.release.len(),
            ],
        );
        for i in 0..count {
            let j = offset + i;
            let level = self.step(
                rate,
                gate[j],
                params.attack[j],
                params.decay[j],
                params.sustain[j],
                params.release[j],
            );
            self.out[i] = level;
        }
        &self.out[..count]
    }
}

impl<D: Domain> Default for Envelope<D> {
    fn default() -> Self {
        Self::new()
    }
}
