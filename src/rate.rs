//! Supported sample rates and rate negotiation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/*
Why only two rates?
-------------------

The fixed-point engines convert durations and pitches into per-sample
increments using precomputed constant tables, one set per rate. Supporting
an arbitrary rate would mean computing those tables at runtime with the
very division/exponential operations the fixed-point design exists to
avoid. 44.1 kHz (CD lineage) and 48 kHz (pro audio/video lineage) cover
the hosts this engine targets, so both engine families accept exactly
these two.

The rate is passed into every process call rather than stored in the
generator, so one instance can serve whichever clock the caller is
currently driving - state carries over, coefficients do not.
*/

/// A sample rate both engine families support.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRate {
    /// 44 100 Hz
    #[default]
    Hz44100,
    /// 48 000 Hz
    Hz48000,
}

impl SampleRate {
    /// Every rate the engines support, for capability discovery.
    pub const ALL: [SampleRate; 2] = [SampleRate::Hz44100, SampleRate::Hz48000];

    /// The rate in Hertz.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz44100 => 44_100,
            Self::Hz48000 => 48_000,
        }
    }

    pub(crate) fn hz_f32(self) -> f32 {
        self.hz() as f32
    }
}

/// Returned when a caller asks for a rate outside [SampleRate::ALL].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported sample rate: {0} Hz (supported: 44100, 48000)")]
pub struct UnsupportedRate(pub u32);

impl TryFrom<u32> for SampleRate {
    type Error = UnsupportedRate;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            44_100 => Ok(Self::Hz44100),
            48_000 => Ok(Self::Hz48000),
            other => {
                log::debug!("rejecting sample rate {other} Hz");
                Err(UnsupportedRate(other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_rates_round_trip() {
        for rate in SampleRate::ALL {
            assert_eq!(SampleRate::try_from(rate.hz()), Ok(rate));
        }
    }

    #[test]
    fn unsupported_rate_is_rejected() {
        assert_eq!(SampleRate::try_from(96_000), Err(UnsupportedRate(96_000)));
        assert_eq!(SampleRate::try_from(0), Err(UnsupportedRate(0)));
    }

    #[test]
    fn default_rate_is_cd_rate() {
        assert_eq!(SampleRate::default().hz(), 44_100);
    }
}
