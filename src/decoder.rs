//! Per-protocol decoding of captured pulse trains.
//!
//! A capture is an ordered list of durations in microseconds, one per signal
//! level change. Before matching, the trailing sync entry is moved to index 0
//! of a fixed timing buffer; the sync duration divided by the protocol's
//! sync proportions yields the base pulse length, against which every data
//! pulse is checked within a percentage tolerance.

use log::trace;

use crate::protocols::{HighLow, Protocol};

/// Maximum number of high/low level changes per captured packet: 32 bits at
/// two changes per bit, plus two for the sync marker.
pub const MAX_CHANGES: usize = 67;

/// A successfully decoded transmission, latched until the next success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceivedResult {
    /// Decoded code, most significant bit first
    pub value: u32,
    /// Number of data bits in the transmission
    pub bit_length: usize,
    /// 1-based id of the protocol that matched
    pub protocol: usize,
    /// Base pulse length in microseconds inferred from the sync pulse
    pub delay: u32,
    /// Captured durations with the sync entry at index 0, followed by the
    /// data pulses in wire order
    pub raw_timings: [u32; MAX_CHANGES],
}

impl Default for ReceivedResult {
    fn default() -> Self {
        ReceivedResult {
            value: 0,
            bit_length: 0,
            protocol: 0,
            delay: 0,
            raw_timings: [0; MAX_CHANGES],
        }
    }
}

/// Value, bit count and inferred base pulse length recovered by one
/// per-protocol attempt.
pub(crate) struct DecodedFrame {
    pub value: u32,
    pub bit_length: usize,
    pub delay: u32,
}

/// True when `observed` lies within `tolerance` percent of `expected`,
/// boundary included.
fn within_tolerance(observed: u32, expected: u32, tolerance: u32) -> bool {
    let diff = if observed > expected {
        observed - expected
    } else {
        expected - observed
    };
    u64::from(diff) * 100 <= u64::from(expected) * u64::from(tolerance)
}

fn matches_symbol(high: u32, low: u32, symbol: &HighLow, delay: u32, tolerance: u32) -> bool {
    within_tolerance(high, delay * u32::from(symbol.high), tolerance)
        && within_tolerance(low, delay * u32::from(symbol.low), tolerance)
}

/// Tries to decode `change_count` captured level changes as one transmission
/// of `protocol`. `timings[0]` must hold the sync entry.
///
/// Returns `None` when any pulse pair falls outside tolerance for both the
/// zero and the one waveform, or when the capture is too short to be a real
/// transmission.
pub(crate) fn receive_protocol(
    protocol: &Protocol,
    timings: &[u32; MAX_CHANGES],
    change_count: usize,
    tolerance: u32,
) -> Option<DecodedFrame> {
    // The longer sync proportion is the one captured in timings[0]; dividing
    // by it gives the best resolution for the base pulse length.
    let sync_units = u32::from(protocol.sync_factor.high.max(protocol.sync_factor.low));
    let delay = timings[0] / sync_units;

    // Inverted protocols start low, so their first recorded duration is the
    // tail of the sync marker and the data begins one entry later.
    let first_data = if protocol.inverted_signal { 2 } else { 1 };

    let mut code: u32 = 0;
    let mut i = first_data;
    while i + 1 < change_count {
        code <<= 1;
        if matches_symbol(timings[i], timings[i + 1], &protocol.zero, delay, tolerance) {
            // zero bit, nothing to set
        } else if matches_symbol(timings[i], timings[i + 1], &protocol.one, delay, tolerance) {
            code |= 1;
        } else {
            trace!(
                "pulse pair ({}, {}) at offset {} matches neither symbol at delay {}",
                timings[i],
                timings[i + 1],
                i,
                delay
            );
            return None;
        }
        i += 2;
    }

    // Very short transmissions are noise: no known device sends fewer than
    // four bits of payload.
    if change_count <= 7 {
        return None;
    }

    Some(DecodedFrame {
        value: code,
        bit_length: (change_count - 1) / 2,
        delay,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocols::protocol_at;

    fn timings_from(pulses: &[u32]) -> [u32; MAX_CHANGES] {
        let mut timings = [0u32; MAX_CHANGES];
        let n = pulses.len();
        timings[0] = pulses[n - 1];
        timings[1..n].copy_from_slice(&pulses[..n - 1]);
        timings
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        assert!(within_tolerance(420, 350, 20)); // exactly +20%
        assert!(within_tolerance(280, 350, 20)); // exactly -20%
        assert!(!within_tolerance(421, 350, 20));
        assert!(!within_tolerance(279, 350, 20));
        assert!(within_tolerance(350, 350, 0));
        assert!(!within_tolerance(351, 350, 0));
    }

    #[test]
    fn decodes_nominal_four_bit_frame() {
        // 0b1010 under protocol 1: one, zero, one, zero, then sync
        let pulses = [
            1050, 350, 350, 1050, 1050, 350, 350, 1050, 350, 10850,
        ];
        let frame = receive_protocol(&protocol_at(1).unwrap(), &timings_from(&pulses), 10, 20)
            .expect("frame should decode");
        assert_eq!(frame.value, 0b1010);
        assert_eq!(frame.bit_length, 4);
        assert_eq!(frame.delay, 350);
    }

    #[test]
    fn rejects_frames_of_seven_or_fewer_changes() {
        // Three valid-looking bits plus sync is eight changes and passes;
        // two bits plus sync is six and must not.
        let short = [1050, 350, 1050, 350, 350, 10850];
        assert!(receive_protocol(
            &protocol_at(1).unwrap(),
            &timings_from(&short),
            short.len(),
            20
        )
        .is_none());
    }

    #[test]
    fn rejects_pair_outside_both_symbols() {
        let pulses = [
            1050, 350, 700, 700, 1050, 350, 350, 1050, 350, 10850,
        ];
        assert!(receive_protocol(
            &protocol_at(1).unwrap(),
            &timings_from(&pulses),
            pulses.len(),
            20
        )
        .is_none());
    }
}
