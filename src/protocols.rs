//! Registry of the known bit-encoding protocols.
//!
//! A protocol describes how one bit (and the sync marker) maps onto a pair of
//! high/low signal durations, expressed in units of a base pulse length:
//!
//! ```text
//! sync {1, 31}: 1 unit high, 31 units low
//!  _
//! | |_______________________________
//!
//! "0" bit {1, 3}:        "1" bit {3, 1}:
//!  _                      ___
//! | |___                 |   |_
//! ```
//!
//! Protocols are identified by a 1-based ordinal; protocol 1 (PT2260-class,
//! the common outlet remotes) is the default.

use crate::{Result, SwitchError};

/// One symbol on the wire: `high` units of base pulse length at high level,
/// then `low` units at low level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighLow {
    /// Units spent at high signal level
    pub high: u8,
    /// Units spent at low signal level
    pub low: u8,
}

/// A fixed timing scheme used to encode or decode one bit-stream format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Protocol {
    /// Base pulse length in microseconds, e.g. 350
    pub pulse_length: u32,
    /// Sync marker sent after the data bits of every transmission
    pub sync_factor: HighLow,
    /// Waveform for a "0" data bit
    pub zero: HighLow,
    /// Waveform for a "1" data bit
    pub one: HighLow,
    /// If true, transmissions start with a low signal level instead of a
    /// high one: every [`HighLow`] is emitted and interpreted as `high`
    /// units low followed by `low` units high. Chips like the HT6P20B do
    /// this, while the PT2260 and most others start high.
    pub inverted_signal: bool,
}

const fn hl(high: u8, low: u8) -> HighLow {
    HighLow { high, low }
}

const fn proto(
    pulse_length: u32,
    sync_factor: HighLow,
    zero: HighLow,
    one: HighLow,
    inverted_signal: bool,
) -> Protocol {
    Protocol {
        pulse_length,
        sync_factor,
        zero,
        one,
        inverted_signal,
    }
}

pub(crate) static PROTOCOLS: [Protocol; 12] = [
    proto(350, hl(1, 31), hl(1, 3), hl(3, 1), false), // protocol 1
    proto(650, hl(1, 10), hl(1, 2), hl(2, 1), false), // protocol 2
    proto(100, hl(30, 71), hl(4, 11), hl(9, 6), false), // protocol 3
    proto(380, hl(1, 6), hl(1, 3), hl(3, 1), false),  // protocol 4
    proto(500, hl(6, 14), hl(1, 2), hl(2, 1), false), // protocol 5
    proto(450, hl(23, 1), hl(1, 2), hl(2, 1), true),  // protocol 6 (HT6P20B)
    proto(150, hl(2, 62), hl(1, 6), hl(6, 1), false), // protocol 7 (HS2303-PT)
    proto(200, hl(3, 130), hl(7, 16), hl(3, 16), false), // protocol 8 (Conrad RS-200 RX)
    proto(200, hl(130, 7), hl(16, 7), hl(16, 3), true), // protocol 9 (Conrad RS-200 TX)
    proto(365, hl(18, 1), hl(3, 1), hl(1, 3), true),  // protocol 10 (1ByOne doorbell)
    proto(270, hl(36, 1), hl(1, 2), hl(2, 1), true),  // protocol 11 (HT12E)
    proto(320, hl(36, 1), hl(1, 2), hl(2, 1), true),  // protocol 12 (SM5212)
];

/// Number of protocols in the registry.
pub fn protocol_count() -> usize {
    PROTOCOLS.len()
}

/// Looks up a protocol by its 1-based id.
pub fn protocol_at(id: usize) -> Result<Protocol> {
    if id < 1 || id > PROTOCOLS.len() {
        return Err(SwitchError::InvalidProtocol(id));
    }
    Ok(PROTOCOLS[id - 1])
}
