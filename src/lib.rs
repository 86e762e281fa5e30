//! Encoder/decoder for the fixed-code signaling of cheap 433 MHz RF remote
//! switches (PT2260, EV1527, HT6P20B and similar encoder chips).
//!
//! Encoding turns a code word into a train of pulse durations in
//! microseconds, ready to be keyed onto an OOK transmitter. Decoding walks a
//! captured train through the registry of known protocols, infers the base
//! pulse length from the sync marker and reconstructs the transmitted value
//! bit by bit within a configurable timing tolerance. The most recent
//! successful decode stays latched until the next one.
//!
//! Driving a radio, capturing edges and anything else that touches hardware
//! is left to the caller; this crate only deals in pulse durations.
//!
//! # Example
//! ```
//! use rcswitch433::RcSwitch;
//!
//! fn main() -> rcswitch433::Result<()> {
//!     let mut switch = RcSwitch::new();
//!     switch.set_repeat_transmit(1);
//!
//!     // Encode a 24 bit code under the default protocol
//!     let pulses = switch.send(5393, 24)?;
//!
//!     // Feed the pulse train back through the decoder
//!     assert!(switch.decode_pulse_train(&pulses)?);
//!     assert_eq!(switch.get_received_value(), 5393);
//!     assert_eq!(switch.get_received_bitlength(), 24);
//!     assert_eq!(switch.get_received_protocol(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

use log::{debug, trace};

/// Result type used by the library
pub type Result<T> = std::result::Result<T, SwitchError>;

mod code_word;
mod decoder;
mod error;
mod protocols;

pub use code_word::{
    code_word_a, code_word_b, code_word_c, code_word_d, expand_binary, expand_tri_state,
};
pub use decoder::{ReceivedResult, MAX_CHANGES};
pub use error::SwitchError;
pub use protocols::{protocol_at, protocol_count, HighLow, Protocol};

use decoder::receive_protocol;
use protocols::PROTOCOLS;

/// Transmissions are repeated this many times unless
/// [`RcSwitch::set_repeat_transmit`] says otherwise.
pub const DEFAULT_REPEAT_TRANSMIT: usize = 10;

/// Default receive tolerance in percent.
pub const DEFAULT_RECEIVE_TOLERANCE: u32 = 20;

const MAX_BIT_LENGTH: usize = 32;

/// Encoder/decoder instance: holds the transmit configuration and latches
/// the most recently decoded transmission.
pub struct RcSwitch {
    protocol: Protocol,
    repeat_transmit: usize,
    receive_tolerance: u32,
    received: ReceivedResult,
    available: bool,
}

impl RcSwitch {
    /// Creates an instance with protocol 1, the default repeat count and the
    /// default receive tolerance.
    pub fn new() -> Self {
        RcSwitch {
            protocol: PROTOCOLS[0],
            repeat_transmit: DEFAULT_REPEAT_TRANSMIT,
            receive_tolerance: DEFAULT_RECEIVE_TOLERANCE,
            received: ReceivedResult::default(),
            available: false,
        }
    }

    /// Selects the protocol to send with, by 1-based id.
    pub fn set_protocol(&mut self, id: usize) -> Result<()> {
        self.protocol = protocol_at(id)?;
        Ok(())
    }

    /// Selects a protocol by id and overrides its base pulse length, keeping
    /// its bit-encoding shape.
    pub fn set_protocol_with_pulse_length(&mut self, id: usize, pulse_length: u32) -> Result<()> {
        self.set_protocol(id)?;
        self.set_pulse_length(pulse_length);
        Ok(())
    }

    /// Installs a fully specified protocol, e.g. for a device the registry
    /// does not know.
    pub fn set_custom_protocol(&mut self, protocol: Protocol) {
        self.protocol = protocol;
    }

    /// Overrides the base pulse length of the current protocol, in
    /// microseconds.
    pub fn set_pulse_length(&mut self, pulse_length: u32) {
        self.protocol.pulse_length = pulse_length;
    }

    /// Sets how many times each transmission is repeated back-to-back.
    pub fn set_repeat_transmit(&mut self, repeats: usize) {
        self.repeat_transmit = repeats.max(1);
    }

    /// Sets the receive tolerance in percent of the expected pulse duration,
    /// clamped to 0..=99.
    pub fn set_receive_tolerance(&mut self, percent: u32) {
        self.receive_tolerance = percent.min(99);
    }

    /// Encodes the lowest `length` bits of `code` under the current
    /// protocol, most significant bit first. Bits above `length` are
    /// ignored.
    pub fn send(&self, code: u32, length: usize) -> Result<Vec<u32>> {
        if length < 1 || length > MAX_BIT_LENGTH {
            return Err(SwitchError::InvalidCodeWord(format!(
                "code length {} is outside 1..={} bits",
                length, MAX_BIT_LENGTH
            )));
        }
        Ok(self.transmit(code, length))
    }

    /// Encodes a binary code word over `{'0','1'}`.
    pub fn send_binary(&self, code_word: &str) -> Result<Vec<u32>> {
        let (code, length) = expand_binary(code_word)?;
        self.send(code, length)
    }

    /// Encodes a tri-state code word over `{'0','1','F'}`. Each symbol
    /// expands to two raw bits, so a word may hold at most 16 symbols.
    pub fn send_tri_state(&self, code_word: &str) -> Result<Vec<u32>> {
        let (code, length) = expand_tri_state(code_word)?;
        self.send(code, length)
    }

    fn transmit(&self, code: u32, length: usize) -> Vec<u32> {
        let protocol = &self.protocol;
        let pulse = |units: u8| protocol.pulse_length * u32::from(units);
        let mut pulses = Vec::with_capacity(self.repeat_transmit * (length * 2 + 2));
        for _ in 0..self.repeat_transmit {
            for bit in (0..length).rev() {
                let symbol = if code & (1 << bit) != 0 {
                    &protocol.one
                } else {
                    &protocol.zero
                };
                pulses.push(pulse(symbol.high));
                pulses.push(pulse(symbol.low));
            }
            pulses.push(pulse(protocol.sync_factor.high));
            pulses.push(pulse(protocol.sync_factor.low));
            if protocol.inverted_signal {
                // The signal starts at the low level, so the tail of the
                // sync marker is what a receiver captures first.
                if let Some(footer) = pulses.pop() {
                    pulses.insert(0, footer);
                }
            }
        }
        pulses
    }

    /// Tries to decode a captured pulse train, each entry the duration in
    /// microseconds of one signal level. The last entry must be the sync
    /// pulse that terminates the transmission.
    ///
    /// Protocols are tried in registry order; the first one whose timing
    /// expectations match wins and its result is latched. `Ok(false)` means
    /// no protocol matched and the latched result is untouched.
    pub fn decode_pulse_train(&mut self, pulses: &[u32]) -> Result<bool> {
        let change_count = pulses.len();
        if change_count >= MAX_CHANGES {
            return Err(SwitchError::CaptureOverflow {
                received: change_count,
                limit: MAX_CHANGES,
            });
        }
        if change_count == 0 {
            return Ok(false);
        }

        // The sync entry is captured last; the decoder keeps it at index 0.
        let mut timings = [0u32; MAX_CHANGES];
        timings[0] = pulses[change_count - 1];
        timings[1..change_count].copy_from_slice(&pulses[..change_count - 1]);

        for (index, protocol) in PROTOCOLS.iter().enumerate() {
            let id = index + 1;
            if let Some(frame) =
                receive_protocol(protocol, &timings, change_count, self.receive_tolerance)
            {
                debug!(
                    "decoded value {} ({} bits) with protocol {}, base pulse {} us",
                    frame.value, frame.bit_length, id, frame.delay
                );
                self.received = ReceivedResult {
                    value: frame.value,
                    bit_length: frame.bit_length,
                    protocol: id,
                    delay: frame.delay,
                    raw_timings: timings,
                };
                self.available = true;
                return Ok(true);
            }
            trace!("protocol {} did not match", id);
        }
        Ok(false)
    }

    /// True when a decoded transmission is latched and not yet consumed.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Marks the latched transmission as consumed. The stored result stays
    /// readable through the accessors until the next successful decode.
    pub fn reset_available(&mut self) {
        self.available = false;
    }

    /// The most recently latched result. Callers are expected to check
    /// [`available`](RcSwitch::available) first; none of the accessors do.
    pub fn received(&self) -> &ReceivedResult {
        &self.received
    }

    /// Decoded value of the latched transmission.
    pub fn get_received_value(&self) -> u32 {
        self.received.value
    }

    /// Bit length of the latched transmission.
    pub fn get_received_bitlength(&self) -> usize {
        self.received.bit_length
    }

    /// Base pulse length in microseconds inferred for the latched
    /// transmission.
    pub fn get_received_delay(&self) -> u32 {
        self.received.delay
    }

    /// 1-based id of the protocol that decoded the latched transmission.
    pub fn get_received_protocol(&self) -> usize {
        self.received.protocol
    }

    /// Captured timings of the latched transmission, sync entry at index 0.
    pub fn get_received_rawdata(&self) -> &[u32; MAX_CHANGES] {
        &self.received.raw_timings
    }

    /// Captured timings restored to wire order, sync entry back at the end.
    /// Empty when nothing is latched.
    pub fn get_received_rawdata_list(&self) -> Vec<u32> {
        if !self.available {
            return Vec::new();
        }
        let changes = (self.received.bit_length + 1) * 2;
        let mut pulses: Vec<u32> = self.received.raw_timings[1..changes].to_vec();
        pulses.push(self.received.raw_timings[0]);
        pulses
    }
}

impl Default for RcSwitch {
    fn default() -> Self {
        RcSwitch::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn single_shot() -> RcSwitch {
        let mut switch = RcSwitch::new();
        switch.set_repeat_transmit(1);
        switch
    }

    #[test]
    fn encode_protocol_1_waveform() {
        let pulses = single_shot().send(0b0001, 4).unwrap();
        assert_eq!(
            pulses,
            vec![350, 1050, 350, 1050, 350, 1050, 1050, 350, 350, 10850]
        );
    }

    #[test]
    fn encode_inverted_waveform_rotates_sync_tail_to_front() {
        let mut switch = single_shot();
        switch.set_protocol(6).unwrap();
        // One "1" bit {2,1} at 450 us, then sync {23,1}; the trailing low
        // moves to the front because the signal starts low.
        assert_eq!(switch.send(0b1, 1).unwrap(), vec![450, 900, 450, 10350]);
    }

    #[test]
    fn encode_repeats_back_to_back() {
        let mut switch = RcSwitch::new();
        switch.set_repeat_transmit(3);
        let pulses = switch.send(0b1010, 4).unwrap();
        assert_eq!(pulses.len(), 3 * (4 * 2 + 2));
        let single = single_shot().send(0b1010, 4).unwrap();
        assert_eq!(&pulses[..10], &single[..]);
        assert_eq!(&pulses[10..20], &single[..]);
        assert_eq!(&pulses[20..], &single[..]);
    }

    #[test]
    fn encode_is_idempotent() {
        let switch = single_shot();
        assert_eq!(
            switch.send_tri_state("00000FFF0F0F").unwrap(),
            switch.send_tri_state("00000FFF0F0F").unwrap()
        );
    }

    #[test]
    fn tri_state_word_equals_expanded_binary_code() {
        let switch = single_shot();
        assert_eq!(
            switch.send_tri_state("F0F1").unwrap(),
            switch.send(0b01000111, 8).unwrap()
        );
    }

    #[test]
    fn encode_rejects_bad_input() {
        let switch = single_shot();
        assert!(matches!(
            switch.send(1, 0),
            Err(SwitchError::InvalidCodeWord(_))
        ));
        assert!(matches!(
            switch.send(1, 33),
            Err(SwitchError::InvalidCodeWord(_))
        ));
        assert!(matches!(
            switch.send_tri_state(""),
            Err(SwitchError::InvalidCodeWord(_))
        ));
        // 17 tri-state symbols would need 34 bits
        assert!(matches!(
            switch.send_tri_state("00000000000000000"),
            Err(SwitchError::InvalidCodeWord(_))
        ));
        assert!(matches!(
            switch.send_binary("0101x"),
            Err(SwitchError::InvalidCodeWord(_))
        ));
    }

    #[test]
    fn set_protocol_rejects_unknown_ids() {
        let mut switch = RcSwitch::new();
        assert_eq!(switch.set_protocol(0), Err(SwitchError::InvalidProtocol(0)));
        assert_eq!(
            switch.set_protocol(13),
            Err(SwitchError::InvalidProtocol(13))
        );
    }

    #[test]
    fn pulse_length_override_keeps_waveform_shape() {
        let mut switch = single_shot();
        switch.set_protocol_with_pulse_length(1, 320).unwrap();
        let pulses = switch.send(0b1, 1).unwrap();
        assert_eq!(pulses, vec![960, 320, 320, 9920]);
    }

    #[test]
    fn round_trip_distinct_protocols() {
        // Protocols whose timing bands do not overlap each other's decode
        // attempts; each train must come back under its own id.
        let value = 0b1010_1100_0011;
        for &id in &[1usize, 2, 3, 4, 5, 6, 7, 8, 10, 11] {
            let mut switch = single_shot();
            switch.set_protocol(id).unwrap();
            let pulses = switch.send(value, 12).unwrap();
            assert!(
                switch.decode_pulse_train(&pulses).unwrap(),
                "protocol {} did not round-trip",
                id
            );
            assert_eq!(switch.get_received_value(), value, "protocol {}", id);
            assert_eq!(switch.get_received_bitlength(), 12, "protocol {}", id);
            assert_eq!(switch.get_received_protocol(), id, "protocol {}", id);
            assert_eq!(
                switch.get_received_delay(),
                protocol_at(id).unwrap().pulse_length,
                "protocol {}",
                id
            );
        }
    }

    #[test]
    fn overlapping_timings_resolve_to_first_matching_protocol() {
        // Protocols 11 and 12 differ only in nominal pulse length, which the
        // decoder infers from the sync marker, so a protocol 12 train is
        // claimed by protocol 11.
        let value = 0b1010_1100_0011;
        let mut switch = single_shot();
        switch.set_protocol(12).unwrap();
        let pulses = switch.send(value, 12).unwrap();
        assert!(switch.decode_pulse_train(&pulses).unwrap());
        assert_eq!(switch.get_received_protocol(), 11);
        assert_eq!(switch.get_received_value(), value);
        assert_eq!(switch.get_received_delay(), 320);

        // A protocol 9 train aligns with protocol 8's expectations one pulse
        // pair early: the leading pair reads as a zero bit and the value
        // comes back shifted right by one.
        let mut switch = single_shot();
        switch.set_protocol(9).unwrap();
        let pulses = switch.send(value, 12).unwrap();
        assert!(switch.decode_pulse_train(&pulses).unwrap());
        assert_eq!(switch.get_received_protocol(), 8);
        assert_eq!(switch.get_received_value(), value >> 1);
        assert_eq!(switch.get_received_bitlength(), 12);
    }

    #[test]
    fn tolerance_boundary() {
        let value = 0b1011_0010;
        let nominal = single_shot().send(value, 8).unwrap();
        let data = nominal.len() - 2;

        // Data pulses at exactly 120% of nominal still decode...
        let mut stretched = nominal.clone();
        for pulse in &mut stretched[..data] {
            *pulse = *pulse * 120 / 100;
        }
        let mut switch = RcSwitch::new();
        assert!(switch.decode_pulse_train(&stretched).unwrap());
        assert_eq!(switch.get_received_value(), value);
        assert_eq!(switch.get_received_protocol(), 1);

        // ...and at 121% no protocol accepts the train.
        let mut too_far = nominal;
        for pulse in &mut too_far[..data] {
            *pulse = *pulse * 121 / 100;
        }
        let mut switch = RcSwitch::new();
        assert!(!switch.decode_pulse_train(&too_far).unwrap());
        assert!(!switch.available());
    }

    #[test]
    fn short_trains_are_rejected_as_noise() {
        let mut switch = single_shot();
        let two_bits = switch.send(0b11, 2).unwrap();
        assert_eq!(two_bits.len(), 6);
        assert!(!switch.decode_pulse_train(&two_bits).unwrap());

        let three_bits = switch.send(0b101, 3).unwrap();
        assert_eq!(three_bits.len(), 8);
        assert!(switch.decode_pulse_train(&three_bits).unwrap());
        assert_eq!(switch.get_received_value(), 0b101);
        assert_eq!(switch.get_received_bitlength(), 3);
    }

    #[test]
    fn overlong_captures_are_rejected() {
        let mut switch = RcSwitch::new();
        assert_eq!(
            switch.decode_pulse_train(&[100; MAX_CHANGES]),
            Err(SwitchError::CaptureOverflow {
                received: MAX_CHANGES,
                limit: MAX_CHANGES
            })
        );
        assert!(!switch.decode_pulse_train(&[]).unwrap());
    }

    #[test]
    fn latch_semantics() {
        let mut switch = single_shot();
        let pulses = switch.send(5393, 24).unwrap();
        assert!(switch.decode_pulse_train(&pulses).unwrap());
        assert!(switch.available());

        switch.reset_available();
        assert!(!switch.available());
        // Stale reads stay possible after reset
        assert_eq!(switch.get_received_value(), 5393);
        assert_eq!(switch.get_received_bitlength(), 24);

        // A failed decode leaves the latched result untouched
        assert!(!switch.decode_pulse_train(&[100; 10]).unwrap());
        assert!(!switch.available());
        assert_eq!(switch.get_received_value(), 5393);
    }

    #[test]
    fn all_zero_code_still_latches() {
        let mut switch = single_shot();
        let pulses = switch.send(0, 8).unwrap();
        assert!(switch.decode_pulse_train(&pulses).unwrap());
        assert!(switch.available());
        assert_eq!(switch.get_received_value(), 0);
        assert_eq!(switch.get_received_bitlength(), 8);
    }

    #[test]
    fn dip_switch_scenario_round_trips_footer_included() {
        let mut switch = single_shot();
        let word = code_word_a("11111", "00010", true).unwrap();
        assert_eq!(word, "00000FFF0F0F");
        let pulses = switch.send_tri_state(&word).unwrap();
        assert_eq!(pulses.len(), 50);

        assert!(switch.decode_pulse_train(&pulses).unwrap());
        assert_eq!(switch.get_received_value(), 5393);
        assert_eq!(switch.get_received_bitlength(), 24);
        assert_eq!(switch.get_received_protocol(), 1);
        assert_eq!(switch.get_received_delay(), 350);

        let timings = switch.get_received_rawdata();
        for index in 1..pulses.len() {
            assert_eq!(timings[index], pulses[index - 1], "entry {}", index);
        }
        assert_eq!(timings[0], *pulses.last().unwrap(), "footer pulse");
        assert_eq!(switch.get_received_rawdata_list(), pulses);
    }
}
