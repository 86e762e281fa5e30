//! Encodes a switch-on command for a dual-DIP-switch outlet, prints the raw
//! pulse train, feeds it back through the decoder and verifies that the
//! recovered timings match the transmitted ones, footer pulse included.

use rcswitch433::{code_word_a, RcSwitch, Result};

fn main() -> Result<()> {
    let mut switch = RcSwitch::new();
    switch.set_repeat_transmit(1);

    // Optional: pick another protocol or pulse speed
    // switch.set_protocol(2)?;
    // switch.set_pulse_length(320);

    // DIP banks ON-ON-ON-ON-ON and OFF-OFF-OFF-ON-OFF
    println!("Encoding: switch on, group \"11111\", device \"00010\"");
    let word = code_word_a("11111", "00010", true)?;
    let pulses = switch.send_tri_state(&word)?;

    // Other ways to produce the same train:
    // let pulses = switch.send(5393, 24)?;
    // let pulses = switch.send_binary("000000000001010100010001")?;
    // let pulses = switch.send_tri_state("00000FFF0F0F")?;

    let formatted: Vec<String> = pulses.iter().map(|p| p.to_string()).collect();
    println!("raw_pulses[{}]={{{}}}", pulses.len(), formatted.join(","));

    if !switch.decode_pulse_train(&pulses)? {
        eprintln!("ERROR: unable to decode.");
        std::process::exit(1);
    }

    println!(
        "OK: decoded value: {} ({} bits) Protocol: {} Delay: {}",
        switch.get_received_value(),
        switch.get_received_bitlength(),
        switch.get_received_protocol(),
        switch.get_received_delay()
    );

    let decoded = switch.get_received_rawdata_list();
    let formatted: Vec<String> = decoded.iter().map(|p| p.to_string()).collect();
    println!("dec_pulses[{}]={{{}}}", decoded.len(), formatted.join(","));

    if decoded != pulses {
        eprintln!("ERROR: pulse lists mismatch.");
        std::process::exit(2);
    }
    println!("OK: pulse lists match.");

    Ok(())
}
