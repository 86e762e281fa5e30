//! Address-string adapters.
//!
//! Each supported remote-switch family addresses its receivers differently:
//! dual DIP-switch banks, rotary selectors, family/group/device codes or
//! lettered groups. All of them reduce to a 12-symbol tri-state code word
//! that the encoder turns into pulses; the functions here are independent of
//! each other and of any timing concern.

use crate::{Result, SwitchError};

/// Expands a tri-state code word over `{'0','1','F'}` into its raw bit
/// pattern. `F` ("floating" switch position) becomes the bit pair `01`,
/// `1` becomes `11` and `0` becomes `00`.
///
/// Returns the code (most significant bit first) and its length in bits.
pub fn expand_tri_state(code_word: &str) -> Result<(u32, usize)> {
    let mut code: u32 = 0;
    let mut length = 0;
    for symbol in code_word.chars() {
        code <<= 2;
        match symbol {
            '0' => {}
            'F' => code |= 0b01,
            '1' => code |= 0b11,
            other => {
                return Err(SwitchError::InvalidCodeWord(format!(
                    "unexpected symbol '{}', tri-state words use 0, 1 and F",
                    other
                )))
            }
        }
        length += 2;
    }
    Ok((code, length))
}

/// Parses a binary code word over `{'0','1'}` into a code and bit length.
pub fn expand_binary(code_word: &str) -> Result<(u32, usize)> {
    let mut code: u32 = 0;
    let mut length = 0;
    for symbol in code_word.chars() {
        code <<= 1;
        match symbol {
            '0' => {}
            '1' => code |= 1,
            other => {
                return Err(SwitchError::InvalidCodeWord(format!(
                    "unexpected symbol '{}', binary words use 0 and 1",
                    other
                )))
            }
        }
        length += 1;
    }
    Ok((code, length))
}

fn dip_bank(switches: &str, out: &mut String) -> Result<()> {
    if switches.len() != 5 {
        return Err(SwitchError::InvalidCodeWord(format!(
            "DIP bank '{}' must hold exactly 5 switch positions",
            switches
        )));
    }
    for position in switches.chars() {
        match position {
            '0' => out.push('F'),
            '1' => out.push('0'),
            other => {
                return Err(SwitchError::InvalidCodeWord(format!(
                    "unexpected DIP position '{}', use 0 (off) or 1 (on)",
                    other
                )))
            }
        }
    }
    Ok(())
}

/// Code word for type A switches, addressed with two banks of 5 DIP
/// switches ("1" = on, "0" = off), e.g. group `"11111"`, device `"00010"`.
pub fn code_word_a(group: &str, device: &str, on: bool) -> Result<String> {
    let mut word = String::with_capacity(12);
    dip_bank(group, &mut word)?;
    dip_bank(device, &mut word)?;
    if on {
        word.push('0');
        word.push('F');
    } else {
        word.push('F');
        word.push('0');
    }
    Ok(word)
}

/// Code word for type B switches with two rotary/sliding switches.
///
/// Layout: 4 symbols switch group (1=`0FFF` .. 4=`FFF0`), 4 symbols switch
/// number, `FFF` padding, then `F` for on or `0` for off.
pub fn code_word_b(group: u8, channel: u8, on: bool) -> Result<String> {
    if group < 1 || group > 4 || channel < 1 || channel > 4 {
        return Err(SwitchError::InvalidCodeWord(format!(
            "type B group {} / channel {} out of range 1..=4",
            group, channel
        )));
    }
    let mut word = String::with_capacity(12);
    for i in 1..=4 {
        word.push(if group == i { '0' } else { 'F' });
    }
    for i in 1..=4 {
        word.push(if channel == i { '0' } else { 'F' });
    }
    word.push_str("FFF");
    word.push(if on { 'F' } else { '0' });
    Ok(word)
}

/// Code word for type C (Intertechno) switches.
///
/// The family letter `'a'..='p'` is encoded as four bits, least significant
/// first, followed by two bits each of device and group number.
pub fn code_word_c(family: char, group: u8, device: u8, on: bool) -> Result<String> {
    let family_index = (family as i32) - ('a' as i32);
    if family_index < 0 || family_index > 15 || group < 1 || group > 4 || device < 1 || device > 4 {
        return Err(SwitchError::InvalidCodeWord(format!(
            "type C family '{}' / group {} / device {} out of range",
            family, group, device
        )));
    }
    let family_index = family_index as u8;
    let mut word = String::with_capacity(12);
    for bit in 0..4 {
        word.push(if family_index & (1 << bit) != 0 { 'F' } else { '0' });
    }
    for bit in 0..2 {
        word.push(if (device - 1) & (1 << bit) != 0 { 'F' } else { '0' });
    }
    for bit in 0..2 {
        word.push(if (group - 1) & (1 << bit) != 0 { 'F' } else { '0' });
    }
    word.push_str("0FF");
    word.push(if on { 'F' } else { '0' });
    Ok(word)
}

/// Code word for type D (REV) switches.
///
/// Layout: 4 symbols group letter (A=`1FFF` .. D=`FFF1`), 3 symbols device
/// number (1=`1FF` .. 3=`FF1`), `000` padding, then `10` for on or `01`
/// for off.
pub fn code_word_d(group: char, device: u8, on: bool) -> Result<String> {
    let group_index = match group {
        'a'..='d' => (group as u8) - b'a',
        'A'..='D' => (group as u8) - b'A',
        other => {
            return Err(SwitchError::InvalidCodeWord(format!(
                "type D group '{}' must be one of a..d",
                other
            )))
        }
    };
    if device < 1 || device > 3 {
        return Err(SwitchError::InvalidCodeWord(format!(
            "type D device {} out of range 1..=3",
            device
        )));
    }
    let mut word = String::with_capacity(12);
    for i in 0..4 {
        word.push(if group_index == i { '1' } else { 'F' });
    }
    for i in 1..=3 {
        word.push(if device == i { '1' } else { 'F' });
    }
    word.push_str("000");
    if on {
        word.push('1');
        word.push('0');
    } else {
        word.push('0');
        word.push('1');
    }
    Ok(word)
}
