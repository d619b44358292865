//! Sub-field extraction and insertion for J1939 payloads.
//!
//! Multi-byte J1939 parameters are sent least significant byte first, so the
//! `*_le` helpers read them straight out of a payload while `two_bytes` and
//! `four_bytes` take the bytes most significant first.

/// Bits `shift..shift + width` of `byte`
#[inline]
pub fn bits(byte: u8, shift: u8, width: u8) -> u8 {
    (byte >> shift) & (((1u16 << width) - 1) as u8)
}

/// 2-bit state field starting at bit `shift`
#[inline]
pub fn two_bits(byte: u8, shift: u8) -> u8 {
    bits(byte, shift, 2)
}

/// Low nibble
#[inline]
pub fn lo_nibble(byte: u8) -> u8 {
    byte & 0x0F
}

/// High nibble
#[inline]
pub fn hi_nibble(byte: u8) -> u8 {
    byte >> 4
}

#[inline]
pub fn hi_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

#[inline]
pub fn lo_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

#[inline]
pub fn hi_word(dword: u32) -> u16 {
    (dword >> 16) as u16
}

/// Most significant byte of a 32-bit value
#[inline]
pub fn top_byte(dword: u32) -> u8 {
    hi_byte(hi_word(dword))
}

#[inline]
pub fn two_bytes(hi: u8, lo: u8) -> u16 {
    (u16::from(hi) << 8) | u16::from(lo)
}

#[inline]
pub fn four_bytes(b3: u8, b2: u8, b1: u8, b0: u8) -> u32 {
    (u32::from(b3) << 24) | (u32::from(b2) << 16) | (u32::from(b1) << 8) | u32::from(b0)
}

/// Little-endian word at `data[offset..offset + 2]`
#[inline]
pub fn word_le(data: &[u8], offset: usize) -> u16 {
    two_bytes(data[offset + 1], data[offset])
}

/// Little-endian double word at `data[offset..offset + 4]`
#[inline]
pub fn dword_le(data: &[u8], offset: usize) -> u32 {
    four_bytes(
        data[offset + 3],
        data[offset + 2],
        data[offset + 1],
        data[offset],
    )
}

/// Writes `value` into bits `shift..shift + width` of `byte`
#[inline]
pub fn set_bits(byte: &mut u8, shift: u8, width: u8, value: u8) {
    let mask = (((1u16 << width) - 1) as u8) << shift;
    *byte = (*byte & !mask) | ((value << shift) & mask);
}

#[inline]
pub fn put_word_le(data: &mut [u8], offset: usize, word: u16) {
    data[offset] = lo_byte(word);
    data[offset + 1] = hi_byte(word);
}
