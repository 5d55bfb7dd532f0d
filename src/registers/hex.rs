//! Hex-text rendering of register frames
//!
//! The display and persistence form of a frame is the exact string
//! `"C0 00 08 XX XX XX XX XX XX XX XX"`: uppercase, two digits per byte,
//! single spaces, no trailing space. The fixed-capacity return type makes
//! the undersized-buffer failure of the wire format's C heritage
//! unrepresentable; only parsing can fail.

use core::fmt::Write;

use heapless::String;

use crate::config::protocol::{FRAME_LEN, HEX_RENDER_CAPACITY};
use crate::registers::codec::RegisterFrame;

/// Why a hex string failed to parse back into a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    /// A token was not two hex digits
    MalformedHexText,
    /// Fewer or more than eleven byte tokens
    WrongByteCount,
}

impl RegisterFrame {
    /// Render the frame as its canonical hex string
    pub fn to_hex_string(&self) -> String<HEX_RENDER_CAPACITY> {
        let mut out = String::new();
        for (i, byte) in self.as_bytes().iter().enumerate() {
            // Capacity covers the full rendering, write cannot fail
            if i > 0 {
                let _ = out.push(' ');
            }
            let _ = write!(out, "{:02X}", byte);
        }
        out
    }

    /// Parse a whitespace-separated hex rendering back into a frame
    ///
    /// Accepts either case on input. Exactly eleven two-digit tokens are
    /// required.
    pub fn from_hex_str(text: &str) -> Result<Self, HexError> {
        let mut bytes = [0u8; FRAME_LEN];
        let mut count = 0;

        for token in text.split_whitespace() {
            if count == FRAME_LEN {
                return Err(HexError::WrongByteCount);
            }
            bytes[count] = parse_hex_byte(token)?;
            count += 1;
        }

        if count != FRAME_LEN {
            return Err(HexError::WrongByteCount);
        }
        Ok(Self::from_bytes(bytes))
    }
}

fn parse_hex_byte(token: &str) -> Result<u8, HexError> {
    if token.len() != 2 {
        return Err(HexError::MalformedHexText);
    }
    u8::from_str_radix(token, 16).map_err(|_| HexError::MalformedHexText)
}
