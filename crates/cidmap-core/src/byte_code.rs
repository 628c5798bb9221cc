//! Raw character codes as they appear in content streams.
//!
//! A code is 1 to 4 bytes. Its integer value is the bytes read as a
//! big-endian unsigned number: `[0x12, 0x34]` is `0x1234`, `[0x01, 0x00, 0x00]`
//! is `0x010000`. There is no sign extension.

use std::fmt;

use crate::error::{CMapError, Result};

/// Longest byte code a CMap codespace allows.
pub const MAX_CODE_LEN: usize = 4;

/// Convert a byte sequence to its integer code.
///
/// Accumulates `result = (result << 8) | byte` over the bytes in stored
/// order. Sequences longer than 4 bytes keep only the low 32 bits; use
/// [`ByteCode::new`] to reject them instead.
pub fn bytes_to_code(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// A character code of 1 to 4 bytes.
///
/// With the `serde` feature it serializes as its byte sequence, and
/// deserializing rejects sequences that are empty or longer than 4 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct ByteCode {
    bytes: [u8; MAX_CODE_LEN],
    len: u8,
}

impl ByteCode {
    /// Create a byte code from 1 to 4 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::InvalidByteCode`] for an empty slice or one
    /// longer than 4 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > MAX_CODE_LEN {
            return Err(CMapError::InvalidByteCode(bytes.len()));
        }
        let mut buf = [0u8; MAX_CODE_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(ByteCode {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    /// Encode an integer code as `width` big-endian bytes.
    ///
    /// High bits that do not fit in `width` bytes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::InvalidByteCode`] if `width` is not 1 to 4.
    pub fn from_code(code: u32, width: usize) -> Result<Self> {
        if width == 0 || width > MAX_CODE_LEN {
            return Err(CMapError::InvalidByteCode(width));
        }
        let be = code.to_be_bytes();
        Self::new(&be[MAX_CODE_LEN - width..])
    }

    /// The code's bytes in stored (big-endian) order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of bytes, 1 to 4.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a byte code has at least one byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The integer value of this code.
    pub fn to_code(&self) -> u32 {
        bytes_to_code(self.as_bytes())
    }
}

impl fmt::Debug for ByteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteCode(<")?;
        for b in self.as_bytes() {
            write!(f, "{b:02X}")?;
        }
        write!(f, ">)")
    }
}

impl fmt::Display for ByteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for b in self.as_bytes() {
            write!(f, "{b:02X}")?;
        }
        write!(f, ">")
    }
}

impl TryFrom<&[u8]> for ByteCode {
    type Error = CMapError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        ByteCode::new(bytes)
    }
}

impl TryFrom<Vec<u8>> for ByteCode {
    type Error = CMapError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        ByteCode::new(&bytes)
    }
}

impl From<ByteCode> for Vec<u8> {
    fn from(code: ByteCode) -> Self {
        code.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_code() {
        assert_eq!(bytes_to_code(&[0x12, 0x34]), 0x1234);
        assert_eq!(bytes_to_code(&[0x12, 0x34]), 4660);
    }

    #[test]
    fn three_byte_code() {
        assert_eq!(bytes_to_code(&[0x01, 0x00, 0x00]), 0x01_0000);
        assert_eq!(bytes_to_code(&[0x01, 0x00, 0x00]), 65536);
    }

    #[test]
    fn high_bytes_are_not_sign_extended() {
        assert_eq!(bytes_to_code(&[0xFF]), 0xFF);
        assert_eq!(bytes_to_code(&[0x81, 0x40]), 0x8140);
        assert_eq!(bytes_to_code(&[0xFF, 0xFF, 0xFF, 0xFF]), u32::MAX);
    }

    #[test]
    fn leading_zero_bytes_count_toward_width_not_value() {
        let code = ByteCode::new(&[0x00, 0x01]).unwrap();
        assert_eq!(code.len(), 2);
        assert_eq!(code.to_code(), 1);
        assert_eq!(code.as_bytes(), &[0x00, 0x01]);
    }

    #[test]
    fn empty_slice_is_rejected() {
        assert_eq!(ByteCode::new(&[]), Err(CMapError::InvalidByteCode(0)));
    }

    #[test]
    fn five_bytes_are_rejected() {
        assert_eq!(
            ByteCode::new(&[1, 2, 3, 4, 5]),
            Err(CMapError::InvalidByteCode(5))
        );
    }

    #[test]
    fn from_code_fixed_width() {
        let code = ByteCode::from_code(0x1234, 2).unwrap();
        assert_eq!(code.as_bytes(), &[0x12, 0x34]);
        let code = ByteCode::from_code(0x41, 1).unwrap();
        assert_eq!(code.as_bytes(), &[0x41]);
        let code = ByteCode::from_code(0x0001_0000, 3).unwrap();
        assert_eq!(code.as_bytes(), &[0x01, 0x00, 0x00]);
    }

    #[test]
    fn from_code_drops_high_bits() {
        let code = ByteCode::from_code(0x0001_2345, 2).unwrap();
        assert_eq!(code.as_bytes(), &[0x23, 0x45]);
    }

    #[test]
    fn from_code_rejects_bad_width() {
        assert!(ByteCode::from_code(1, 0).is_err());
        assert!(ByteCode::from_code(1, 5).is_err());
    }

    #[test]
    fn display_and_debug_are_hex() {
        let code = ByteCode::new(&[0x81, 0x40]).unwrap();
        assert_eq!(code.to_string(), "<8140>");
        assert_eq!(format!("{code:?}"), "ByteCode(<8140>)");
    }

    #[test]
    fn try_from_slice() {
        let bytes: &[u8] = &[0xA1, 0xA1];
        let code = ByteCode::try_from(bytes).unwrap();
        assert_eq!(code.to_code(), 0xA1A1);
        assert!(!code.is_empty());
    }

    #[test]
    fn try_from_vec_validates_length() {
        assert_eq!(
            ByteCode::try_from(vec![0x81, 0x40]).unwrap().to_code(),
            0x8140
        );
        assert_eq!(
            ByteCode::try_from(Vec::new()),
            Err(CMapError::InvalidByteCode(0))
        );
        assert_eq!(
            ByteCode::try_from(vec![0; 9]),
            Err(CMapError::InvalidByteCode(9))
        );
        let bytes: Vec<u8> = ByteCode::new(&[0x00, 0x01]).unwrap().into();
        assert_eq!(bytes, vec![0x00, 0x01]);
    }
}
