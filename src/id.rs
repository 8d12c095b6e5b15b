use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Size of an identifier in bytes.
pub const ID_LEN: usize = 20;

/// A SCRU-160 identifier.
///
/// The 20 bytes are laid out big-endian as a 48-bit millisecond timestamp,
/// a 16-bit counter and 96 random bits. Comparing two identifiers compares
/// their bytes, which is also the order of both text encodings.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scru160Id([u8; ID_LEN]);

/// The four semantic fields of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    /// Milliseconds since the Unix epoch (48 bits).
    pub timestamp: u64,
    /// Per-millisecond counter (16 bits).
    pub counter: u16,
    /// First 16 random bits.
    pub random16: u16,
    /// Remaining 80 random bits.
    pub random80: u128,
}

impl Scru160Id {
    /// Create an identifier from its raw big-endian bytes.
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an identifier from its fields.
    ///
    /// Bits beyond the width of `timestamp` (48) and `random80` (80) are
    /// discarded.
    ///
    /// # Example
    /// ```
    /// use scru160::Scru160Id;
    /// let id = Scru160Id::from_fields(1645700094476, 4660, 43981, 0xef0123456789abcdef01);
    /// assert_eq!(id.to_hex_string(), "017f2b5e9a0c1234abcdef0123456789abcdef01");
    /// ```
    pub fn from_fields(timestamp: u64, counter: u16, random16: u16, random80: u128) -> Self {
        let mut random = [0u8; 12];
        random[..2].copy_from_slice(&random16.to_be_bytes());
        random[2..].copy_from_slice(&random80.to_be_bytes()[6..]);
        Self::from_parts(timestamp, counter, random)
    }

    pub(crate) fn from_parts(timestamp: u64, counter: u16, random: [u8; 12]) -> Self {
        let mut bytes = [0u8; ID_LEN];
        bytes[..6].copy_from_slice(&timestamp.to_be_bytes()[2..]);
        bytes[6..8].copy_from_slice(&counter.to_be_bytes());
        bytes[8..].copy_from_slice(&random);
        Self(bytes)
    }

    /// The raw big-endian bytes.
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn timestamp(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf[2..].copy_from_slice(&self.0[..6]);
        u64::from_be_bytes(buf)
    }

    pub fn counter(&self) -> u16 {
        u16::from_be_bytes([self.0[6], self.0[7]])
    }

    pub fn random16(&self) -> u16 {
        u16::from_be_bytes([self.0[8], self.0[9]])
    }

    pub fn random80(&self) -> u128 {
        let mut buf = [0u8; 16];
        buf[6..].copy_from_slice(&self.0[10..]);
        u128::from_be_bytes(buf)
    }

    /// Split the identifier into its four fields.
    pub fn fields(&self) -> Fields {
        Fields {
            timestamp: self.timestamp(),
            counter: self.counter(),
            random16: self.random16(),
            random80: self.random80(),
        }
    }

    /// Encode as a 32-character base32hex string (`^[0-9A-V]{32}$`).
    ///
    /// # Example
    /// ```
    /// use scru160::Scru160Id;
    /// let id = Scru160Id::from_bytes([0xff; 20]);
    /// assert_eq!(id.to_sortable_string(), "V".repeat(32));
    /// ```
    pub fn to_sortable_string(&self) -> String {
        encode::base32hex(&self.0)
    }

    /// Encode as a 40-character lowercase hexadecimal string (`^[0-9a-f]{40}$`).
    pub fn to_hex_string(&self) -> String {
        encode::hex(&self.0)
    }
}

/// Decode either text encoding and split the result into its fields.
///
/// # Errors
/// [`Error::InvalidFormat`] if `text` is neither 32 base32hex characters nor
/// 40 hexadecimal characters.
///
/// # Example
/// ```
/// let fields = scru160::decode("05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1").unwrap();
/// assert_eq!(fields.timestamp, 1645700094476);
/// assert_eq!(fields.counter, 4660);
/// ```
pub fn decode(text: &str) -> Result<Fields, Error> {
    text.parse::<Scru160Id>().map(|id| id.fields())
}

impl FromStr for Scru160Id {
    type Err = Error;

    /// Parse a base32hex string (case-insensitive) or a hexadecimal string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = match s.len() {
            32 => encode::decode_base32hex(s.as_bytes()),
            40 => encode::decode_hex(s.as_bytes()),
            _ => None,
        };
        bytes
            .map(Self)
            .ok_or_else(|| Error::InvalidFormat(s.to_owned()))
    }
}

impl fmt::Display for Scru160Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sortable_string())
    }
}

impl fmt::Debug for Scru160Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scru160Id")
            .field(&self.to_sortable_string())
            .finish()
    }
}

impl From<[u8; ID_LEN]> for Scru160Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Scru160Id> for [u8; ID_LEN] {
    fn from(id: Scru160Id) -> Self {
        id.0
    }
}

impl From<Scru160Id> for String {
    fn from(id: Scru160Id) -> Self {
        id.to_sortable_string()
    }
}

/// Fixed-layout text encodings.
///
/// - `base32hex`: `[0-9A-V]`, 5 bits per character, four 40-bit chunks
/// - `hex`: `[0-9a-f]`
mod encode {
    use super::ID_LEN;

    /// Base32hex alphabet (RFC 4648 "extended hex", uppercase).
    const BASE32HEX: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";
    const HEX: &[u8; 16] = b"0123456789abcdef";

    /// Encode 20 bytes as 32 base32hex characters.
    ///
    /// Each 5-byte chunk maps to exactly eight characters, so the output
    /// sorts the same way as the input bytes.
    pub fn base32hex(bytes: &[u8; ID_LEN]) -> String {
        let mut out = String::with_capacity(32);
        for chunk in bytes.chunks_exact(5) {
            let n = chunk.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
            for shift in (0..8).rev() {
                out.push(BASE32HEX[((n >> (shift * 5)) & 31) as usize] as char);
            }
        }
        out
    }

    pub fn hex(bytes: &[u8; ID_LEN]) -> String {
        let mut out = String::with_capacity(40);
        for &b in bytes {
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 15) as usize] as char);
        }
        out
    }

    pub fn decode_base32hex(src: &[u8]) -> Option<[u8; ID_LEN]> {
        if src.len() != 32 {
            return None;
        }
        let mut out = [0u8; ID_LEN];
        for (chunk, dst) in src.chunks_exact(8).zip(out.chunks_exact_mut(5)) {
            let mut n = 0u64;
            for &c in chunk {
                n = (n << 5) | base32hex_digit(c)? as u64;
            }
            dst.copy_from_slice(&n.to_be_bytes()[3..]);
        }
        Some(out)
    }

    pub fn decode_hex(src: &[u8]) -> Option<[u8; ID_LEN]> {
        if src.len() != 40 {
            return None;
        }
        let mut out = [0u8; ID_LEN];
        for (pair, dst) in src.chunks_exact(2).zip(out.iter_mut()) {
            *dst = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
        }
        Some(out)
    }

    fn base32hex_digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'A'..=b'V' => Some(c - b'A' + 10),
            b'a'..=b'v' => Some(c - b'a' + 10),
            _ => None,
        }
    }

    fn hex_digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    const SAMPLE_HEX: &str = "017f2b5e9a0c1234abcdef0123456789abcdef01";
    const SAMPLE_B32: &str = "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1";

    fn random_id() -> Scru160Id {
        let mut bytes = [0u8; ID_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Scru160Id::from_bytes(bytes)
    }

    /// Encodes known byte sequences
    #[test]
    fn encodes_known_vectors() {
        let id: Scru160Id = SAMPLE_HEX.parse().unwrap();
        assert_eq!(id.to_sortable_string(), SAMPLE_B32);
        assert_eq!(id.to_hex_string(), SAMPLE_HEX);

        let seq: [u8; ID_LEN] = std::array::from_fn(|i| i as u8 + 1);
        let id = Scru160Id::from_bytes(seq);
        assert_eq!(id.to_sortable_string(), "041061050O3GG28A1C60Q3GF208H44OK");
        assert_eq!(id.to_hex_string(), "0102030405060708090a0b0c0d0e0f1011121314");

        assert_eq!(Scru160Id::default().to_sortable_string(), "0".repeat(32));
        assert_eq!(Scru160Id::default().to_hex_string(), "0".repeat(40));
    }

    /// Splits identifiers into timestamp, counter and random fields
    #[test]
    fn splits_fields() {
        let fields = decode(SAMPLE_B32).unwrap();
        assert_eq!(
            fields,
            Fields {
                timestamp: 1645700094476,
                counter: 4660,
                random16: 43981,
                random80: 1128666577701324626718465,
            }
        );
        let id = Scru160Id::from_fields(
            fields.timestamp,
            fields.counter,
            fields.random16,
            fields.random80,
        );
        assert_eq!(id.to_hex_string(), SAMPLE_HEX);
    }

    /// Decodes both encodings back to the original bytes
    #[test]
    fn decodes_both_encodings() {
        for _ in 0..1_000 {
            let id = random_id();
            assert_eq!(id.to_sortable_string().parse::<Scru160Id>(), Ok(id));
            assert_eq!(id.to_hex_string().parse::<Scru160Id>(), Ok(id));
        }
    }

    /// Accepts lowercase base32hex and uppercase hex
    #[test]
    fn decodes_case_insensitively() {
        let id: Scru160Id = SAMPLE_B32.parse().unwrap();
        assert_eq!(SAMPLE_B32.to_lowercase().parse::<Scru160Id>(), Ok(id));
        assert_eq!(SAMPLE_HEX.to_uppercase().parse::<Scru160Id>(), Ok(id));
    }

    /// Rejects input of the wrong length or alphabet
    #[test]
    fn rejects_invalid_input() {
        let cases = [
            "",
            "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO",
            "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1X",
            "05VIMNKQ1G939AUDTS0I6HB7H6LSRRW1",
            "017f2b5e9a0c1234abcdef0123456789abcdef0g",
            "017f2b5e9a0c1234abcdef0123456789abcdef0",
            " 05VIMNKQ1G939AUDTS0I6HB7H6LSRRO",
        ];
        for case in cases {
            assert_eq!(
                case.parse::<Scru160Id>(),
                Err(Error::InvalidFormat(case.to_owned()))
            );
        }
    }

    /// Preserves byte order in both text encodings
    #[test]
    fn preserves_order() {
        for _ in 0..10_000 {
            let (a, b) = (random_id(), random_id());
            assert_eq!(
                a.cmp(&b),
                a.to_sortable_string().cmp(&b.to_sortable_string())
            );
            assert_eq!(a.cmp(&b), a.to_hex_string().cmp(&b.to_hex_string()));
        }
    }

    /// Both encodings denote the same 160-bit integer
    #[test]
    fn encodings_share_integer_value() {
        for _ in 0..1_000 {
            let id = random_id();
            let (b32, hex) = (id.to_sortable_string(), id.to_hex_string());
            // 120 bits = 24 base32 digits = 30 hex digits; 40 bits = 8 = 10
            assert_eq!(
                u128::from_str_radix(&b32[..24], 32).unwrap(),
                u128::from_str_radix(&hex[..30], 16).unwrap()
            );
            assert_eq!(
                u64::from_str_radix(&b32[24..], 32).unwrap(),
                u64::from_str_radix(&hex[30..], 16).unwrap()
            );
        }
    }
}
