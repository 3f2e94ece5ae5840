//! Box header and movie header definitions.

use crate::error::HeaderError;

/// Size of a compact box header: 32-bit size followed by a 4-byte type.
pub const BOX_HEADER_SIZE: u64 = 8;

/// Distance from the end of the moov header to the mvhd timescale field.
///
/// mvhd header (8) + version (1) + flags (3) + creation time (4) +
/// modification time (4). Valid for version 0 movie headers only.
pub const MVHD_FIELDS_OFFSET: u64 = 20;

/// Bytes holding timescale followed by duration in a version 0 mvhd.
pub const MVHD_FIELDS_SIZE: u64 = 8;

/// Four-character box type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxType(pub [u8; 4]);

impl BoxType {
    pub const FTYP: Self = Self(*b"ftyp");
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");
    pub const MVHD: Self = Self(*b"mvhd");
    pub const FREE: Self = Self(*b"free");
    pub const SKIP: Self = Self(*b"skip");
    pub const WIDE: Self = Self(*b"wide");
    pub const UDTA: Self = Self(*b"udta");
    pub const UUID: Self = Self(*b"uuid");
    pub const MOOF: Self = Self(*b"moof");

    /// Top-level box types the walker accepts.
    ///
    /// ISO-BMFF file-level boxes plus the QuickTime top-level atoms. Anything
    /// else at top level is taken as a sign that the walk lost sync.
    pub const TOP_LEVEL: &'static [Self] = &[
        Self::FTYP,
        Self::MDAT,
        Self::MOOV,
        Self(*b"pnot"),
        Self::UDTA,
        Self::UUID,
        Self::MOOF,
        Self::FREE,
        Self::SKIP,
        Self(*b"jP2 "),
        Self::WIDE,
        Self(*b"load"),
        Self(*b"ctab"),
        Self(*b"imap"),
        Self(*b"matt"),
        Self(*b"kmat"),
        Self(*b"clip"),
        Self(*b"crgn"),
        Self(*b"sync"),
        Self(*b"chap"),
        Self(*b"tmcd"),
        Self(*b"scpt"),
        Self(*b"ssrc"),
        Self(*b"PICT"),
        Self(*b"pdin"),
        Self(*b"meta"),
        Self(*b"mfra"),
        Self(*b"styp"),
        Self(*b"sidx"),
    ];

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the 4-char code as a string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// Whether every byte is printable ASCII (space included).
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| (0x20..=0x7e).contains(b))
    }

    /// Whether this type may appear at the top level of a file.
    pub fn is_top_level(&self) -> bool {
        Self::TOP_LEVEL.contains(self)
    }
}

impl std::fmt::Display for BoxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for BoxType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Decoded compact box header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    /// Total box size including this header.
    pub size: u32,
    /// Box type code.
    pub box_type: BoxType,
}

impl BoxHeader {
    pub fn new(size: u32, box_type: BoxType) -> Self {
        Self { size, box_type }
    }

    /// Decode the first 8 bytes of `data`.
    ///
    /// Only the shape of the header is checked here. Size validity and the
    /// top-level vocabulary are the walker's concern.
    pub fn decode(data: &[u8]) -> Result<Self, HeaderError> {
        if data.len() < BOX_HEADER_SIZE as usize {
            return Err(HeaderError::Truncated(data.len()));
        }

        let size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let box_type = BoxType::from_bytes([data[4], data[5], data[6], data[7]]);

        if !box_type.is_printable() {
            return Err(HeaderError::InvalidTag(box_type.0));
        }

        Ok(Self { size, box_type })
    }

    /// Encode as the 8 bytes found on the wire.
    pub fn encode(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.size.to_be_bytes());
        out[4..].copy_from_slice(&self.box_type.0);
        out
    }

    /// Size 0 (to end of file) and 1 (64-bit size) are not supported, and
    /// anything else under 8 cannot hold its own header.
    pub fn has_valid_size(&self) -> bool {
        u64::from(self.size) >= BOX_HEADER_SIZE
    }
}

/// The timescale and duration fields of a version 0 mvhd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieHeaderFields {
    /// Time units per second.
    pub timescale: u32,
    /// Duration in timescale units.
    pub duration: u32,
}

impl MovieHeaderFields {
    /// Decode timescale then duration, both big-endian.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < MVHD_FIELDS_SIZE as usize {
            return None;
        }
        Some(Self {
            timescale: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
            duration: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        })
    }

    /// Duration in seconds, or `None` when the timescale is zero.
    pub fn duration_secs(&self) -> Option<f64> {
        if self.timescale == 0 {
            None
        } else {
            Some(self.duration as f64 / self.timescale as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header() {
        let data = [0x00, 0x00, 0x00, 0x20, b'f', b't', b'y', b'p'];
        let header = BoxHeader::decode(&data).unwrap();
        assert_eq!(header.size, 32);
        assert_eq!(header.box_type, BoxType::FTYP);
    }

    #[test]
    fn test_header_roundtrip() {
        for (size, tag) in [(8u32, *b"free"), (800, *b"moov"), (u32::MAX, *b"jP2 ")] {
            let header = BoxHeader::new(size, BoxType(tag));
            assert_eq!(BoxHeader::decode(&header.encode()).unwrap(), header);
        }
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(
            BoxHeader::decode(&[0, 0, 0, 8, b'f']),
            Err(HeaderError::Truncated(5))
        );
    }

    #[test]
    fn test_decode_unprintable_tag() {
        let data = [0x00, 0x00, 0x00, 0x10, b'm', 0x00, b'o', b'v'];
        assert_eq!(
            BoxHeader::decode(&data),
            Err(HeaderError::InvalidTag([b'm', 0x00, b'o', b'v']))
        );
    }

    #[test]
    fn test_valid_size() {
        assert!(!BoxHeader::new(0, BoxType::MDAT).has_valid_size());
        assert!(!BoxHeader::new(1, BoxType::MDAT).has_valid_size());
        assert!(!BoxHeader::new(7, BoxType::FREE).has_valid_size());
        assert!(BoxHeader::new(8, BoxType::FREE).has_valid_size());
    }

    #[test]
    fn test_top_level_vocabulary() {
        assert!(BoxType::MOOV.is_top_level());
        assert!(BoxType(*b"jP2 ").is_top_level());
        assert!(!BoxType::MVHD.is_top_level());
        assert!(!BoxType(*b"XXXX").is_top_level());
    }

    #[test]
    fn test_movie_header_fields() {
        let data = [0x00, 0x00, 0x02, 0x58, 0x00, 0x00, 0xd2, 0xf0];
        let fields = MovieHeaderFields::decode(&data).unwrap();
        assert_eq!(fields.timescale, 600);
        assert_eq!(fields.duration, 54000);
        assert_eq!(fields.duration_secs(), Some(90.0));
    }

    #[test]
    fn test_movie_header_zero_timescale() {
        let fields = MovieHeaderFields {
            timescale: 0,
            duration: 1000,
        };
        assert_eq!(fields.duration_secs(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(BoxType::MOOV.to_string(), "moov");
        assert_eq!(BoxType([0xff, 0, 0, 0]).to_string(), "????");
    }
}
