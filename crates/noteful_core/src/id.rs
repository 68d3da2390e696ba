//! Fixed-shape record identifiers.
//!
//! An [`ObjectId`] is 12 bytes: a 4-byte big-endian Unix timestamp in seconds,
//! 5 bytes chosen randomly once per process, and a 3-byte counter seeded
//! randomly. The textual form is always 24 hexadecimal characters.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

/// Number of raw bytes in an identifier.
pub const OBJECT_ID_LEN: usize = 12;
/// Length of the hex rendering.
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Opaque record identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

/// Returned when text does not have the identifier shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidObjectId(pub String);

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(rand::random::<[u8; 5]>)
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
        .fetch_add(1, Ordering::Relaxed)
        & COUNTER_MASK
}

impl ObjectId {
    /// Generate a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    /// Generate an identifier with an explicit creation timestamp.
    ///
    /// Times outside the 32-bit seconds range are clamped.
    pub fn with_timestamp(at: DateTime<Utc>) -> Self {
        let secs = at.timestamp().clamp(0, u32::MAX as i64) as u32;
        let counter = next_counter();

        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Build an identifier from raw bytes.
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse the 24-character hex form. Upper and lower case are accepted.
    ///
    /// # Errors
    /// Returns [`InvalidObjectId`] for any other length or non-hex input.
    pub fn parse(value: &str) -> Result<Self, InvalidObjectId> {
        if value.len() != OBJECT_ID_HEX_LEN {
            return Err(InvalidObjectId(value.to_string()));
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|_| InvalidObjectId(value.to_string()))?;
        Ok(Self(bytes))
    }

    /// Lower-case hex rendering used as the storage key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation time embedded in the identifier.
    #[cfg(test)]
    pub(crate) fn timestamp(&self) -> DateTime<Utc> {
        use chrono::TimeZone;

        let mut secs = [0u8; 4];
        secs.copy_from_slice(&self.0[..4]);
        Utc.timestamp_opt(u32::from_be_bytes(secs) as i64, 0)
            .single()
            .unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique_and_well_formed() {
        let ids: Vec<ObjectId> = (0..1_000).map(|_| ObjectId::new()).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        for id in ids {
            let text = id.to_hex();
            assert_eq!(text.len(), OBJECT_ID_HEX_LEN);
            assert_eq!(ObjectId::parse(&text).expect("parse"), id);
        }
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for value in [
            "",
            "NOT-A-VALID-ID",
            "twelvetwelve",
            "00000000000000000000000",
            "0000000000000000000000001",
            "00000000000000000000000g",
            "{\"$gt\": \"\"}",
        ] {
            assert!(ObjectId::parse(value).is_err(), "value: {}", value);
        }
    }

    #[test]
    fn parse_accepts_either_case_and_renders_lowercase() {
        let id = ObjectId::parse("5B0C8A3F2E9D1A0011223344").expect("upper case");
        assert_eq!(id.to_string(), "5b0c8a3f2e9d1a0011223344");
    }

    #[test]
    fn timestamp_prefix_round_trips_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let id = ObjectId::with_timestamp(at);
        assert_eq!(id.timestamp(), at);
    }

    #[test]
    fn serde_uses_hex_string_form() {
        let id = ObjectId::parse("000000000000000000000007").expect("parse");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"000000000000000000000007\"");
        let back: ObjectId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
