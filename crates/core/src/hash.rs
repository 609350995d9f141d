//! Content digests: MD5 checksums on file records and SHA-1 retrieval keys.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::fmt;

/// Length of an MD5 checksum in its canonical hex form.
pub const MD5_HEX_LEN: usize = 32;

/// Length of a SHA-1 digest in its canonical hex form.
pub const SHA1_HEX_LEN: usize = 40;

fn decode_hex<const N: usize>(s: &str, what: &str) -> crate::Result<[u8; N]> {
    if s.len() != N * 2 {
        return Err(crate::Error::InvalidChecksum(format!(
            "{what}: expected {} hex chars, got {}",
            N * 2,
            s.len()
        )));
    }
    let mut bytes = [0u8; N];
    hex::decode_to_slice(s, &mut bytes)
        .map_err(|e| crate::Error::InvalidChecksum(format!("{what}: {e}")))?;
    Ok(bytes)
}

/// MD5 checksum stored on every file record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Md5Checksum([u8; 16]);

impl Md5Checksum {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Compute the MD5 of data.
    pub fn compute(data: &[u8]) -> Self {
        Self(Md5::digest(data).into())
    }

    /// Create an incremental hasher.
    pub fn hasher() -> Md5Hasher {
        Md5Hasher(Md5::new())
    }

    /// Parse from a 32-char hex string (either case).
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        decode_hex(s, "md5").map(Self)
    }

    /// Encode as lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Md5Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Md5Checksum({})", self.to_hex())
    }
}

impl fmt::Display for Md5Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Md5Checksum {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Md5Checksum> for String {
    fn from(value: Md5Checksum) -> Self {
        value.to_hex()
    }
}

/// Incremental MD5 hasher.
pub struct Md5Hasher(Md5);

impl Md5Hasher {
    /// Update the hasher with data.
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Finalize and return the checksum.
    pub fn finalize(self) -> Md5Checksum {
        Md5Checksum(self.0.finalize().into())
    }
}

/// SHA-1 digest of file content, used as the external retrieval key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest([u8; 20]);

impl Sha1Digest {
    /// Compute the SHA-1 of data.
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha1::digest(data).into())
    }

    /// Parse from a 40-char hex string (either case).
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        decode_hex(s, "sha1").map(Self)
    }

    /// Encode as lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this digest is the one named by `key`.
    ///
    /// Keys that are not valid hex digests never match.
    pub fn matches_key(&self, key: &str) -> bool {
        Self::from_hex(key).is_ok_and(|other| other == *self)
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vector() {
        let sum = Md5Checksum::compute(b"");
        assert_eq!(sum.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_md5_incremental_matches_oneshot() {
        let mut hasher = Md5Checksum::hasher();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.finalize(), Md5Checksum::compute(b"hello world"));
    }

    #[test]
    fn test_md5_rejects_wrong_length() {
        let err = Md5Checksum::from_hex("b8059d369b4f691836d810b48901ed7").unwrap_err();
        assert!(err.to_string().contains("expected 32 hex chars"));
    }

    #[test]
    fn test_md5_accepts_uppercase() {
        let sum = Md5Checksum::from_hex("B8059D369B4F691836D810B48901ED76").unwrap();
        assert_eq!(sum.to_hex(), "b8059d369b4f691836d810b48901ed76");
    }

    #[test]
    fn test_md5_serde_as_hex_string() {
        let sum = Md5Checksum::compute(b"abc");
        let json = serde_json::to_string(&sum).unwrap();
        assert_eq!(json, "\"900150983cd24fb0d6963f7d28e17f72\"");
        assert!(serde_json::from_str::<Md5Checksum>("\"abc\"").is_err());
    }

    #[test]
    fn test_sha1_matches_key() {
        let digest = Sha1Digest::compute(b"abc");
        assert!(digest.matches_key("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert!(digest.matches_key("A9993E364706816ABA3E25717850C26C9CD0D89D"));
        assert!(!digest.matches_key("abc123"));
        assert!(!digest.matches_key("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
    }
}
