use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::object::ObjectType;
use crate::Error;

/// SHA-256 digest identifying a stored object
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// length of the hex rendering
    pub const HEX_LEN: usize = 64;

    /// parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != Self::HEX_LEN || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(Error::InvalidObjectId(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| Error::InvalidObjectId(s.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// abbreviated hex for log output
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_hex(s)
    }
}

/// compute the id of an object
///
/// the digest covers exactly the stored bytes, `<type>\0<payload>`, so an
/// empty file and an empty directory never share an id.
pub fn compute_id(object_type: ObjectType, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(object_type.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(payload);
    ObjectId(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_hex_roundtrip() {
        let hex = "abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789";
        let id = ObjectId::from_hex(hex).unwrap();
        assert_eq!(id.to_hex(), hex);
        assert_eq!(id.to_string(), hex);
        assert_eq!(hex.parse::<ObjectId>().unwrap(), id);
    }

    #[test]
    fn test_id_invalid_hex() {
        assert!(ObjectId::from_hex("not valid hex").is_err());
        assert!(ObjectId::from_hex("abcd").is_err()); // too short
        assert!(ObjectId::from_hex(
            "abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789ff"
        )
        .is_err()); // too long
        // uppercase is not the canonical rendering
        assert!(ObjectId::from_hex(
            "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789"
        )
        .is_err());
    }

    #[test]
    fn test_compute_id_known_vector() {
        // sha256("blob\0hello")
        assert_eq!(
            compute_id(ObjectType::Blob, b"hello").to_hex(),
            "b7da690ebce9312567657893e936fe6935d0a52372f2703f02616bbd53eccb0c"
        );
    }

    #[test]
    fn test_compute_id_determinism() {
        let same = compute_id(ObjectType::Blob, b"same");
        assert_eq!(same, compute_id(ObjectType::Blob, b"same"));
        assert_ne!(same, compute_id(ObjectType::Blob, b"different"));
    }

    #[test]
    fn test_empty_blob_and_tree_differ() {
        assert_eq!(
            compute_id(ObjectType::Blob, b"").to_hex(),
            "99ffb0ba6646475015977d05324ca3be42598002a289319701af74d273f9f2e3"
        );
        assert_eq!(
            compute_id(ObjectType::Tree, b"").to_hex(),
            "4c91b08843fdda8593f1552b5a6f10075310e7773fed804c20e24813c963f26f"
        );
    }

    #[test]
    fn test_short_id() {
        let id = compute_id(ObjectType::Blob, b"hello");
        assert_eq!(id.short(), "b7da690ebce9");
        assert_eq!(format!("{:?}", id), "ObjectId(b7da690ebce9)");
    }
}
