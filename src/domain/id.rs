use std::fmt;

use bson::oid::ObjectId;

/// Identifier of a stored record.
///
/// Wraps the document store's native 12-byte object id. The only text form is
/// the 24-digit lowercase hex string produced by `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the hex form. Malformed input is `None`, never an error.
    pub fn parse(s: &str) -> Option<Self> {
        ObjectId::parse_str(s).ok().map(Self)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}
