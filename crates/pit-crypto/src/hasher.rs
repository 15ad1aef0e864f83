use pit_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a Pit address can never be confused with a bare BLAKE3
/// digest of the same bytes computed by another tool.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for every object in the object store (file blobs and commits).
    pub const OBJECT: Self = Self {
        domain: "pit-object-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Check stored bytes against the address they were filed under.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }
}
