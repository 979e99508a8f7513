use sha2::{Digest, Sha256};

pub const ALGORITHM: &str = "SHA256";

/// Digest of the final body, attached as object metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: &'static str,
    pub digest: String,
}

pub fn checksum(body: &[u8]) -> Checksum {
    Checksum {
        algorithm: ALGORITHM,
        digest: hex::encode(Sha256::digest(body)),
    }
}
