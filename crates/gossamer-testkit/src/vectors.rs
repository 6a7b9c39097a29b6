//! Golden vectors pinning the content-address scheme.
//!
//! Ids are SHA-256 over the raw payload bytes. These digests were produced
//! with `sha256sum`; if they ever fail, the wire format changed and every
//! deployed peer breaks.

/// A payload and its expected message id.
pub struct HashVector {
    pub content: &'static str,
    pub id_hex: &'static str,
}

/// Known-good content hashes.
pub const HASH_VECTORS: &[HashVector] = &[
    HashVector {
        // The empty payload: the id shared by every sync message.
        content: "",
        id_hex: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    },
    HashVector {
        content: "message-1",
        id_hex: "9deb880b43bdf6f465a0afb130aed71b31cf219626f3637f577d4167cd80e5f2",
    },
    HashVector {
        content: "message-2",
        id_hex: "dd1dbcb34570c8e7020a2d117a37819e81aac35c95d325ba14339fd9c93d4477",
    },
    HashVector {
        content: "message-3",
        id_hex: "037346d4940708e2dca640c33c46a4da081a01f168e7cfe09d2fb5e759a56ae5",
    },
    HashVector {
        content: "hello world",
        id_hex: "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
    },
    HashVector {
        content: "sync",
        id_hex: "75c75efe327a8ef35a072f25117961f5b99e35035dc9bd86493dd29fd7bc07eb",
    },
];
