//! Opaque token carried to the result screen after a settled purchase.
//!
//! The token packs the transaction id and the buyer's email so the result
//! screen can render both without re-reading session state. It is masked
//! with a fixed SHA-256 keystream and base58-encoded: enough to keep the
//! email out of logs, link previews and over-the-shoulder glances. It is
//! obfuscation, not encryption, and must never be treated as a secrecy
//! boundary.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::error::{CheckoutError, Result};

const KEYSTREAM_CONTEXT: &[u8] = b"nodesale.receipt.v1";

static KEYSTREAM_SEED: Lazy<[u8; 32]> = Lazy::new(|| {
    let mut hasher = Sha256::new();
    hasher.update(KEYSTREAM_CONTEXT);
    let result = hasher.finalize();

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&result);
    seed
});

/// Payload recovered from a receipt token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: String,
    pub email: String,
}

/// XOR with SHA-256(seed || block index). Applying it twice restores the
/// original bytes.
fn mask(bytes: &mut [u8]) {
    for (block, chunk) in bytes.chunks_mut(32).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(*KEYSTREAM_SEED);
        hasher.update((block as u64).to_le_bytes());
        let pad = hasher.finalize();

        for (byte, pad_byte) in chunk.iter_mut().zip(pad.iter()) {
            *byte ^= pad_byte;
        }
    }
}

/// Build the token for a settled purchase.
pub fn seal(transaction_id: &str, email: &str) -> String {
    // Newline framing: neither field can contain one.
    let mut bytes = format!("{}\n{}", transaction_id, email).into_bytes();
    mask(&mut bytes);
    bs58::encode(bytes).into_string()
}

/// Recover the payload on the result-display side.
pub fn open(token: &str) -> Result<Receipt> {
    let mut bytes = bs58::decode(token)
        .into_vec()
        .map_err(|_| CheckoutError::InvalidInput {
            detail: "receipt token is not valid base58".into(),
        })?;
    mask(&mut bytes);

    let text = String::from_utf8(bytes).map_err(|_| CheckoutError::InvalidInput {
        detail: "receipt token payload is garbled".into(),
    })?;
    let (transaction_id, email) =
        text.split_once('\n')
            .ok_or_else(|| CheckoutError::InvalidInput {
                detail: "receipt token payload is incomplete".into(),
            })?;

    Ok(Receipt {
        transaction_id: transaction_id.to_string(),
        email: email.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX: &str = "0x9e2897c53fa7f46ca2a1d74e1e39973b7b2a6f5d21d56b3c6c1a860bd8a9f104";
    const EMAIL: &str = "buyer@example.com";

    #[test]
    fn test_seal_open_roundtrip() {
        let token = seal(TX, EMAIL);
        let receipt = open(&token).unwrap();
        assert_eq!(receipt.transaction_id, TX);
        assert_eq!(receipt.email, EMAIL);
    }

    #[test]
    fn test_token_is_deterministic() {
        assert_eq!(seal(TX, EMAIL), seal(TX, EMAIL));
        assert_ne!(seal(TX, EMAIL), seal(TX, "other@example.com"));
    }

    #[test]
    fn test_token_does_not_carry_the_payload_in_clear() {
        let token = seal(TX, EMAIL);
        assert!(!token.contains(EMAIL));

        // Decoding without unmasking must not yield the framed payload
        let decoded = bs58::decode(&token).into_vec().unwrap();
        assert_ne!(decoded, format!("{}\n{}", TX, EMAIL).into_bytes());
    }

    #[test]
    fn test_malformed_token_rejected() {
        // '0' is outside the base58 alphabet
        assert!(open("0000").is_err());
        assert!(open("").is_err());
    }

    #[test]
    fn test_tampered_token_never_opens_to_the_original() {
        let token = seal(TX, EMAIL);
        let mut tampered: Vec<char> = token.chars().collect();
        let first = tampered[0];
        tampered[0] = if first == '2' { '3' } else { '2' };
        let tampered: String = tampered.into_iter().collect();

        match open(&tampered) {
            Ok(receipt) => assert_ne!(receipt.transaction_id, TX),
            Err(_) => {}
        }
    }
}
