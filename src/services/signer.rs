//! Identity key material and request signing.
//!
//! Each identity is a secp256k1 key; outbound upstream requests are signed with an
//! EIP-191 personal message signature so the upstream can recover the identity address.

use alloy::signers::{local::PrivateKeySigner, SignerSync};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Identity;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("no key material for identity {0}")]
    UnknownIdentity(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

/// Produces signatures on behalf of an identity.
pub trait IdentitySigner: Send + Sync {
    /// Returns the hex encoded (`0x`-prefixed) signature of `message`.
    fn sign(&self, identity: &Identity, message: &[u8]) -> Result<String, SignerError>;
}

/// In-memory keystore mapping identity addresses to local signers.
#[derive(Clone, Default)]
pub struct Keystore {
    signers: HashMap<String, PrivateKeySigner>,
}

impl Keystore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a keystore from hex private keys (with or without `0x` prefix).
    pub fn from_private_keys<S: AsRef<str>>(keys: &[S]) -> Result<Self, SignerError> {
        let mut keystore = Self::new();
        for key in keys {
            let signer: PrivateKeySigner = key
                .as_ref()
                .trim()
                .parse()
                .map_err(|e| SignerError::InvalidKey(format!("{}", e)))?;
            keystore.insert(signer);
        }
        info!(identities = keystore.signers.len(), "Keystore loaded");
        Ok(keystore)
    }

    pub fn insert(&mut self, signer: PrivateKeySigner) -> Identity {
        let identity = Identity::new(signer.address().to_string());
        self.signers.insert(identity.normalized(), signer);
        identity
    }

    pub fn identities(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> = self
            .signers
            .values()
            .map(|s| Identity::new(s.address().to_string()))
            .collect();
        identities.sort_by_key(|i| i.normalized());
        identities
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl IdentitySigner for Keystore {
    fn sign(&self, identity: &Identity, message: &[u8]) -> Result<String, SignerError> {
        let signer = self
            .signers
            .get(&identity.normalized())
            .ok_or_else(|| SignerError::UnknownIdentity(identity.to_string()))?;

        let signature = signer
            .sign_message_sync(message)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        debug!(identity = %identity, len = message.len(), "Signed upstream request");
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
