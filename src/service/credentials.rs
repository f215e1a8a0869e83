use crate::error::IdealizaError;
use bcrypt::BcryptError;
use tracing::warn;

/// One-way password hashing with the salt embedded in the output.
pub trait CredentialHasher: Send + Sync {
    /// Hash `plaintext` with a freshly generated salt.
    fn hash(&self, plaintext: &str) -> Result<Vec<u8>, IdealizaError>;

    /// `true` only when `plaintext` produces `hash`. Never errors on a mismatch.
    fn verify(&self, plaintext: &str, hash: &[u8]) -> bool;
}

/// bcrypt hasher. Output is the `$2b$<cost>$<salt><digest>` string as bytes.
///
/// bcrypt only reads the first 72 bytes of input; longer passwords are
/// rejected instead of being silently truncated.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<Vec<u8>, IdealizaError> {
        match bcrypt::non_truncating_hash(plaintext, self.cost) {
            Ok(hash) => Ok(hash.into_bytes()),
            Err(BcryptError::Truncation(_)) => Err(IdealizaError::PasswordTooLong),
            Err(e) => Err(e.into()),
        }
    }

    fn verify(&self, plaintext: &str, hash: &[u8]) -> bool {
        let Ok(hash) = std::str::from_utf8(hash) else {
            warn!("stored password hash is not valid utf-8");
            return false;
        };
        match bcrypt::non_truncating_verify(plaintext, hash) {
            Ok(matches) => matches,
            // no stored hash can come from an over-long password
            Err(BcryptError::Truncation(_)) => false,
            Err(e) => {
                warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }
}
