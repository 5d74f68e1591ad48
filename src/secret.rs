//! Per-device secret derivation.
//!
//! Secrets are PBKDF2-HMAC-SHA256 over the external device identifier with an
//! application-wide salt, hex encoded. The same configuration always yields
//! the same secret for the same identifier.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::config::SecurityConfig;

#[derive(Debug, Clone)]
pub struct SecretDeriver {
    salt: String,
    iterations: u32,
    key_length: usize,
}

impl SecretDeriver {
    #[must_use]
    pub fn new(salt: impl Into<String>, iterations: u32, key_length: usize) -> Self {
        Self {
            salt: salt.into(),
            iterations,
            key_length,
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.device_secret_salt.clone(),
            config.pbkdf2_iterations,
            config.device_secret_length,
        )
    }

    /// Length of the encoded secret in characters.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        self.key_length * 2
    }

    /// Derives the secret for `device_id`.
    ///
    /// CPU-bound; async callers should run it through `spawn_blocking`.
    #[must_use]
    pub fn derive(&self, device_id: &str) -> String {
        let mut key = vec![0u8; self.key_length];
        pbkdf2_hmac::<Sha256>(
            device_id.as_bytes(),
            self.salt.as_bytes(),
            self.iterations,
            &mut key,
        );
        hex::encode(key)
    }
}

impl Default for SecretDeriver {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // RFC 7914 section 11
        let deriver = SecretDeriver::new("salt", 1, 64);
        assert_eq!(
            deriver.derive("passwd"),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc\
             49ca9cccf179b645991664b39d77ef317c71b845b1e30bd509112041d3a19783"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let deriver = SecretDeriver::new("tvhub", 1000, 32);
        let first = deriver.derive("living-room-tv");
        let second = deriver.derive("living-room-tv");
        assert_eq!(first, second);
        assert_eq!(first.len(), deriver.encoded_len());
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_inputs() {
        let deriver = SecretDeriver::new("tvhub", 1000, 32);
        assert_ne!(deriver.derive("device-a"), deriver.derive("device-b"));

        let other_salt = SecretDeriver::new("other", 1000, 32);
        assert_ne!(deriver.derive("device-a"), other_salt.derive("device-a"));
    }
}
