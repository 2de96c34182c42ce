//! Nullable keys: deterministic key material.

use std::sync::Mutex;
use tessera_crypto::keypair_from_seed;
use tessera_types::KeyPair;

/// Hands out key pairs derived from consecutive seeds.
///
/// Two instances created with the same start produce the same keys in the
/// same order.
pub struct NullKeys {
    next: Mutex<u8>,
}

impl NullKeys {
    pub fn new(start: u8) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }

    pub fn next_keypair(&self) -> KeyPair {
        let mut next = self.next.lock().unwrap();
        let kp = keypair_from_seed(&[*next; 32]);
        *next = next.wrapping_add(1);
        kp
    }

    pub fn take(&self, n: usize) -> Vec<KeyPair> {
        (0..n).map(|_| self.next_keypair()).collect()
    }
}

impl Default for NullKeys {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_reproducible() {
        let a = NullKeys::default().take(3);
        let b = NullKeys::default().take(3);
        assert_eq!(a[2].public, b[2].public);
        assert_ne!(a[0].public, a[1].public);
    }
}
