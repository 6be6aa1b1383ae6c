use crate::{
    error::{AllocationError, GenerationError},
    store::LinkStore,
};
use rand::{rngs::OsRng, RngCore};

/// Characters a short code is drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Path segments owned by static routes. A code equal to one of these could
/// never be resolved, so the allocator treats it as taken.
pub const RESERVED_CODES: &[&str] = &["shorten", "health"];

// Largest multiple of ALPHABET.len() that fits in a byte (62 * 4). Bytes at or
// above it are discarded so every character is equally likely.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Generate a random alphanumeric string of exactly `length` characters
/// using the operating system's CSPRNG.
pub fn generate(length: usize) -> Result<String, GenerationError> {
    generate_with(&mut OsRng, length)
}

/// Same as [`generate`] but draws from the supplied random source.
pub fn generate_with<R: RngCore + ?Sized>(
    rng: &mut R,
    length: usize,
) -> Result<String, GenerationError> {
    let mut code = String::with_capacity(length);
    let mut buf = [0u8; 32];

    while code.len() < length {
        rng.try_fill_bytes(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if code.len() == length {
                break;
            }
            code.push(ALPHABET[b as usize % ALPHABET.len()] as char);
        }
    }

    Ok(code)
}

/// Generate a `length`-character code that is neither stored in `store` nor
/// reserved. Gives up with [`AllocationError::Exhausted`] after
/// `max_attempts` collisions.
pub fn generate_unique(
    store: &LinkStore,
    length: usize,
    max_attempts: u32,
) -> Result<String, AllocationError> {
    for attempt in 1..=max_attempts {
        let candidate = generate(length)?;
        if !is_reserved(&candidate) && !store.exists(&candidate) {
            return Ok(candidate);
        }
        tracing::warn!(attempt, "Short code collision on '{}'", candidate);
    }

    Err(AllocationError::Exhausted {
        attempts: max_attempts,
    })
}

pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Random source whose every read fails.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!()
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!()
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!()
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    /// Random source that only ever yields one byte value.
    struct ConstRng(u8);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn alphabet_has_62_unique_characters() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(ALPHABET.len(), 62);
        assert_eq!(unique.len(), 62);
        assert!(ALPHABET.iter().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generates_exact_length_from_alphabet() {
        for length in [1, 6, 7, 31, 32, 33, 100] {
            let code = generate(length).unwrap();
            assert_eq!(code.chars().count(), length);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn zero_length_is_empty() {
        assert_eq!(generate(0).unwrap(), "");
    }

    #[test]
    fn random_source_failure_is_reported() {
        let err = generate_with(&mut BrokenRng, 6).unwrap_err();
        assert!(err.to_string().contains("entropy source unavailable"));
    }

    #[test]
    fn bytes_map_onto_alphabet_positions() {
        assert_eq!(generate_with(&mut ConstRng(0), 3).unwrap(), "aaa");
        assert_eq!(generate_with(&mut ConstRng(61), 2).unwrap(), "99");
        assert_eq!(generate_with(&mut ConstRng(62 + 26), 2).unwrap(), "AA");
        assert_eq!(generate_with(&mut ConstRng(ACCEPT_BELOW - 1), 1).unwrap(), "9");
    }

    #[test]
    fn codes_are_not_repeated() {
        let mut codes = HashSet::new();
        for _ in 0..1000 {
            assert!(codes.insert(generate(6).unwrap()), "Generated duplicate code");
        }
    }

    #[test]
    fn unique_code_skips_existing_entries() {
        let store = LinkStore::new();
        for &c in &ALPHABET[1..] {
            store.put((c as char).to_string(), "https://example.com");
        }

        // Only "a" is free.
        let code = generate_unique(&store, 1, 5000).unwrap();
        assert_eq!(code, "a");
    }

    #[test]
    fn full_keyspace_is_exhausted() {
        let store = LinkStore::new();
        for &c in ALPHABET {
            store.put((c as char).to_string(), "https://example.com");
        }

        let err = generate_unique(&store, 1, 5).unwrap_err();
        assert!(matches!(err, AllocationError::Exhausted { attempts: 5 }));
    }

    #[test]
    fn zero_attempts_never_allocates() {
        let err = generate_unique(&LinkStore::new(), 6, 0).unwrap_err();
        assert!(matches!(err, AllocationError::Exhausted { attempts: 0 }));
    }

    #[test]
    fn route_names_are_reserved() {
        assert!(is_reserved("shorten"));
        assert!(is_reserved("health"));
        assert!(!is_reserved("abc123"));
    }
}
