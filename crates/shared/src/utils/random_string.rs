use anyhow::Result;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

const CHARACTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Alphanumeric string seeded from the OS CSPRNG. At 32 characters the
/// 62-symbol alphabet gives ~190 bits, comfortably above the 128-bit
/// floor required for verification tokens.
pub fn generate_random_string(length: usize) -> Result<String> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    let mut rng = StdRng::from_seed(seed);

    let s = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARACTERS.len());
            CHARACTERS[idx] as char
        })
        .collect();

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let token = generate_random_string(32).unwrap();
        assert_eq!(token.len(), 32);
    }

    #[test]
    fn stays_inside_the_alphabet() {
        let token = generate_random_string(256).unwrap();
        assert!(token.bytes().all(|b| CHARACTERS.contains(&b)));
    }

    #[test]
    fn consecutive_tokens_differ() {
        let a = generate_random_string(32).unwrap();
        let b = generate_random_string(32).unwrap();
        assert_ne!(a, b);
    }
}
