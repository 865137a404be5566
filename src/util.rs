//! Shared utility functions

use std::sync::atomic::{AtomicU64, Ordering};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

static CODE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a human-readable reservation code.
///
/// Millisecond timestamp plus a process-wide monotonic sequence plus a
/// short random suffix. Any two sequential calls in the same process
/// differ in the sequence component; uniqueness against the store is not
/// re-verified before insert — a collision surfaces as a
/// unique-constraint failure and is answered as a retryable conflict.
pub fn generate_reservation_code() -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    let millis = chrono::Utc::now().timestamp_millis();
    let seq = CODE_SEQ.fetch_add(1, Ordering::Relaxed) % 10_000;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("RES-{millis}{seq:04}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("secret123", "not-a-phc-string"));
    }

    #[test]
    fn test_code_format() {
        let code = generate_reservation_code();
        assert!(code.starts_with("RES-"));
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!parts[2].chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_code_uniqueness() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_reservation_code()));
        }
    }
}
