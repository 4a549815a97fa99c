//! Operator password hashes: Argon2id in PHC string form, salt included.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

pub const MIN_PASSWORD_LENGTH: usize = 12;

pub fn hash_password(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// `Ok(false)` on a mismatch. `Err` means `stored` is not a readable PHC string.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, HashError> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plain.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

/// Length is counted in characters.
pub fn validate_password_strength(plain: &str, min_length: usize) -> Result<(), String> {
    let length = plain.chars().count();
    if length < min_length {
        return Err(format!(
            "needs at least {min_length} characters, got {length}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_and_verifies() {
        let phc = hash_password("night-shift-operator").unwrap();

        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("night-shift-operator", &phc).unwrap());
        assert!(!verify_password("day-shift-operator", &phc).unwrap());
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let a = hash_password("night-shift-operator").unwrap();
        let b = hash_password("night-shift-operator").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "plain-text-in-the-column").is_err());
    }

    #[test]
    fn strength_is_counted_in_characters() {
        let msg = validate_password_strength("short", MIN_PASSWORD_LENGTH).unwrap_err();
        assert_eq!(msg, "needs at least 12 characters, got 5");

        assert!(validate_password_strength("twelve_chars", MIN_PASSWORD_LENGTH).is_ok());
        // 12 bytes, 6 characters.
        assert!(validate_password_strength("пароль", MIN_PASSWORD_LENGTH).is_err());
    }
}
