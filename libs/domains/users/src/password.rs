use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use domain_geo::{ClassifiedError, ClassifiedResult};

/// Hash with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> ClassifiedResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(ClassifiedError::internal)
}

/// `Ok(false)` on mismatch; a malformed stored hash is an internal fault.
pub fn verify_password(password: &str, hash: &str) -> ClassifiedResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(ClassifiedError::internal)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_geo::ErrorKind;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_internal() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
