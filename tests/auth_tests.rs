use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};

use portfolio_backend::auth;
use portfolio_backend::config::AuthConfig;

const SECRET: &[u8] = b"test-secret";

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        admin_emails: vec!["admin@example.com".to_string(), "other@example.com".to_string()],
        admin_password_hash: String::new(),
        token_secret: "test-secret".to_string(),
        token_ttl_hours: 24,
    }
}

#[test]
fn test_sign_verify_round_trip() {
    let token = auth::sign("admin@example.com", SECRET, 1).unwrap();
    let claims = auth::verify(&token, SECRET).unwrap();
    assert_eq!(claims.sub, "admin@example.com");
}

#[test]
fn test_verify_rejects_wrong_secret() {
    let token = auth::sign("admin@example.com", SECRET, 1).unwrap();
    assert!(auth::verify(&token, b"another-secret").is_err());
}

#[test]
fn test_verify_rejects_expired_token() {
    // Issued with an expiry one day in the past
    let token = auth::sign("admin@example.com", SECRET, -24).unwrap();
    assert!(auth::verify(&token, SECRET).is_err());
}

#[test]
fn test_verify_rejects_tampered_token() {
    let token = auth::sign("admin@example.com", SECRET, 1).unwrap();
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');
    assert!(auth::verify(&tampered, SECRET).is_err());

    assert!(auth::verify("not-a-token", SECRET).is_err());
}

#[test]
fn test_password_verification() {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(b"correct horse", &salt)
        .unwrap()
        .to_string();

    assert!(auth::verify_password("correct horse", &hash).unwrap());
    assert!(!auth::verify_password("wrong horse", &hash).unwrap());
}

#[test]
fn test_verify_password_rejects_malformed_hash() {
    assert!(auth::verify_password("anything", "not-a-phc-hash").is_err());
}

#[test]
fn test_allow_list_membership() {
    let config = test_auth_config();

    assert!(config.is_admin("admin@example.com"));
    assert!(config.is_admin("Admin@Example.COM")); // case-insensitive
    assert!(config.is_admin("  admin@example.com  ")); // tolerant of padding
    assert!(!config.is_admin("intruder@example.com"));
    assert!(!config.is_admin(""));
}
