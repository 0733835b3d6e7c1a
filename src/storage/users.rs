//! Local user directory.
//!
//! Passwords are stored as a salted SHA-256 digest, hex-encoded. The salt is a
//! random UUID per account.

use jiff::Timestamp;
use rusqlite::OptionalExtension;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    model::NewUser,
    services::{ServiceError, UserDirectory},
};

use super::{Result, Storage, StorageError};

impl UserDirectory for Storage {
    fn create_user(&self, user: &NewUser) -> core::result::Result<(), ServiceError> {
        let email = normalize_email(&user.email);
        if self.user_exists(&email)? {
            return Err(ServiceError::EmailTaken(email));
        }

        let salt = Uuid::new_v4().simple().to_string();
        self.conn
            .execute(
                "INSERT INTO users
                     (email, first_name, last_name, password_salt, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    email,
                    user.first_name.trim(),
                    user.last_name.trim(),
                    salt,
                    hash_password(&salt, &user.password),
                    Timestamp::now().to_string(),
                ],
            )
            .map_err(StorageError::from)?;
        tracing::info!(%email, "user registered");
        Ok(())
    }
}

impl Storage {
    /// Whether an account exists for `email` (compared case-insensitively).
    pub fn user_exists(&self, email: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE email = ?1",
                [normalize_email(email)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Checks a password against the stored digest.
    ///
    /// Unknown accounts verify as `false`.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        let row = self
            .conn
            .query_row(
                "SELECT password_salt, password_hash FROM users WHERE email = ?1",
                [normalize_email(email)],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row.is_some_and(|(salt, hash)| hash_password(&salt, password) == hash))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> NewUser {
        NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "Ada@Example.com".into(),
            password: "Engine#1843".into(),
        }
    }

    #[test]
    fn create_and_verify_user() {
        let storage = Storage::in_memory().unwrap();

        storage.create_user(&sample_user()).unwrap();

        assert!(storage.user_exists("ada@example.com").unwrap());
        assert!(storage.verify_password("ADA@example.com", "Engine#1843").unwrap());
        assert!(!storage.verify_password("ada@example.com", "wrong").unwrap());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let storage = Storage::in_memory().unwrap();
        storage.create_user(&sample_user()).unwrap();

        let err = storage.create_user(&sample_user()).unwrap_err();

        assert!(matches!(err, ServiceError::EmailTaken(e) if e == "ada@example.com"));
    }

    #[test]
    fn unknown_user_does_not_verify() {
        let storage = Storage::in_memory().unwrap();
        assert!(!storage.verify_password("nobody@example.com", "x").unwrap());
    }

    #[test]
    fn password_is_not_stored_in_plain_text() {
        let storage = Storage::in_memory().unwrap();
        storage.create_user(&sample_user()).unwrap();

        let hash: String = storage
            .conn
            .query_row("SELECT password_hash FROM users", [], |row| row.get(0))
            .unwrap();

        assert_eq!(hash.len(), 64);
        assert!(!hash.contains("Engine"));
    }
}
