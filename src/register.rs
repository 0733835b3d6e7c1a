//! Account registration: inline field checks, then the user directory.

use std::fmt;

use crate::{
    model::NewUser,
    services::{ServiceError, UserDirectory},
    session::Session,
    storage::StorageError,
};

const MIN_PASSWORD_LEN: usize = 8;

/// A registration field that failed validation, with the message shown next
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<FieldIssue>),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checks every field and returns all problems at once.
pub fn validate(user: &NewUser) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();
    let mut flag = |field, message| issues.push(FieldIssue { field, message });

    if user.first_name.trim().is_empty() {
        flag("first name", "required");
    }
    if user.last_name.trim().is_empty() {
        flag("last name", "required");
    }
    if !is_valid_email(user.email.trim()) {
        flag("email", "enter a valid email address");
    }

    let password = &user.password;
    if password.chars().count() < MIN_PASSWORD_LEN {
        flag("password", "must be at least 8 characters");
    }
    if !password.chars().any(char::is_uppercase) {
        flag("password", "must contain an uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        flag("password", "must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        flag("password", "must contain a number");
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        flag("password", "must contain a symbol");
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

/// Validates the user, creates the account and signs them in.
pub fn register(
    directory: &dyn UserDirectory,
    session: &mut Session<'_>,
    user: &NewUser,
) -> Result<(), RegistrationError> {
    validate(user).map_err(RegistrationError::Invalid)?;
    directory.create_user(user)?;
    session.login(&user.email)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::Storage;

    fn user(email: &str, password: &str) -> NewUser {
        NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn messages(issues: &[FieldIssue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.message).collect()
    }

    #[test]
    fn valid_user_passes() {
        assert!(validate(&user("ada@example.com", "Engine#1843")).is_ok());
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut u = user("not-an-email", "short");
        u.first_name = " ".into();

        let issues = validate(&u).unwrap_err();

        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            ["first name", "email", "password", "password", "password", "password"]
        );
        assert_eq!(
            messages(&issues[2..]),
            [
                "must be at least 8 characters",
                "must contain an uppercase letter",
                "must contain a number",
                "must contain a symbol",
            ]
        );
    }

    #[test]
    fn email_shapes() {
        for good in ["a@b.co", "first.last@mail.example.org"] {
            assert!(is_valid_email(good), "{good}");
        }
        for bad in ["", "@b.co", "a@", "a@b", "a@b.c", "a@@b.co", "a b@c.de", "a@.co"] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn register_creates_account_and_logs_in() {
        let storage = Storage::in_memory().unwrap();
        let mut session = Session::load(&storage).unwrap();

        register(&storage, &mut session, &user("ada@example.com", "Engine#1843")).unwrap();

        assert!(storage.user_exists("ada@example.com").unwrap());
        assert_eq!(session.user(), Some("ada@example.com"));
    }

    #[test]
    fn invalid_user_is_not_created() {
        let storage = Storage::in_memory().unwrap();
        let mut session = Session::load(&storage).unwrap();

        let err = register(&storage, &mut session, &user("bad", "Engine#1843")).unwrap_err();

        assert!(matches!(err, RegistrationError::Invalid(_)));
        assert!(!storage.user_exists("bad").unwrap());
        assert_eq!(session.user(), None);
    }

    #[test]
    fn duplicate_email_is_surfaced() {
        let storage = Storage::in_memory().unwrap();
        let mut session = Session::load(&storage).unwrap();
        let u = user("ada@example.com", "Engine#1843");
        register(&storage, &mut session, &u).unwrap();

        let err = register(&storage, &mut session, &u).unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::Service(ServiceError::EmailTaken(_))
        ));
    }
}
