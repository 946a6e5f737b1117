use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::domain::{Credentials, Market, Registration, User};

use super::{ServiceError, ServiceResult};

pub struct AccountService;

impl AccountService {
    pub fn register(market: &mut Market, registration: Registration) -> ServiceResult<User> {
        let email = registration.email.trim().to_string();
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Name is required".into()));
        }
        Self::validate_email(&email)?;
        if registration.password.is_empty() {
            return Err(ServiceError::Invalid("Password is required".into()));
        }
        if market.user_by_email(&email).is_some() {
            return Err(ServiceError::Invalid(format!(
                "An account for `{}` already exists",
                email
            )));
        }
        let hash = hash_password(&registration.password)?;
        let user = User::new(name, email, hash);
        market.users.push(user.clone());
        market.touch();
        tracing::info!(user = %user.id, "account registered");
        Ok(user)
    }

    pub fn authenticate(market: &Market, credentials: &Credentials) -> ServiceResult<User> {
        let user = market
            .user_by_email(&credentials.email)
            .ok_or_else(invalid_credentials)?;
        if verify_password(&credentials.password, &user.password_hash) {
            tracing::info!(user = %user.id, "signed in");
            Ok(user.clone())
        } else {
            tracing::warn!(email = %credentials.email, "rejected sign-in");
            Err(invalid_credentials())
        }
    }

    fn validate_email(email: &str) -> ServiceResult<()> {
        let valid = email
            .split_once('@')
            .map_or(false, |(local, domain)| !local.is_empty() && !domain.is_empty());
        if valid {
            Ok(())
        } else {
            Err(ServiceError::Invalid(format!(
                "`{}` is not a valid email address",
                email
            )))
        }
    }
}

fn invalid_credentials() -> ServiceError {
    ServiceError::Invalid("Invalid credentials".into())
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Invalid(format!("Unable to hash password: {}", err)))
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Ana".into(),
            email: email.into(),
            password: "s3cret".into(),
        }
    }

    #[test]
    fn register_then_authenticate() {
        let mut market = Market::default();
        let user = AccountService::register(&mut market, registration("ana@example.com")).unwrap();
        assert_ne!(user.password_hash, "s3cret");

        let signed_in = AccountService::authenticate(
            &market,
            &Credentials {
                email: "ANA@example.com".into(),
                password: "s3cret".into(),
            },
        )
        .unwrap();
        assert_eq!(signed_in.id, user.id);
    }

    #[test]
    fn wrong_password_and_unknown_email_are_rejected_alike() {
        let mut market = Market::default();
        AccountService::register(&mut market, registration("ana@example.com")).unwrap();
        let wrong = AccountService::authenticate(
            &market,
            &Credentials {
                email: "ana@example.com".into(),
                password: "nope".into(),
            },
        )
        .unwrap_err();
        let unknown = AccountService::authenticate(
            &market,
            &Credentials {
                email: "bob@example.com".into(),
                password: "s3cret".into(),
            },
        )
        .unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn register_rejects_duplicates_and_bad_input() {
        let mut market = Market::default();
        AccountService::register(&mut market, registration("ana@example.com")).unwrap();
        assert!(AccountService::register(&mut market, registration("Ana@Example.com")).is_err());
        assert!(AccountService::register(&mut market, registration("not-an-email")).is_err());
        let mut nameless = registration("x@example.com");
        nameless.name = "  ".into();
        assert!(AccountService::register(&mut market, nameless).is_err());
        assert_eq!(market.users.len(), 1);
    }
}
