// File: dudedirt-core/src/auth/mod.rs
//
// Registration, login, and profile edits. Registration appends the +500
// welcome bonus through the same ledger primitive every other credit uses.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use dudedirt_common::models::User;
use dudedirt_common::traits::repository_traits::UserRepository;

use crate::Error;
use crate::crypto;
use crate::services::rewards::RewardsLedger;

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    rewards: Arc<RewardsLedger>,
}

impl AuthManager {
    pub fn new(users: Arc<dyn UserRepository>, rewards: Arc<RewardsLedger>) -> Self {
        Self { users, rewards }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        for (field, value) in [
            ("username", &registration.username),
            ("email", &registration.email),
            ("password", &registration.password),
            ("full_name", &registration.full_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(field, format!("{} is required", field)));
            }
        }
        if !registration.email.contains('@') {
            return Err(Error::validation("email", "not a valid email address"));
        }

        if self.users.get_by_email(&registration.email).await?.is_some() {
            return Err(Error::validation("email", "Email already registered"));
        }
        if self
            .users
            .get_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(Error::validation("username", "Username already taken"));
        }

        let user = User {
            user_id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            password_hash: crypto::hash_password(&registration.password),
            full_name: registration.full_name,
            phone: registration.phone,
            address: registration.address,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;

        // Exactly once, at account creation.
        self.rewards.append_welcome_bonus(user.user_id).await?;

        info!("registered user '{}' ({})", user.username, user.user_id);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| Error::Auth("Invalid credentials".to_string()))?;

        if !crypto::verify_password(password, &user.password_hash) {
            return Err(Error::Auth("Invalid credentials".to_string()));
        }
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<User, Error> {
        if full_name.trim().is_empty() {
            return Err(Error::validation("full_name", "full_name is required"));
        }
        self.users
            .update_profile(user_id, full_name, phone, address)
            .await?;
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }
}
