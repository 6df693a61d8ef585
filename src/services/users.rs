use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::auth::hash_password;
use super::{non_blank, parse_enum, require_text};
use crate::dto::{CreateUserRequest, UpdateUserRequest, UserDto};
use crate::entities::user::{self, Model as UserModel, UserRole, UserStatus};
use crate::errors::ServiceError;
use crate::repositories::UserRepository;

/// Colours handed out to users who do not pick one.
pub const AVATAR_PALETTE: [&str; 6] = [
    "#5B8DEF", "#5ECFB1", "#F5A864", "#F56565", "#9F7AEA", "#48BB78",
];

/// Picks a palette colour using `rng`.
pub fn pick_avatar_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AVATAR_PALETTE
        .choose(rng)
        .copied()
        .unwrap_or(AVATAR_PALETTE[0])
}

/// User management. Users are never physically deleted.
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserDto>, ServiceError> {
        Ok(self
            .users
            .find_all()
            .await?
            .into_iter()
            .map(UserDto::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i32) -> Result<UserDto, ServiceError> {
        Ok(self.load(id).await?.into())
    }

    /// Fails with `Conflict` before touching storage when the username or
    /// email is taken.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUserRequest) -> Result<UserDto, ServiceError> {
        let username = require_text("username", &input.username)?;
        let email = require_text("email", &input.email)?;
        let full_name = require_text("fullName", &input.full_name)?;
        if input.password.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "password is required".to_string(),
            ));
        }
        input.validate()?;

        let role = match non_blank(input.role) {
            Some(raw) => parse_enum::<UserRole>("role", &raw)?,
            None => UserRole::Member,
        };

        if self.users.exists_by_username(&username).await? {
            return Err(ServiceError::Conflict(format!(
                "Username {} already exists",
                username
            )));
        }
        if self.users.exists_by_email(&email).await? {
            return Err(ServiceError::Conflict(format!(
                "Email {} already exists",
                email
            )));
        }

        let avatar_color = non_blank(input.avatar_color)
            .unwrap_or_else(|| pick_avatar_color(&mut rand::thread_rng()).to_string());
        let now = Utc::now();
        let user = self
            .users
            .save(user::ActiveModel {
                username: Set(username),
                email: Set(email),
                password_hash: Set(hash_password(&input.password)?),
                full_name: Set(full_name),
                role: Set(role),
                status: Set(UserStatus::Active),
                avatar_color: Set(Some(avatar_color)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await?;

        info!(user_id = user.id, "User created");
        Ok(user.into())
    }

    /// Applies only the supplied fields; the password is rehashed only when a
    /// non-empty one is given.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: i32,
        input: UpdateUserRequest,
    ) -> Result<UserDto, ServiceError> {
        input.validate()?;
        let user = self.load(id).await?;
        let mut active = user.clone().into_active_model();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(require_text("fullName", &full_name)?);
        }
        if let Some(email) = input.email {
            let email = require_text("email", &email)?;
            if email != user.email {
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != id {
                        return Err(ServiceError::Conflict(format!(
                            "Email {} already exists",
                            email
                        )));
                    }
                }
                active.email = Set(email);
            }
        }
        if let Some(role) = non_blank(input.role) {
            active.role = Set(parse_enum::<UserRole>("role", &role)?);
        }
        if let Some(status) = non_blank(input.status) {
            active.status = Set(parse_enum::<UserStatus>("status", &status)?);
        }
        if let Some(color) = non_blank(input.avatar_color) {
            active.avatar_color = Set(Some(color));
        }
        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            active.password_hash = Set(hash_password(&password)?);
        }
        active.updated_at = Set(Utc::now());

        let user = self.users.save(active).await?;
        info!(user_id = id, "User updated");
        Ok(user.into())
    }

    /// Marks the user INACTIVE; the row stays.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: i32) -> Result<UserDto, ServiceError> {
        let user = self.set_status(id, UserStatus::Inactive).await?;
        info!(user_id = id, "User deactivated");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn activate_user(&self, id: i32) -> Result<UserDto, ServiceError> {
        let user = self.set_status(id, UserStatus::Active).await?;
        info!(user_id = id, "User activated");
        Ok(user.into())
    }

    async fn set_status(&self, id: i32, status: UserStatus) -> Result<UserModel, ServiceError> {
        let mut active = self.load(id).await?.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        self.users.save(active).await
    }

    async fn load(&self, id: i32) -> Result<UserModel, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picked_colour_is_from_the_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let color = pick_avatar_color(&mut rng);
            assert!(AVATAR_PALETTE.contains(&color));
        }
    }

    #[test]
    fn same_seed_gives_same_colour() {
        let a = pick_avatar_color(&mut StdRng::seed_from_u64(42));
        let b = pick_avatar_color(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn every_palette_colour_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_avatar_color(&mut rng));
        }
        assert_eq!(seen.len(), AVATAR_PALETTE.len());
    }
}
