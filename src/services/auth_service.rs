use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    auth::JwtService,
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{LoginRequest, RegisterRequest, UpdateProfileRequest},
            response::{AuthResponse, RegisterResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self { users, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        request.validate()?;

        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
        let user = User::new(&request.username, &request.email, &password_hash);

        let user_id = self.users.insert(user).await?;
        log::info!("Registered user {}", request.username);

        Ok(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user_id.to_hex(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        // Unknown email and wrong password produce the same error so the
        // response does not reveal which credential failed.
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !bcrypt::verify(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let access_token = self.jwt_service.create_token(&user)?;

        Ok(AuthResponse {
            access_token,
            user: UserDto::from(user),
        })
    }

    pub async fn profile(&self, user_id: &str) -> AppResult<UserDto> {
        let user = self.find_user(user_id).await?;
        Ok(UserDto::from(user))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<UserDto> {
        request.validate()?;

        let id = parse_user_id(user_id)?;
        let mut user = self
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(username) = request.username {
            if username != user.username
                && self.users.find_by_username(&username).await?.is_some()
            {
                return Err(AppError::AlreadyExists("Username already taken".to_string()));
            }
            user.username = username;
        }

        if let Some(email) = request.email {
            if email != user.email && self.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::AlreadyExists("Email already registered".to_string()));
            }
            user.email = email;
        }

        self.users.update(&id, user.clone()).await?;
        Ok(UserDto::from(user))
    }

    async fn find_user(&self, user_id: &str) -> AppResult<User> {
        let id = parse_user_id(user_id)?;
        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn parse_user_id(user_id: &str) -> AppResult<ObjectId> {
    // The subject of a validated token is always an ObjectId hex string;
    // anything else means the token was minted for a different deployment.
    ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}
