use api_core::serde_util::double_option;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{NewUser, User, UserPatch};

/// REST DTO for user representation. Deliberately has no credential fields:
/// neither `password` nor `hashed_password` ever leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

/// REST DTO for privileged user creation (superuser only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserReq {
    pub email: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// REST DTO for open self-registration: no role flags accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// REST DTO for privileged partial update. `full_name` is nullable, so it
/// distinguishes "absent" from "explicit null".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateUserReq {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
}

/// REST DTO for self-service profile update: identity fields only.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateMeReq {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
}

/// REST DTO for the self-service password change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordReq {
    pub current_password: String,
    pub new_password: String,
}

/// REST DTO for user list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListDto {
    pub data: Vec<UserDto>,
    pub count: u64,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

/// Bearer token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
}

impl TokenDto {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

// Conversions between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            full_name: user.full_name,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
            is_active: req.is_active,
            is_superuser: req.is_superuser,
            full_name: req.full_name,
        }
    }
}

impl From<RegisterReq> for NewUser {
    fn from(req: RegisterReq) -> Self {
        NewUser::registration(req.email, req.password, req.full_name)
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
            is_active: req.is_active,
            is_superuser: req.is_superuser,
            full_name: req.full_name,
        }
    }
}

impl From<UpdateMeReq> for UserPatch {
    fn from(req: UpdateMeReq) -> Self {
        Self {
            email: req.email,
            full_name: req.full_name,
            ..Default::default()
        }
    }
}
