use uuid::Uuid;

/// Pure user model for inter-module communication (no serde).
///
/// `hashed_password` is the opaque argon2 string; it stays inside the
/// process and never reaches a REST DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
    pub hashed_password: String,
}

/// Data for creating a new user. `password` is the plaintext as received;
/// the domain service hashes it before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

impl NewUser {
    /// Creation shape for open self-registration: role flags at their
    /// defaults, only identity fields supplied by the client.
    pub fn registration(email: String, password: String, full_name: Option<String>) -> Self {
        Self {
            email,
            password,
            is_active: true,
            is_superuser: false,
            full_name,
        }
    }
}

/// Partial update data for a user, exclude-unset style: `None` means "leave
/// untouched". `full_name` is nullable, so it uses a second `Option` level:
/// `Some(None)` clears the name, `None` keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub full_name: Option<Option<String>>,
}
