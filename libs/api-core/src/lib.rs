//! HTTP-facing plumbing shared by all modules: the wire error shape, common
//! response/query types, the authenticated-actor extractor, and the opaque
//! credential/token collaborators.

pub mod actor;
pub mod error;
pub mod response;
pub mod security;
pub mod serde_util;

pub use actor::{Actor, CurrentUser};
pub use error::ApiError;
pub use response::{Message, PageQuery};
pub use security::{Argon2Hasher, CredentialHasher, JwtSigner, TokenSigner};
