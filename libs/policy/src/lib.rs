//! Authorization guards over already-loaded data.
//!
//! Every function here is a pure predicate: the caller loads the resource and
//! the acting identity first, then invokes a guard before mutating anything.
//! Guards never touch storage, so a failed check can never leave partial
//! side effects behind.

use thiserror::Error;
use uuid::Uuid;

/// Minimal view of an identity: something with an id.
pub trait HasId {
    fn id(&self) -> Uuid;
}

/// Minimal view of an identity that may hold the superuser role.
pub trait HasSuperuser: HasId {
    fn is_superuser(&self) -> bool;
}

/// How a failed guard should be reported to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyKind {
    Forbidden,
    BadRequest,
}

/// A policy violation, carrying the caller-selected report kind and message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PolicyError {
    pub kind: DenyKind,
    pub message: String,
}

impl PolicyError {
    fn new(kind: DenyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Caller-selectable failure shape for [`require_owner_or_superuser`].
///
/// The default is a `Forbidden` denial; some flows deliberately report an
/// ownership failure as a client error instead, so both the kind and the
/// message stay overridable.
#[derive(Debug, Clone)]
pub struct Deny {
    pub kind: DenyKind,
    pub message: String,
}

impl Default for Deny {
    fn default() -> Self {
        Self {
            kind: DenyKind::Forbidden,
            message: "Not enough permissions".to_string(),
        }
    }
}

impl Deny {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: DenyKind::BadRequest,
            message: message.into(),
        }
    }
}

/// Succeeds iff the actor is a superuser or owns the resource.
pub fn require_owner_or_superuser<A: HasSuperuser>(
    resource_owner_id: Uuid,
    actor: &A,
    deny: Deny,
) -> Result<(), PolicyError> {
    if actor.is_superuser() || actor.id() == resource_owner_id {
        Ok(())
    } else {
        Err(PolicyError::new(deny.kind, deny.message))
    }
}

/// Succeeds iff the actor is a superuser.
pub fn require_superuser<A: HasSuperuser>(actor: &A) -> Result<(), PolicyError> {
    if actor.is_superuser() {
        Ok(())
    } else {
        Err(PolicyError::new(
            DenyKind::Forbidden,
            "The user doesn't have enough privileges",
        ))
    }
}

/// Blocks self-targeting actions (e.g. a superuser deleting their own account).
pub fn require_not_self<A: HasId>(
    target_id: Uuid,
    actor: &A,
    message: &str,
) -> Result<(), PolicyError> {
    if target_id == actor.id() {
        Err(PolicyError::new(DenyKind::Forbidden, message))
    } else {
        Ok(())
    }
}

/// Gates flows that require an active account.
pub fn require_active(is_active: bool) -> Result<(), PolicyError> {
    if is_active {
        Ok(())
    } else {
        Err(PolicyError::new(DenyKind::BadRequest, "Inactive user"))
    }
}
