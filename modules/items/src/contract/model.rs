use uuid::Uuid;

/// Pure item model (no serde). Every item belongs to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

/// Data for creating a new item. Deliberately carries no `owner_id`: the
/// owner is assigned by the service from the authenticated actor, never
/// taken from client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update data, exclude-unset style: `None` leaves a field
/// untouched; `description` is nullable, so `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}
