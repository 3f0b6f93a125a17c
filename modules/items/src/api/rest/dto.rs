use api_core::serde_util::double_option;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{Item, ItemPatch, NewItem};

/// REST DTO for item representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

/// REST DTO for item creation. No `owner_id`: the owner is the actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemReq {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// REST DTO for partial item update. `description` is nullable, so it
/// distinguishes "absent" from "explicit null".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateItemReq {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// REST DTO for item list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListDto {
    pub data: Vec<ItemDto>,
    pub count: u64,
}

// Conversions between REST DTOs and contract models

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
        }
    }
}

impl From<CreateItemReq> for NewItem {
    fn from(req: CreateItemReq) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

impl From<UpdateItemReq> for ItemPatch {
    fn from(req: UpdateItemReq) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}
