use serde::{Deserialize, Serialize};

/// Plain-message response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pagination window query parameters with the API-wide defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 100);

        let q: PageQuery = serde_json::from_str(r#"{"skip": 5, "limit": 2}"#).unwrap();
        assert_eq!(q.skip, 5);
        assert_eq!(q.limit, 2);
    }

    #[test]
    fn message_serializes_flat() {
        let json = serde_json::to_string(&Message::new("Item deleted successfully")).unwrap();
        assert_eq!(json, r#"{"message":"Item deleted successfully"}"#);
    }
}
