use serde::{Deserialize, Serialize};

/// One row of the remote list, rendered as a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Optional URL deciding what the card shows. The endpoint calls it `img`.
    #[serde(rename = "img", alias = "mediaRef", default)]
    pub media_ref: Option<String>,
}

impl Item {
    pub fn media_ref(&self) -> Option<&str> {
        self.media_ref.as_deref()
    }
}

/// Envelope returned by the list endpoint. Only `data` is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Vec<Item>,
}
