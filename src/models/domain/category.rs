use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub label: String,
}

impl Category {
    pub fn new(id: i64, label: &str) -> Self {
        Category {
            id,
            label: label.to_string(),
        }
    }
}
