pub mod administrators;
pub mod appointments;
pub mod doctors;
pub mod slots;
pub mod users;

use serde::{Deserialize, Serialize};

/// Two-line postal address, stored as a JSON string column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

impl Address {
    pub fn from_column(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn to_column(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
