use serde::{Deserialize, Serialize};

/// Static city reference entry from `GET /sehirler`. Not user-mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "kod")]
    pub code: String,
    #[serde(rename = "isim")]
    pub name: String,
}

impl City {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}
