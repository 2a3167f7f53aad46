use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "Page::empty")]
    pub albums: Page<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    // upstream occasionally emits `null` in place of an item
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
}

impl<T> Page<T> {
    fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
