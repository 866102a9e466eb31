use std::collections::HashSet;

use thiserror::Error;

/// Boxes offered by the reference deployment, in display order.
pub const DEFAULT_BOXES: [&str; 10] = [
    "Бокс 1 C195с",
    "Бокс 2 A185б",
    "Бокс 3",
    "Бокс 4",
    "Бокс 5",
    "Бокс 6",
    "Бокс 7",
    "Бокс 8",
    "Бокс 11 Sport",
    "Бокс 10 LUX",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("box catalog is empty")]
    Empty,
    #[error("box catalog contains a blank entry")]
    BlankEntry,
    #[error("box {0:?} is listed more than once")]
    Duplicate(String),
}

/// Ordered, duplicate-free list of rentable boxes. Fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxCatalog {
    boxes: Vec<String>,
}

impl BoxCatalog {
    pub fn new<I, T>(boxes: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let boxes: Vec<String> = boxes.into_iter().map(Into::into).collect();
        if boxes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(boxes.len());
        for id in &boxes {
            if id.trim().is_empty() {
                return Err(CatalogError::BlankEntry);
            }
            if !seen.insert(id.as_str()) {
                return Err(CatalogError::Duplicate(id.clone()));
            }
        }

        Ok(Self { boxes })
    }

    /// Parse a `;`-separated list such as `"Бокс 3; Бокс 4"`.
    pub fn parse(list: &str) -> Result<Self, CatalogError> {
        Self::new(list.split(';').map(str::trim))
    }

    pub fn boxes(&self) -> &[String] {
        &self.boxes
    }

}

impl Default for BoxCatalog {
    fn default() -> Self {
        Self {
            boxes: DEFAULT_BOXES.iter().map(|b| b.to_string()).collect(),
        }
    }
}
