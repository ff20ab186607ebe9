//! Static book metadata.
//!
//! A [`Catalog`] is loaded once at startup and never mutated. Slot `i` of the
//! catalog becomes [`BookSlot`](crate::book::BookSlot) `i` in the scene.

use crate::error::CatalogError;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub binding: String,
    pub price: String,
    /// Pages in the printed book (shown in the info panel).
    pub printed_pages: u32,
    /// Number of preview pages rendered in the viewer.
    pub page_count: usize,
    pub cover: String,
    /// One image path per preview page, in page order.
    pub pages: Vec<String>,
    /// Spine/edge tint, linear RGB.
    #[serde(default = "default_spine")]
    pub spine_color: [f32; 3],
}

fn default_spine() -> [f32; 3] {
    [0.17, 0.17, 0.17]
}

impl CatalogEntry {
    pub fn page_path(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }
}

/// `images/book{n}-p{i}.jpg` for `i` in `1..=count`.
pub fn numbered_page_paths(book_number: usize, count: usize) -> Vec<String> {
    (1..=count)
        .map(|p| format!("images/book{book_number}-p{p}.jpg"))
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = FnvHashSet::default();
        for e in &entries {
            if !seen.insert(e.id) {
                return Err(CatalogError::DuplicateId(e.id));
            }
            if e.page_count == 0 {
                return Err(CatalogError::NoPages { id: e.id });
            }
            if e.pages.len() != e.page_count {
                return Err(CatalogError::PageCountMismatch {
                    id: e.id,
                    listed: e.pages.len(),
                    declared: e.page_count,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// The three books shipped with the shop.
    pub fn builtin() -> Self {
        let book = |n: usize, title: &str, description: &str, binding: &str, price: &str, printed: u32| {
            CatalogEntry {
                id: n as u32,
                title: title.to_string(),
                description: description.to_string(),
                binding: binding.to_string(),
                price: price.to_string(),
                printed_pages: printed,
                page_count: 10,
                cover: format!("images/book{n}-cover.jpg"),
                pages: numbered_page_paths(n, 10),
                spine_color: default_spine(),
            }
        };
        Self {
            entries: vec![
                book(
                    1,
                    "David Frisch - Thank You",
                    "A kaleidoscopic perspective.",
                    "A4 - Hardcover",
                    "€20",
                    172,
                ),
                book(
                    2,
                    "David Frisch - Impressions",
                    "Time keeps on slipping by.",
                    "A4 - Hardcover",
                    "€15",
                    126,
                ),
                book(
                    3,
                    "David L. & Vinzenz K. - Appalachia Roadtrip",
                    "Documenting a road trip through rural Appalachia.",
                    "A5 - Hardcover",
                    "€15",
                    336,
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&CatalogEntry> {
        self.entries.get(slot)
    }

    pub fn slot_of(&self, id: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
