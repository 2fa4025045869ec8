//! Book and hadith records
//!
//! These are the shapes written to the per-book JSON files. Field order is the
//! key order of the output documents.

use serde::{Deserialize, Serialize};

/// One book of a collection, as listed on the collection index page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// `base_url/book_number`
    pub book_link: String,

    /// Book number as printed on the index page (not normalized)
    pub book_number: String,

    pub english_name: String,

    pub arabic_name: String,

    /// Filled in by the pipeline once the book page has been scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hadith_data: Option<Vec<HadithRecord>>,
}

/// A single bilingual hadith with its references and embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HadithRecord {
    pub english: String,

    pub arabic: String,

    /// Primary reference, label removed
    pub reference: String,

    /// First segment of the in-book reference, e.g. `Book 1`
    pub book_reference: Option<String>,

    /// Second segment of the in-book reference, e.g. `Hadith 7`
    pub hadith_number: Option<String>,

    #[serde(default)]
    pub english_embeddings: Option<Vec<f32>>,

    #[serde(default)]
    pub arabic_embeddings: Option<Vec<f32>>,
}

/// The three parts of a hadith's combined reference field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HadithReference {
    pub reference: String,
    pub book_reference: Option<String>,
    pub hadith_number: Option<String>,
}

impl BookRecord {
    /// Creates a book entry whose link is derived from the collection URL
    pub fn new(
        base_url: &str,
        book_number: impl Into<String>,
        english_name: impl Into<String>,
        arabic_name: impl Into<String>,
    ) -> Self {
        let book_number = book_number.into();
        Self {
            book_link: format!("{}/{}", base_url, book_number),
            book_number,
            english_name: english_name.into(),
            arabic_name: arabic_name.into(),
            hadith_data: None,
        }
    }

    /// Number of attached hadiths (0 before the book page is scraped)
    pub fn hadith_count(&self) -> usize {
        self.hadith_data.as_ref().map_or(0, Vec::len)
    }
}

impl HadithRecord {
    /// Creates a hadith without embeddings
    pub fn new(english: String, arabic: String, reference: HadithReference) -> Self {
        Self {
            english,
            arabic,
            reference: reference.reference,
            book_reference: reference.book_reference,
            hadith_number: reference.hadith_number,
            english_embeddings: None,
            arabic_embeddings: None,
        }
    }
}
