//! Per-book JSON files
//!
//! Each book is written to `{NN}_{english_name}.json` in the output directory,
//! where `NN` is the book number zero-padded to two digits. Existing files are
//! overwritten in place.

use crate::model::BookRecord;
use crate::ScrapeError;
use std::path::{Path, PathBuf};

/// Width the book number is padded to in file names
const BOOK_NUMBER_WIDTH: usize = 2;

/// Computes the output file name for a book
///
/// # Example
///
/// ```
/// use hadith_scrape::model::BookRecord;
/// use hadith_scrape::output::book_filename;
///
/// let book = BookRecord::new("https://sunnah.com/ahmad", "3", "Chapters", "أبواب");
/// assert_eq!(book_filename(&book), "03_Chapters.json");
/// ```
pub fn book_filename(book: &BookRecord) -> String {
    format!(
        "{}_{}.json",
        zero_pad(&book.book_number, BOOK_NUMBER_WIDTH),
        sanitize_title(&book.english_name)
    )
}

/// Writes `book` as one compact JSON document into `dir`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(ScrapeError)` - Serialization or write failed
pub fn persist_book(dir: &Path, book: &BookRecord) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(book_filename(book));
    tracing::info!("Saving book data to file: {}...", path.display());

    let json = serde_json::to_vec(book)?;
    std::fs::write(&path, json).map_err(|source| ScrapeError::Persist {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Book data saved to file: {}.", path.display());
    Ok(path)
}

/// Left-pads with zeros to `width` characters, keeping a leading sign first
fn zero_pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let zeros = "0".repeat(width - len);
    match value.strip_prefix(['+', '-']) {
        Some(rest) => format!("{}{}{}", &value[..1], zeros, rest),
        None => format!("{}{}", zeros, value),
    }
}

/// Keeps the title inside the output directory
fn sanitize_title(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HadithRecord, HadithReference};
    use tempfile::TempDir;

    fn create_test_book() -> BookRecord {
        let mut book = BookRecord::new("https://sunnah.com/ahmad", "3", "Chapters", "أبواب");
        let mut hadith = HadithRecord::new(
            "Narrated Anas".to_string(),
            "حدثنا أنس".to_string(),
            HadithReference {
                reference: "Musnad Ahmad 12".to_string(),
                book_reference: Some("Book 3".to_string()),
                hadith_number: Some("Hadith 12".to_string()),
            },
        );
        hadith.english_embeddings = Some(vec![0.1, 0.2, 0.3]);
        hadith.arabic_embeddings = None;
        book.hadith_data = Some(vec![hadith]);
        book
    }

    #[test]
    fn test_book_filename() {
        let book = BookRecord::new("https://sunnah.com/ahmad", "3", "Chapters", "أبواب");
        assert_eq!(book_filename(&book), "03_Chapters.json");

        let wide = BookRecord::new("https://sunnah.com/ahmad", "114", "Musnad of Women", "");
        assert_eq!(book_filename(&wide), "114_Musnad of Women.json");
    }

    #[test]
    fn test_zero_pad() {
        assert_eq!(zero_pad("3", 2), "03");
        assert_eq!(zero_pad("10", 2), "10");
        assert_eq!(zero_pad("", 2), "00");
        assert_eq!(zero_pad("-3", 3), "-03");
        assert_eq!(zero_pad("-3", 2), "-3");
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Wudu/Ablution"), "Wudu-Ablution");
        assert_eq!(sanitize_title("Plain"), "Plain");
    }

    #[test]
    fn test_persist_book_writes_json() {
        let dir = TempDir::new().unwrap();
        let book = create_test_book();

        let path = persist_book(dir.path(), &book).unwrap();

        assert_eq!(path, dir.path().join("03_Chapters.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        let back: BookRecord = serde_json::from_str(&content).unwrap();
        assert_eq!(back, book);

        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(raw["hadith_data"][0]["arabic_embeddings"].is_null());
    }

    #[test]
    fn test_persist_twice_is_identical() {
        let dir = TempDir::new().unwrap();
        let book = create_test_book();

        let first_path = persist_book(dir.path(), &book).unwrap();
        let first = std::fs::read(&first_path).unwrap();
        let second_path = persist_book(dir.path(), &book).unwrap();
        let second = std::fs::read(&second_path).unwrap();

        assert_eq!(first_path, second_path);
        assert_eq!(first, second);
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("03_Chapters.json");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();

        let book = BookRecord::new("https://sunnah.com/ahmad", "3", "Chapters", "أبواب");
        persist_book(dir.path(), &book).unwrap();

        let back: BookRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = persist_book(&missing, &create_test_book()).unwrap_err();
        assert!(matches!(err, ScrapeError::Persist { .. }));
    }
}
