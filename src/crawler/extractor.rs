//! Structural extraction of books and hadiths
//!
//! The selectors follow sunnah.com markup:
//! - index page: `.book_title` containers holding `.title_number`,
//!   `.english_book_name` and `.arabic_book_name`
//! - book page: `.actualHadithContainer` containers holding `.text_details`,
//!   `.arabic_hadith_full` and `.hadith_reference`
//!
//! Any missing sub-element is an error; nothing here is optional.

use crate::model::{BookRecord, HadithRecord, HadithReference};
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

pub const BOOK_CONTAINER: &str = "book_title";
pub const BOOK_NUMBER: &str = "title_number";
pub const BOOK_ENGLISH_NAME: &str = "english_book_name";
pub const BOOK_ARABIC_NAME: &str = "arabic_book_name";

pub const HADITH_CONTAINER: &str = "actualHadithContainer";
pub const HADITH_ENGLISH: &str = "text_details";
pub const HADITH_ARABIC: &str = "arabic_hadith_full";
pub const HADITH_REFERENCE: &str = "hadith_reference";

const IN_BOOK_MARKER: &str = "In-book reference:";
const REFERENCE_LABEL: &str = "Reference:";
const CITATION_SUFFIX: &str = "USC-MSA";

/// Extracts the book listing from a collection index page
///
/// # Arguments
///
/// * `document` - The parsed index page
/// * `base_url` - Collection URL used to derive each book link
///
/// # Returns
///
/// Books in document order, without hadiths attached
///
/// # Example
///
/// ```
/// use hadith_scrape::crawler::extract_books;
/// use scraper::Html;
///
/// let html = r#"<div class="book_title">
///     <div class="title_number">1</div>
///     <div class="english_book_name">Revelation</div>
///     <div class="arabic_book_name">كتاب بدء الوحى</div>
/// </div>"#;
/// let books = extract_books(&Html::parse_document(html), "https://sunnah.com/bukhari").unwrap();
/// assert_eq!(books[0].book_link, "https://sunnah.com/bukhari/1");
/// ```
pub fn extract_books(document: &Html, base_url: &str) -> Result<Vec<BookRecord>, ExtractError> {
    let container_selector = class_selector(BOOK_CONTAINER)?;
    let number_selector = class_selector(BOOK_NUMBER)?;
    let english_selector = class_selector(BOOK_ENGLISH_NAME)?;
    let arabic_selector = class_selector(BOOK_ARABIC_NAME)?;

    let mut books = Vec::new();

    for (index, container) in document.select(&container_selector).enumerate() {
        let number = child_text(container, &number_selector, BOOK_CONTAINER, BOOK_NUMBER, index)?;
        let english = child_text(
            container,
            &english_selector,
            BOOK_CONTAINER,
            BOOK_ENGLISH_NAME,
            index,
        )?;
        let arabic = child_text(
            container,
            &arabic_selector,
            BOOK_CONTAINER,
            BOOK_ARABIC_NAME,
            index,
        )?;

        books.push(BookRecord::new(base_url, number, english, arabic));
    }

    Ok(books)
}

/// Extracts all hadiths from a book page
///
/// Embeddings are left unset; the pipeline attaches them afterwards.
pub fn extract_hadiths(document: &Html) -> Result<Vec<HadithRecord>, ExtractError> {
    let container_selector = class_selector(HADITH_CONTAINER)?;
    let english_selector = class_selector(HADITH_ENGLISH)?;
    let arabic_selector = class_selector(HADITH_ARABIC)?;
    let reference_selector = class_selector(HADITH_REFERENCE)?;

    let mut hadiths = Vec::new();

    for (index, container) in document.select(&container_selector).enumerate() {
        let english = child_text(
            container,
            &english_selector,
            HADITH_CONTAINER,
            HADITH_ENGLISH,
            index,
        )?;
        let arabic = child_text(
            container,
            &arabic_selector,
            HADITH_CONTAINER,
            HADITH_ARABIC,
            index,
        )?;
        let raw_reference = child_text(
            container,
            &reference_selector,
            HADITH_CONTAINER,
            HADITH_REFERENCE,
            index,
        )?;

        let reference = parse_reference(&raw_reference)?;
        hadiths.push(HadithRecord::new(english, arabic, reference));
    }

    Ok(hadiths)
}

/// Splits a combined reference field into its parts
///
/// `"Reference: X In-book reference: Y, Z USC-MSA ..."` becomes
/// `reference = X`, `book_reference = Y`, `hadith_number = Z`.
/// Without the in-book marker only `reference` is set.
///
/// # Errors
///
/// `ExtractError::MalformedReference` when the in-book part has fewer than
/// two comma-separated segments.
pub fn parse_reference(raw: &str) -> Result<HadithReference, ExtractError> {
    let (primary, in_book) = match raw.split_once(IN_BOOK_MARKER) {
        Some((primary, rest)) => (primary, Some(rest)),
        None => (raw, None),
    };

    let reference = primary.trim().replace(REFERENCE_LABEL, "").trim().to_string();

    let (book_reference, hadith_number) = match in_book {
        Some(rest) => {
            // Only the first two segments matter; later ones belong to the
            // citation suffix.
            let mut segments = rest.trim().split(',');
            let book_reference = segments.next().map(str::trim);
            let number = segments
                .next()
                .ok_or_else(|| ExtractError::MalformedReference(raw.to_string()))?;
            let number = number
                .trim()
                .split(CITATION_SUFFIX)
                .next()
                .unwrap_or_default()
                .trim();

            (book_reference.map(str::to_string), Some(number.to_string()))
        }
        None => (None, None),
    };

    Ok(HadithReference {
        reference,
        book_reference,
        hadith_number,
    })
}

/// Builds a selector matching a single CSS class
fn class_selector(class: &str) -> Result<Selector, ExtractError> {
    Selector::parse(&format!(".{}", class))
        .map_err(|e| ExtractError::Selector(format!("{class}: {e:?}")))
}

/// Finds the first descendant matching `selector` and returns its text
fn child_text(
    container: ElementRef<'_>,
    selector: &Selector,
    container_class: &'static str,
    class: &'static str,
    index: usize,
) -> Result<String, ExtractError> {
    container
        .select(selector)
        .next()
        .map(stripped_text)
        .ok_or(ExtractError::MissingElement {
            container: container_class,
            class,
            index,
        })
}

/// Concatenates every trimmed, non-empty text node below `element`
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
