//! Catalog loading and normalization.
//!
//! Each raw source table is homogeneous in content type (one CSV of books,
//! one of movies). Loading tags every row with its type, rescales ratings
//! to the shared 0–10 domain, parses genre strings, and concatenates
//! everything into one canonical, immutable table. Records receive a
//! stable integer id at load time; that id — not the row position — is
//! what vectors are keyed by downstream.

pub mod matcher;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SugerirError};

pub use matcher::{TitleMatch, TitleMatcher};

/// Stable record identifier, assigned once at catalog load.
pub type RecordId = u32;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A book.
    Book,
    /// A movie.
    Movie,
}

impl ContentType {
    /// Lowercase label, as it appears in tag text and API responses.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Book => "book",
            ContentType::Movie => "movie",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical catalog entry.
///
/// `vote_average` is always on the 0–10 domain after loading;
/// `vote_count` is carried for downstream display but unused by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Stable id, unique within the catalog.
    pub id: RecordId,
    /// Primary lookup key. Duplicates across sources are possible; see
    /// [`Catalog::resolve_typed`].
    pub title: String,
    /// Author or director, when known.
    pub author: Option<String>,
    /// Synopsis text, when known.
    pub plot: Option<String>,
    /// Lowercased genre labels.
    pub genres: Vec<String>,
    /// Which source table the record came from.
    pub content_type: ContentType,
    /// Rating on the normalized 0–10 domain.
    pub vote_average: Option<f32>,
    /// Number of votes behind the rating.
    pub vote_count: Option<u32>,
}

impl ContentRecord {
    /// Create a record with the required fields; optional fields start
    /// absent.
    #[must_use]
    pub fn new(id: RecordId, title: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            plot: None,
            genres: Vec::new(),
            content_type,
            vote_average: None,
            vote_count: None,
        }
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the plot text.
    #[must_use]
    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = Some(plot.into());
        self
    }

    /// Set the genre list.
    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rating (already on the 0–10 domain).
    #[must_use]
    pub fn with_vote_average(mut self, vote_average: f32) -> Self {
        self.vote_average = Some(vote_average);
        self
    }

    /// Set the vote count.
    #[must_use]
    pub fn with_vote_count(mut self, vote_count: u32) -> Self {
        self.vote_count = Some(vote_count);
        self
    }
}

/// Rating domain of a raw source table.
///
/// Sources disagree on rating scale (books sites use 1–5 stars, movie
/// databases 0–10). Ratings are rescaled once, at load, to the shared
/// 0–10 domain and used consistently from then on.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::RatingScale;
///
/// assert_eq!(RatingScale::five_star().normalize(4.0), 8.0);
/// assert_eq!(RatingScale::ten_point().normalize(7.3), 7.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    max: f32,
}

impl RatingScale {
    /// A 1–5 star scale.
    #[must_use]
    pub fn five_star() -> Self {
        Self { max: 5.0 }
    }

    /// A 0–10 scale (already the canonical domain).
    #[must_use]
    pub fn ten_point() -> Self {
        Self { max: 10.0 }
    }

    /// Rescale a raw rating to the 0–10 domain, clamped.
    #[must_use]
    pub fn normalize(&self, raw: f32) -> f32 {
        (raw * (10.0 / self.max)).clamp(0.0, 10.0)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::ten_point()
    }
}

/// One raw source table: a CSV of records that are all the same type.
#[derive(Debug, Clone)]
pub struct SourceTable {
    path: PathBuf,
    content_type: ContentType,
    rating_scale: RatingScale,
}

impl SourceTable {
    /// Describe a source CSV holding records of `content_type`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content_type: ContentType) -> Self {
        Self {
            path: path.into(),
            content_type,
            rating_scale: RatingScale::default(),
        }
    }

    /// Declare the source's rating domain.
    #[must_use]
    pub fn with_rating_scale(mut self, rating_scale: RatingScale) -> Self {
        self.rating_scale = rating_scale;
        self
    }
}

/// Columns every source table must provide.
const REQUIRED_COLUMNS: [&str; 5] = ["Title", "Author", "Plot", "Genres", "Vote Average"];

/// Raw CSV row, before normalization.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Author")]
    author: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Genres")]
    genres: Option<String>,
    #[serde(rename = "Vote Average")]
    vote_average: Option<f32>,
    #[serde(rename = "Vote Count")]
    vote_count: Option<u32>,
}

/// The canonical content table: every source concatenated, typed, and
/// indexed by title.
///
/// The catalog is an owning service object: loaded once, passed by
/// reference to the rest of the pipeline, and never mutated by it.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ContentRecord>,
    index_by_id: HashMap<RecordId, usize>,
    title_index: HashMap<String, Vec<RecordId>>,
}

impl Catalog {
    /// Load and concatenate the given source tables.
    ///
    /// Record ids are assigned sequentially in read order, so a fixed set
    /// of sources always produces the same ids.
    ///
    /// # Errors
    ///
    /// [`SugerirError::DataLoad`] when a source file is missing or lacks a
    /// required column.
    pub fn load(sources: &[SourceTable]) -> Result<Self> {
        let mut records = Vec::new();
        let mut next_id: RecordId = 0;

        for source in sources {
            let loaded = read_source(source, &mut next_id)?;
            info!(
                path = %source.path.display(),
                content_type = %source.content_type,
                rows = loaded.len(),
                "loaded source table"
            );
            records.extend(loaded);
        }

        Ok(Self::from_records(records))
    }

    /// Build a catalog from already-normalized records (cache reload,
    /// tests). Ids are taken as given.
    #[must_use]
    pub fn from_records(records: Vec<ContentRecord>) -> Self {
        let mut index_by_id = HashMap::with_capacity(records.len());
        let mut title_index: HashMap<String, Vec<RecordId>> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            index_by_id.insert(record.id, position);
            title_index
                .entry(normalize_title(&record.title))
                .or_default()
                .push(record.id);
        }
        for ids in title_index.values_mut() {
            ids.sort_unstable();
        }

        Self {
            records,
            index_by_id,
            title_index,
        }
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&ContentRecord> {
        self.index_by_id
            .get(&id)
            .map(|&position| &self.records[position])
    }

    /// Resolve a title to a record id (exact, case-insensitive match).
    ///
    /// When several records share the title, the first-loaded (lowest id)
    /// record wins; use [`Catalog::resolve_typed`] to disambiguate.
    #[must_use]
    pub fn resolve(&self, title: &str) -> Option<RecordId> {
        self.title_index
            .get(&normalize_title(title))
            .and_then(|ids| ids.first().copied())
    }

    /// Resolve a title within one content type (composite-key lookup for
    /// duplicate titles).
    #[must_use]
    pub fn resolve_typed(&self, title: &str, content_type: ContentType) -> Option<RecordId> {
        self.title_index
            .get(&normalize_title(title))?
            .iter()
            .copied()
            .find(|&id| {
                self.get(id)
                    .is_some_and(|record| record.content_type == content_type)
            })
    }

    /// Resolve a title or fail with [`SugerirError::TitleNotFound`], for
    /// callers that treat an unknown title as fatal rather than as an
    /// empty result.
    pub fn resolve_strict(&self, title: &str) -> Result<RecordId> {
        self.resolve(title)
            .ok_or_else(|| SugerirError::title_not_found(title))
    }

    /// Every id sharing a normalized title, ascending.
    #[must_use]
    pub fn resolve_all(&self, title: &str) -> &[RecordId] {
        self.title_index
            .get(&normalize_title(title))
            .map_or(&[], Vec::as_slice)
    }
}

/// Canonical form used for title lookups.
fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn read_source(source: &SourceTable, next_id: &mut RecordId) -> Result<Vec<ContentRecord>> {
    let path: &Path = &source.path;
    if !path.exists() {
        return Err(SugerirError::data_load(format!(
            "source table not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| SugerirError::data_load(format!("{}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| SugerirError::data_load(format!("{}: {e}", path.display())))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SugerirError::data_load(format!(
                "{}: missing required column '{column}'",
                path.display()
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        let row = row.map_err(|e| SugerirError::data_load(format!("{}: {e}", path.display())))?;
        let record = ContentRecord {
            id: *next_id,
            title: row.title.trim().to_string(),
            author: non_empty(row.author),
            plot: non_empty(row.plot),
            genres: parse_genres(row.genres.as_deref()),
            content_type: source.content_type,
            vote_average: row.vote_average.map(|v| source.rating_scale.normalize(v)),
            vote_count: row.vote_count,
        };
        *next_id += 1;
        records.push(record);
    }

    Ok(records)
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a raw genre cell into a lowercase label list.
///
/// Accepts either a bracketed list-literal string (`"['Crime', 'Drama']"`,
/// recognized purely syntactically) or a `;`/`,`-delimited string. Null or
/// empty cells produce an empty list.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::parse_genres;
///
/// assert_eq!(
///     parse_genres(Some("['Crime', 'Drama']")),
///     vec!["crime", "drama"]
/// );
/// assert_eq!(
///     parse_genres(Some("Science Fiction; Adventure")),
///     vec!["science fiction", "adventure"]
/// );
/// assert!(parse_genres(None).is_empty());
/// ```
#[must_use]
pub fn parse_genres(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let items: Vec<&str> = if raw.starts_with('[') && raw.ends_with(']') {
        split_list_literal(&raw[1..raw.len() - 1])
    } else {
        raw.split([';', ',']).collect()
    };

    items
        .into_iter()
        .map(|item| item.trim().trim_matches(['\'', '"']).trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Split the inside of a list literal on commas outside quotes. This only
/// recognizes list syntax; nothing is ever evaluated.
fn split_list_literal(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (pos, c) in inner.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                items.push(&inner[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    items.push(&inner[start..]);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const BOOKS_CSV: &str = "\
Title,Author,Plot,Genres,Vote Average,Vote Count
Dune,Frank Herbert,Desert planet politics,\"['Science Fiction', 'Adventure']\",4.5,1000
Heat Wave,Richard Castle,A detective story,Crime; Mystery,3.0,50
";

    const MOVIES_CSV: &str = "\
Title,Author,Plot,Genres,Vote Average,Vote Count
Dune,Denis Villeneuve,Desert planet epic,\"['Science Fiction']\",8.1,5000
Heat,Michael Mann,Heist thriller in LA,\"Crime, Thriller\",8.3,60000
";

    fn sample_catalog() -> Catalog {
        let dir = tempfile::tempdir().unwrap();
        let books = write_csv(dir.path(), "books.csv", BOOKS_CSV);
        let movies = write_csv(dir.path(), "movies.csv", MOVIES_CSV);
        Catalog::load(&[
            SourceTable::new(books, ContentType::Book)
                .with_rating_scale(RatingScale::five_star()),
            SourceTable::new(movies, ContentType::Movie),
        ])
        .unwrap()
    }

    #[test]
    fn test_load_concatenates_and_types() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.records()[0].content_type, ContentType::Book);
        assert_eq!(catalog.records()[2].content_type, ContentType::Movie);
    }

    #[test]
    fn test_ids_sequential() {
        let catalog = sample_catalog();
        let ids: Vec<RecordId> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ratings_normalized_to_ten_point_domain() {
        let catalog = sample_catalog();
        // Book 4.5 of 5 stars -> 9.0
        assert_eq!(catalog.records()[0].vote_average, Some(9.0));
        // Movie scale passes through
        assert_eq!(catalog.records()[3].vote_average, Some(8.3));
    }

    #[test]
    fn test_genre_parsing_both_syntaxes() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.records()[0].genres,
            vec!["science fiction", "adventure"]
        );
        assert_eq!(catalog.records()[1].genres, vec!["crime", "mystery"]);
        assert_eq!(catalog.records()[3].genres, vec!["crime", "thriller"]);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve("heat"), Some(3));
        assert_eq!(catalog.resolve("HEAT"), Some(3));
        assert_eq!(catalog.resolve("no such title"), None);
    }

    #[test]
    fn test_duplicate_title_first_loaded_wins() {
        let catalog = sample_catalog();
        // "Dune" exists as book (id 0) and movie (id 2)
        assert_eq!(catalog.resolve("Dune"), Some(0));
        assert_eq!(catalog.resolve_all("Dune"), &[0, 2]);
    }

    #[test]
    fn test_resolve_typed_disambiguates() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve_typed("Dune", ContentType::Movie), Some(2));
        assert_eq!(catalog.resolve_typed("Dune", ContentType::Book), Some(0));
        assert_eq!(catalog.resolve_typed("Heat", ContentType::Book), None);
    }

    #[test]
    fn test_resolve_strict_error_names_the_title() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve_strict("Heat").unwrap(), 3);
        let err = catalog.resolve_strict("Missing Reel").unwrap_err();
        assert!(matches!(err, SugerirError::TitleNotFound { .. }));
        assert!(err.to_string().contains("Missing Reel"));
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = Catalog::load(&[SourceTable::new(
            "/nonexistent/books.csv",
            ContentType::Book,
        )])
        .unwrap_err();
        assert!(matches!(err, SugerirError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_column_is_data_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bad.csv",
            "Title,Author\nSomething,Someone\n",
        );
        let err = Catalog::load(&[SourceTable::new(path, ContentType::Book)]).unwrap_err();
        assert!(matches!(err, SugerirError::DataLoad { .. }));
        assert!(err.to_string().contains("Plot"));
    }

    #[test]
    fn test_empty_optional_fields_become_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "sparse.csv",
            "Title,Author,Plot,Genres,Vote Average,Vote Count\nBare,,,,,\n",
        );
        let catalog = Catalog::load(&[SourceTable::new(path, ContentType::Book)]).unwrap();
        let record = &catalog.records()[0];
        assert_eq!(record.author, None);
        assert_eq!(record.plot, None);
        assert!(record.genres.is_empty());
        assert_eq!(record.vote_average, None);
        assert_eq!(record.vote_count, None);
    }

    #[test]
    fn test_parse_genres_edge_cases() {
        assert!(parse_genres(Some("")).is_empty());
        assert!(parse_genres(Some("[]")).is_empty());
        assert_eq!(parse_genres(Some("Horror")), vec!["horror"]);
        assert_eq!(
            parse_genres(Some("[\"Children's Books, Humor\"]")),
            vec!["children's books, humor"]
        );
    }
}
