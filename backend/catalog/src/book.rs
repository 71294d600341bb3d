use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::validation::{Fields, Report, ValidationError};

/// Keys a client may send when writing a book.
pub const ALLOWED_FIELDS: [&str; 7] = ["id", "title", "author", "year", "genre", "summary", "price"];

pub const VALID_GENRES: [&str; 10] = [
    "Science Fiction",
    "Classic",
    "Historical Fiction",
    "Fantasy",
    "Mystery",
    "Romance",
    "Thriller",
    "Non-Fiction",
    "Biography",
    "Other",
];

pub const CURRENCY: &str = "AUD";

pub const MIN_YEAR: i64 = 1000;
pub const MAX_PRICE: f64 = 10_000.0;

const PRICE_RANGE: &str = "Price must be a valid number between 0 and 10000";

static BOOK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub summary: String,
    pub price: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rejects keys outside [`ALLOWED_FIELDS`], and on update any attempt to send `id`.
pub fn validate_allowed_fields(data: &Fields, is_update: bool) -> Result<(), ValidationError> {
    let extra: Vec<String> = data
        .keys()
        .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    if !extra.is_empty() {
        return Err(ValidationError::ExtraFields(extra));
    }

    if is_update && data.contains_key("id") {
        return Err(ValidationError::ImmutableField("Book ID cannot be modified"));
    }

    Ok(())
}

/// Copy of `data` holding only allow-listed keys.
pub fn sanitize_input(data: &Fields) -> Fields {
    data.iter()
        .filter(|(key, _)| ALLOWED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Trimmed `id` a create request asks for, if it sent a usable one.
pub fn requested_id(data: &Fields) -> Option<String> {
    data.get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl Book {
    /// Builds a new book from a client payload.
    pub fn create(input: &Fields, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate_allowed_fields(input, false)?;

        Self::from_fields(&sanitize_input(input), now, now)
    }

    /// Patches this book with a client payload. The result is validated as a whole.
    pub fn apply(&self, input: &Fields, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate_allowed_fields(input, true)?;

        let mut merged = self.to_fields();
        merged.extend(sanitize_input(input));

        Self::from_fields(&merged, self.created_at, now)
    }

    pub fn to_fields(&self) -> Fields {
        let value = json!({
            "id": self.id,
            "title": self.title,
            "author": self.author,
            "year": self.year,
            "genre": self.genre,
            "summary": self.summary,
            "price": self.price,
        });

        match value {
            Value::Object(fields) => fields,
            _ => Fields::new(),
        }
    }

    fn from_fields(
        fields: &Fields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut report = Report::default();

        let id = report.required_text(fields.get("id"), "Book ID", "Book ID is required");
        if let Some(id) = &id {
            report.length(
                id,
                2,
                20,
                "Book ID must be at least 2 characters",
                "Book ID cannot exceed 20 characters",
            );
            if !BOOK_ID.is_match(id) {
                report.fail("Book ID can only contain letters, numbers, underscores, and hyphens");
            }
        }

        let title = report.required_text(fields.get("title"), "Title", "Title is required");
        if let Some(title) = &title {
            report.length(
                title,
                1,
                200,
                "Title must be at least 1 character",
                "Title cannot exceed 200 characters",
            );
        }

        let author = report.required_text(fields.get("author"), "Author", "Author is required");
        if let Some(author) = &author {
            report.length(
                author,
                2,
                100,
                "Author name must be at least 2 characters",
                "Author name cannot exceed 100 characters",
            );
        }

        let year = check_year(&mut report, fields.get("year"), updated_at);

        let genre = report.required_text(fields.get("genre"), "Genre", "Genre is required");
        if let Some(genre) = &genre {
            if !VALID_GENRES.contains(&genre.as_str()) {
                report.fail(format!("Genre must be one of: {}", VALID_GENRES.join(", ")));
            }
        }

        let summary = report.required_text(fields.get("summary"), "Summary", "Summary is required");
        if let Some(summary) = &summary {
            report.length(
                summary,
                10,
                2000,
                "Summary must be at least 10 characters",
                "Summary cannot exceed 2000 characters",
            );
        }

        let price = check_price(&mut report, fields.get("price"));

        report.finish()?;

        let (
            Some(id),
            Some(title),
            Some(author),
            Some(year),
            Some(genre),
            Some(summary),
            Some(price),
        ) = (id, title, author, year, genre, summary, price)
        else {
            return Err(ValidationError::Invalid(Vec::new()));
        };

        Ok(Self {
            id,
            title,
            author,
            year,
            genre,
            summary,
            price,
            currency: CURRENCY.to_string(),
            created_at,
            updated_at,
        })
    }
}

fn check_year(report: &mut Report, value: Option<&Value>, now: DateTime<Utc>) -> Option<i64> {
    let absent = matches!(value, None | Some(Value::Null))
        || matches!(value, Some(Value::String(s)) if s.trim().is_empty());
    if absent {
        report.fail("Publication year is required");
        return None;
    }

    let year = report.number(value, "Year must be a whole number")?;

    if year.fract() != 0.0 {
        report.fail("Year must be a whole number");
        return None;
    }

    let year = year as i64;
    if year < MIN_YEAR {
        report.fail("Year must be 1000 or later");
    } else if year > i64::from(now.year()) + 1 {
        report.fail("Year cannot be in the future");
    }

    Some(year)
}

fn check_price(report: &mut Report, value: Option<&Value>) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            report.fail(PRICE_RANGE);
            return None;
        }
    };

    let Some(text) = text else {
        report.fail("Price is required");
        return None;
    };

    match text.parse::<f64>() {
        Ok(price) if price.is_finite() && (0.0..=MAX_PRICE).contains(&price) => Some(text),
        _ => {
            report.fail(PRICE_RANGE);
            None
        }
    }
}
