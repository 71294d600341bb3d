use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::IntoResponse,
};
use catalog::{
    BOOKS, Book, CURRENCY,
    book::{requested_id, validate_allowed_fields},
    pricing::{PricingError, apply_discount, calculate_average_price, calculate_total_price},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    database::StoreError,
    error::AppError,
    response::Envelope,
    state::AppState,
    utils::{get_fields, parse_number},
};

async fn all_books(state: &AppState) -> Result<Vec<Book>, AppError> {
    let mut books: Vec<Book> = state.store.list(BOOKS).await?;
    books.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    Ok(books)
}

pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let books = all_books(&state).await?;

    Ok(Envelope::ok(books, "Books retrieved successfully"))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book: Book = state
        .store
        .get(BOOKS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Envelope::ok(book, "Book retrieved successfully"))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let fields = get_fields(body)?;
    validate_allowed_fields(&fields, false)?;

    if let Some(id) = requested_id(&fields) {
        if state.store.exists(BOOKS, &id).await? {
            return Err(duplicate(&id));
        }
    }

    let book = Book::create(&fields, Utc::now())?;

    state
        .store
        .insert_new(BOOKS, &book.id, &book)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate { id, .. } => duplicate(&id),
            other => other.into(),
        })?;

    info!("Book created: {}", book.id);

    Ok(Envelope::created(book, "Book created successfully"))
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let fields = get_fields(body)?;
    validate_allowed_fields(&fields, true)?;

    let existing: Book = state
        .store
        .get(BOOKS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ID '{id}' not found")))?;

    let updated = existing.apply(&fields, Utc::now())?;
    state.store.put(BOOKS, &updated.id, &updated).await?;

    info!("Book updated: {}", updated.id);

    Ok(Envelope::ok(updated, "Book updated successfully"))
}

fn duplicate(id: &str) -> AppError {
    AppError::Conflict(format!("Book with ID '{id}' already exists"))
}

#[derive(Deserialize)]
pub struct PricingQuery {
    discount: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    pub count: usize,
    pub currency: &'static str,
    pub total_price: f64,
    pub average_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_total: Option<f64>,
}

pub async fn book_pricing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PricingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let discount = query
        .discount
        .map(|raw| parse_number(&raw).ok_or(PricingError::InvalidDiscount))
        .transpose()?;

    let books = all_books(&state).await?;
    let total_price = calculate_total_price(&books);

    let discounted_total = discount
        .map(|percent| apply_discount(total_price, percent))
        .transpose()?;

    let summary = PricingSummary {
        count: books.len(),
        currency: CURRENCY,
        total_price,
        average_price: calculate_average_price(&books),
        discount_percent: discount,
        discounted_total,
    };

    Ok(Envelope::ok(summary, "Book pricing calculated successfully"))
}
