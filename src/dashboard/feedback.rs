//! Feedback Capture
//!
//! A star rating plus free text. Submitted records are appended to the
//! `feedbacks` list in the key/value store and never read back by the
//! dashboard itself.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::store::{JsonStoreExt, KeyValueStore, StoreError, FEEDBACKS_KEY};

/// Highest selectable star rating
pub const MAX_RATING: u8 = 5;

/// A submitted rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user: String,
    pub feedback: String,
    pub rating: u8,
    pub timestamp: String,
}

impl FeedbackRecord {
    /// Stamp a record with the current UTC time
    pub fn new(user: impl Into<String>, feedback: impl Into<String>, rating: u8) -> Self {
        Self {
            user: user.into(),
            feedback: feedback.into(),
            rating,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Text or rating missing; nothing was stored
    #[error("Please provide feedback and rating")]
    MissingInput,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Append-only feedback list stored under `feedbacks`
pub struct FeedbackLog<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for FeedbackLog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> FeedbackLog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn append(&self, record: &FeedbackRecord) -> FeedbackResult<()> {
        let mut records = self.list()?;
        records.push(record.clone());
        self.store.set_json(FEEDBACKS_KEY, &records)?;
        tracing::debug!(user = %record.user, rating = record.rating, total = records.len(), "Feedback stored");
        Ok(())
    }

    /// All records in submission order
    pub fn list(&self) -> FeedbackResult<Vec<FeedbackRecord>> {
        Ok(self.store.get_json(FEEDBACKS_KEY)?.unwrap_or_default())
    }
}

/// Feedback form input state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    text: String,
    rating: u8,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Click on the star at 0-based `index`
    pub fn select_star(&mut self, index: usize) -> FeedbackResult<u8> {
        let rating = index
            .checked_add(1)
            .and_then(|r| u8::try_from(r).ok())
            .unwrap_or(u8::MAX);
        self.set_rating(rating)?;
        Ok(rating)
    }

    /// Set the rating directly; 0 clears it
    pub fn set_rating(&mut self, rating: u8) -> FeedbackResult<()> {
        if rating > MAX_RATING {
            return Err(FeedbackError::InvalidRating(rating));
        }
        self.rating = rating;
        Ok(())
    }

    /// Active state of each of the five stars
    pub fn stars(&self) -> [bool; MAX_RATING as usize] {
        let mut stars = [false; MAX_RATING as usize];
        for (i, star) in stars.iter_mut().enumerate() {
            *star = i < self.rating as usize;
        }
        stars
    }

    /// Append the current input as `user`'s feedback and reset the form.
    ///
    /// Empty text or a zero rating fails without touching the store.
    pub fn submit<S: KeyValueStore + ?Sized>(
        &mut self,
        user: &str,
        log: &FeedbackLog<S>,
    ) -> FeedbackResult<FeedbackRecord> {
        if self.text.is_empty() || self.rating == 0 {
            return Err(FeedbackError::MissingInput);
        }

        let record = FeedbackRecord::new(user, self.text.clone(), self.rating);
        log.append(&record)?;

        self.text.clear();
        self.rating = 0;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn log() -> (Arc<MemoryStore>, FeedbackLog<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Arc::clone(&store), FeedbackLog::new(store))
    }

    #[test]
    fn test_submit_appends_and_resets() {
        let (_store, log) = log();
        let mut form = FeedbackForm::new();
        form.set_text("Great eco route!");
        form.set_rating(3).unwrap();

        let record = form.submit("asha@gmail.com", &log).unwrap();
        assert_eq!(record.rating, 3);
        assert_eq!(record.user, "asha@gmail.com");
        assert_eq!(form.rating(), 0);
        assert_eq!(form.text(), "");

        let records = log.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rating, 3);
        assert_eq!(records[0].feedback, "Great eco route!");
    }

    #[test]
    fn test_zero_rating_appends_nothing() {
        let (store, log) = log();
        let mut form = FeedbackForm::new();
        form.set_text("No stars given");

        let err = form.submit("asha@gmail.com", &log).unwrap_err();
        assert!(matches!(err, FeedbackError::MissingInput));
        assert_eq!(err.to_string(), "Please provide feedback and rating");
        assert!(store.is_empty());
        assert_eq!(form.text(), "No stars given");
    }

    #[test]
    fn test_empty_text_appends_nothing() {
        let (store, log) = log();
        let mut form = FeedbackForm::new();
        form.set_rating(4).unwrap();

        assert!(form.submit("asha@gmail.com", &log).is_err());
        assert!(store.is_empty());
        assert_eq!(form.rating(), 4);
    }

    #[test]
    fn test_records_keep_order() {
        let (_store, log) = log();
        let mut form = FeedbackForm::new();

        for rating in 1..=3 {
            form.set_text(format!("ride {}", rating));
            form.set_rating(rating).unwrap();
            form.submit("asha@gmail.com", &log).unwrap();
        }

        let ratings: Vec<u8> = log.list().unwrap().iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![1, 2, 3]);
    }

    #[test]
    fn test_star_selection() {
        let mut form = FeedbackForm::new();
        assert_eq!(form.select_star(2).unwrap(), 3);
        assert_eq!(form.stars(), [true, true, true, false, false]);

        assert!(matches!(form.select_star(5), Err(FeedbackError::InvalidRating(6))));
        assert!(matches!(
            form.select_star(usize::MAX),
            Err(FeedbackError::InvalidRating(u8::MAX))
        ));
        assert_eq!(form.rating(), 3);
    }

    #[test]
    fn test_timestamp_is_rfc3339_millis() {
        let record = FeedbackRecord::new("a@gmail.com", "ok", 5);
        assert!(record.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }
}
