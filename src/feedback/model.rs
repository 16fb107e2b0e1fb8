use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AppResult;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    pub swap_id: String,
    pub from_user: String,
    pub to_user: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackForm {
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("swap_id", &self.swap_id),
            ("from_user", &self.from_user),
            ("to_user", &self.to_user),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be empty").into());
            }
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!("rating must be between {MIN_RATING:.1} and {MAX_RATING:.1}").into());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub swap_id: String,
    pub from_user: String,
    pub to_user: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FeedbackForm> for Feedback {
    fn from(form: FeedbackForm) -> Self {
        let FeedbackForm { swap_id, from_user, to_user, rating, comment } = form;
        Feedback {
            swap_id,
            from_user,
            to_user,
            rating,
            comment,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Arithmetic mean rounded to two decimals, `None` for no ratings.
pub fn mean_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
