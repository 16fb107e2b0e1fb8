use serde_json::json;

use crate::docs::{Collection, DocError, Docs, Filter, Scalar};

use super::{mean_rating, Feedback, FeedbackForm};

/// Append-only feedback. Each insert refreshes the rated user's `rating`.
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    docs: Docs,
}

impl FeedbackStore {
    pub fn new(docs: Docs) -> Self {
        Self { docs }
    }

    /// Store the feedback and recompute the recipient's rating.
    ///
    /// Returns `false`, storing nothing, when `to_user` has no profile.
    pub async fn submit(&self, form: FeedbackForm) -> Result<bool, DocError> {
        if self.docs.get(Collection::Users, &form.to_user).await?.is_none() {
            return Ok(false);
        }

        let feedback = Feedback::from(form);
        let id = self.docs.insert(Collection::Feedback, &feedback).await?;
        tracing::info!(feedback_id = %id, to_user = %feedback.to_user, rating = feedback.rating, "feedback submitted");

        self.recompute_rating(&feedback.to_user).await?;
        Ok(true)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Feedback>, DocError> {
        Ok(self
            .docs
            .scan_as::<Feedback>(Collection::Feedback, &[Filter::Eq("to_user", Scalar::Str(user_id))])
            .await?
            .into_iter()
            .map(|(_, feedback)| feedback)
            .collect())
    }

    /// Re-read every rating of `user_id` and write their rounded mean to the
    /// profile. With no feedback at all, the profile is left untouched.
    pub async fn recompute_rating(&self, user_id: &str) -> Result<Option<f64>, DocError> {
        let ratings: Vec<f64> = self
            .list_for_user(user_id)
            .await?
            .iter()
            .map(|feedback| feedback.rating)
            .collect();

        let Some(rating) = mean_rating(&ratings) else {
            return Ok(None);
        };
        self.docs
            .merge(Collection::Users, user_id, &json!({ "rating": rating }))
            .await?;

        tracing::debug!(%user_id, rating, count = ratings.len(), "rating recomputed");
        Ok(Some(rating))
    }
}
