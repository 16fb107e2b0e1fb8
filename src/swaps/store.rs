use serde_json::json;

use crate::{
    docs::{Collection, DocError, Docs, Filter, Scalar},
    skills::SkillRegistry,
};

use super::{Direction, Resolution, Swap, SwapForm, SwapRecord, SwapStatus};

/// Outcome of a status change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Applied,
    Missing,
    /// The swap was already accepted or rejected; nothing was written.
    AlreadyResolved(SwapStatus),
}

#[derive(Debug, Clone)]
pub struct SwapStore {
    docs: Docs,
    skills: SkillRegistry,
}

impl SwapStore {
    pub fn new(docs: Docs, skills: SkillRegistry) -> Self {
        Self { docs, skills }
    }

    pub async fn create(&self, form: SwapForm) -> Result<String, DocError> {
        self.skills
            .admit_all([form.offered_skill.as_str(), form.requested_skill.as_str()])
            .await?;

        let swap = Swap::pending(form);
        let id = self.docs.insert(Collection::Swaps, &swap).await?;

        tracing::info!(swap_id = %id, sender = %swap.sender_id, recipient = %swap.recipient_id, "swap requested");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Swap>, DocError> {
        self.docs.get_as(Collection::Swaps, id).await
    }

    pub async fn list(&self, user_id: &str, direction: Direction) -> Result<Vec<SwapRecord>, DocError> {
        Ok(self
            .docs
            .scan_as::<Swap>(Collection::Swaps, &[Filter::Eq(direction.field(), Scalar::Str(user_id))])
            .await?
            .into_iter()
            .map(|(id, swap)| SwapRecord { id, swap })
            .collect())
    }

    /// Move a pending swap to `resolution`. Resolved swaps stay as they are.
    pub async fn update_status(&self, id: &str, resolution: Resolution) -> Result<StatusChange, DocError> {
        let status = SwapStatus::from(resolution);
        let pending = [Filter::Eq("status", Scalar::Str(SwapStatus::Pending.as_str()))];

        if self
            .docs
            .merge_where(Collection::Swaps, id, &pending, &json!({ "status": status }))
            .await?
        {
            tracing::info!(swap_id = %id, %status, "swap resolved");
            return Ok(StatusChange::Applied);
        }

        Ok(match self.get(id).await? {
            Some(swap) => StatusChange::AlreadyResolved(swap.status),
            None => StatusChange::Missing,
        })
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DocError> {
        let deleted = self.docs.delete(Collection::Swaps, id).await?;
        if deleted {
            tracing::info!(swap_id = %id, "swap deleted");
        }

        Ok(deleted)
    }
}
