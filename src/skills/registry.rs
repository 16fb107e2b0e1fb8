use serde_json::json;

use crate::docs::{Collection, DocError, Docs};

/// The set of skill names ever referenced, stored as bare document ids.
#[derive(Debug, Clone)]
pub struct SkillRegistry {
    docs: Docs,
}

fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}

impl SkillRegistry {
    pub fn new(docs: Docs) -> Self {
        Self { docs }
    }

    /// Every registered name starting with `prefix` (case-insensitive).
    /// Scans the whole registry.
    pub async fn suggest(&self, prefix: &str) -> Result<Vec<String>, DocError> {
        let prefix = prefix.to_lowercase();

        Ok(self
            .docs
            .scan(Collection::Skills, &[])
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name.starts_with(&prefix))
            .collect())
    }

    /// Register `name` unless already present. Blank names are ignored.
    pub async fn admit(&self, name: &str) -> Result<(), DocError> {
        let name = canonical(name);
        if name.is_empty() {
            return Ok(());
        }

        if self.docs.get(Collection::Skills, &name).await?.is_none() {
            self.docs.set(Collection::Skills, &name, &json!({})).await?;
            tracing::debug!(skill = %name, "new skill");
        }

        Ok(())
    }

    pub async fn admit_all<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DocError> {
        for name in names {
            self.admit(name).await?;
        }

        Ok(())
    }
}
