use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::AppResult;

/// The user-editable part of a profile, as sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    pub skills_offered: BTreeSet<String>,
    pub skills_wanted: BTreeSet<String>,
    /// e.g. "weekends", "evenings"
    pub availability: BTreeSet<String>,
    pub is_public: bool,
}

impl ProfileFields {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        if self.skills().any(|skill| skill.trim().is_empty()) {
            return Err("skill names must not be empty".into());
        }
        if self.availability.iter().any(|slot| slot.trim().is_empty()) {
            return Err("availability entries must not be empty".into());
        }

        Ok(())
    }

    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.skills_offered
            .iter()
            .chain(&self.skills_wanted)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProfileFields,
    /// Mean of received feedback, two decimals. Never written by clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}
