use crate::{
    docs::{Collection, DocError, Docs, Filter, Scalar},
    skills::SkillRegistry,
};

use super::{ProfileFields, UserProfile};

#[derive(Debug, Clone)]
pub struct ProfileStore {
    docs: Docs,
    skills: SkillRegistry,
}

impl ProfileStore {
    pub fn new(docs: Docs, skills: SkillRegistry) -> Self {
        Self { docs, skills }
    }

    pub async fn create(&self, fields: ProfileFields) -> Result<String, DocError> {
        self.skills.admit_all(fields.skills()).await?;

        let id = Docs::new_id();
        let profile = UserProfile {
            id: id.clone(),
            fields,
            rating: None,
        };
        self.docs.set(Collection::Users, &id, &profile).await?;

        tracing::info!(user_id = %id, "profile created");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserProfile>, DocError> {
        self.docs.get_as(Collection::Users, id).await
    }

    /// Overwrite the editable fields of an existing profile, keeping `id` and
    /// `rating`. Optional fields left out of `fields` are cleared.
    ///
    /// Returns `false` when there is no such profile.
    pub async fn update(&self, id: &str, fields: ProfileFields) -> Result<bool, DocError> {
        if !self.docs.merge(Collection::Users, id, &fields).await? {
            return Ok(false);
        }
        self.skills.admit_all(fields.skills()).await?;

        tracing::info!(user_id = %id, "profile updated");
        Ok(true)
    }

    /// Public profiles, narrowed to those offering `skill` and/or available
    /// at `availability` when given.
    pub async fn search(
        &self,
        skill: Option<&str>,
        availability: Option<&str>,
    ) -> Result<Vec<UserProfile>, DocError> {
        let mut filters = vec![Filter::Eq("is_public", Scalar::Bool(true))];
        if let Some(skill) = skill {
            filters.push(Filter::Contains("skills_offered", skill));
        }
        if let Some(availability) = availability {
            filters.push(Filter::Contains("availability", availability));
        }

        Ok(self
            .docs
            .scan_as::<UserProfile>(Collection::Users, &filters)
            .await?
            .into_iter()
            .map(|(_, profile)| profile)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn store() -> ProfileStore {
        let docs = Docs::in_memory().await.unwrap();
        ProfileStore::new(docs.clone(), SkillRegistry::new(docs))
    }

    fn fields(name: &str, offered: &[&str], availability: &[&str], is_public: bool) -> ProfileFields {
        serde_json::from_value(json!({
            "name": name,
            "location": "Lisbon",
            "skills_offered": offered,
            "skills_wanted": ["Welding"],
            "availability": availability,
            "is_public": is_public,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = store().await;
        let ada = fields("Ada", &["cooking"], &["weekends"], true);

        let id = store.create(ada.clone()).await.unwrap();
        let profile = store.get(&id).await.unwrap().unwrap();

        assert_eq!(profile.id, id);
        assert_eq!(profile.fields, ada);
        assert_eq!(profile.rating, None);
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_rating_and_admits_skills() {
        let store = store().await;
        let id = store.create(fields("Ada", &["cooking"], &[], true)).await.unwrap();
        store
            .docs
            .merge(Collection::Users, &id, &json!({"rating": 4.5}))
            .await
            .unwrap();

        let mut changed = fields("Ada L.", &["Baking"], &["evenings"], false);
        changed.location = None;
        assert!(store.update(&id, changed.clone()).await.unwrap());

        let profile = store.get(&id).await.unwrap().unwrap();
        assert_eq!(profile.fields, changed);
        assert_eq!(profile.rating, Some(4.5));
        assert_eq!(store.skills.suggest("bak").await.unwrap(), ["baking"]);

        assert!(!store.update("nobody", changed).await.unwrap());
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_only_returns_public_matches() {
        let store = store().await;
        let a = store.create(fields("A", &["cooking"], &["weekends"], true)).await.unwrap();
        let b = store.create(fields("B", &["painting"], &["evenings"], true)).await.unwrap();
        let _hidden = store.create(fields("C", &["cooking"], &["weekends"], false)).await.unwrap();

        let ids = |profiles: Vec<UserProfile>| {
            let mut ids: Vec<String> = profiles.into_iter().map(|p| p.id).collect();
            ids.sort();
            ids
        };

        assert_eq!(ids(store.search(Some("cooking"), None).await.unwrap()), [a.clone()]);
        assert_eq!(ids(store.search(None, Some("evenings")).await.unwrap()), [b.clone()]);
        assert!(store.search(Some("cooking"), Some("evenings")).await.unwrap().is_empty());

        let mut everyone = vec![a, b];
        everyone.sort();
        assert_eq!(ids(store.search(None, None).await.unwrap()), everyone);
    }
}
