//! Process-lifetime reference data cache.
//!
//! Categories (with their sub-category lists), projects, and cities are
//! loaded once and shared; the form coordinator re-runs its derivations
//! against the cache on every relevant field change, so a cache refresh is
//! immediately visible to open forms. Derivations are pure functions of the
//! cache contents.

use std::collections::HashMap;

use ekos_api_client::ApiClient;
use ekos_core::constants::{CATEGORY_SUB_CATEGORIES, CITIES};
use ekos_core::error::AppError;
use ekos_core::models::{Category, City, Project};

#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    categories: Vec<Category>,
    sub_categories: HashMap<String, Vec<String>>,
    projects: Vec<Project>,
    cities: Vec<City>,
}

impl ReferenceCache {
    /// Load all reference lists concurrently.
    ///
    /// The legacy standalone category→sub-category endpoint is merged into
    /// the map built from the embedded lists, last write winning on key
    /// collision. Its absence (older/newer backend generations) is not an
    /// error.
    pub async fn load(client: &ApiClient) -> Result<Self, AppError> {
        let (categories, legacy_map, projects, cities) = tokio::try_join!(
            client.list_categories(),
            async {
                Ok::<_, AppError>(client.legacy_sub_category_map().await.unwrap_or_default())
            },
            client.list_projects(),
            client.list_cities(),
        )?;
        Ok(Self::from_parts(categories, legacy_map, projects, cities))
    }

    pub fn from_parts(
        categories: Vec<Category>,
        legacy_map: HashMap<String, Vec<String>>,
        projects: Vec<Project>,
        cities: Vec<City>,
    ) -> Self {
        let mut sub_categories: HashMap<String, Vec<String>> = categories
            .iter()
            .map(|c| (c.name.clone(), c.sub_categories.clone()))
            .collect();
        sub_categories.extend(legacy_map);

        Self {
            categories,
            sub_categories,
            projects,
            cities,
        }
    }

    /// Compiled default reference data (city codes, seed category map).
    pub fn fallback() -> Self {
        let cities = CITIES
            .iter()
            .map(|(code, name)| City::new(*code, *name))
            .collect();
        let sub_categories = CATEGORY_SUB_CATEGORIES
            .iter()
            .map(|(name, subs)| {
                (
                    name.to_string(),
                    subs.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self {
            categories: Vec::new(),
            sub_categories,
            projects: Vec::new(),
            cities,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Sub-category options mapped to a category name; empty when the
    /// category is unknown or has no mapping (the control is then disabled).
    pub fn sub_categories_for(&self, category: &str) -> &[String] {
        self.sub_categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Best-effort city match for a project's free-text location: a
    /// case-insensitive containment check in either direction against each
    /// known city name, first match wins.
    pub fn match_city(&self, location: &str) -> Option<&City> {
        let needle = location.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.cities.iter().find(|city| {
            let name = city.name.to_lowercase();
            needle.contains(&name) || name.contains(&needle)
        })
    }
}
