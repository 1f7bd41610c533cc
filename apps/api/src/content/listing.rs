use std::collections::BTreeMap;

use serde::Serialize;

use super::list;
use crate::errors::AppError;
use crate::models::skill::SkillCategory;
use crate::models::{Achievement, ContactInfo, Document, Dream, Objective, Project, Record, Skill};
use crate::store::{DocumentStore, Query};

/// Skills keyed by category, categories in declaration order, each group in
/// display order. Only categories with at least one skill appear.
pub type SkillGroups = BTreeMap<SkillCategory, Vec<Record<Skill>>>;

pub fn group_skills(skills: Vec<Record<Skill>>) -> SkillGroups {
    let mut groups = SkillGroups::new();
    for skill in skills {
        groups.entry(skill.fields.category).or_default().push(skill);
    }
    groups
}

pub async fn list_skills(store: &dyn DocumentStore) -> Result<Vec<Record<Skill>>, AppError> {
    list(store, Query::sorted(Skill::SORT)).await
}

pub async fn list_projects(
    store: &dyn DocumentStore,
    featured: Option<bool>,
) -> Result<Vec<Record<Project>>, AppError> {
    let mut query = Query::sorted(Project::SORT);
    if let Some(featured) = featured {
        query = query.filter("featured", featured);
    }
    list(store, query).await
}

pub async fn list_objectives(
    store: &dyn DocumentStore,
    status: Option<&str>,
) -> Result<Vec<Record<Objective>>, AppError> {
    list(store, with_text_filter(Query::sorted(Objective::SORT), "status", status)).await
}

/// Inactive contacts are never listed.
pub async fn list_contacts(store: &dyn DocumentStore) -> Result<Vec<Record<ContactInfo>>, AppError> {
    list(store, Query::sorted(ContactInfo::SORT).filter("is_active", true)).await
}

pub async fn list_dreams(
    store: &dyn DocumentStore,
    category: Option<&str>,
) -> Result<Vec<Record<Dream>>, AppError> {
    list(store, with_text_filter(Query::sorted(Dream::SORT), "category", category)).await
}

pub async fn list_achievements(
    store: &dyn DocumentStore,
    category: Option<&str>,
) -> Result<Vec<Record<Achievement>>, AppError> {
    list(
        store,
        with_text_filter(Query::sorted(Achievement::SORT), "category", category),
    )
    .await
}

/// Blank filter values mean "no filter".
fn with_text_filter(query: Query, field: &str, value: Option<&str>) -> Query {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => query.filter(field, value),
        None => query,
    }
}

/// Everything the public site renders on first load.
#[derive(Debug, Serialize)]
pub struct PortfolioSnapshot {
    pub skills: SkillGroups,
    pub projects: Vec<Record<Project>>,
    pub objectives: Vec<Record<Objective>>,
    pub contact: Vec<Record<ContactInfo>>,
    pub dreams: Vec<Record<Dream>>,
    pub achievements: Vec<Record<Achievement>>,
}

/// Runs the six list queries concurrently; the first failure fails the whole snapshot.
pub async fn snapshot(store: &dyn DocumentStore) -> Result<PortfolioSnapshot, AppError> {
    let (skills, projects, objectives, contact, dreams, achievements) = tokio::try_join!(
        list_skills(store),
        list_projects(store, None),
        list_objectives(store, None),
        list_contacts(store),
        list_dreams(store, None),
        list_achievements(store, None),
    )?;

    Ok(PortfolioSnapshot {
        skills: group_skills(skills),
        projects,
        objectives,
        contact,
        dreams,
        achievements,
    })
}
