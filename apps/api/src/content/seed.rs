//! Sample portfolio content, used by `POST /api/seed` and `--seed`.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    decode, writable_fields, Achievement, ContactInfo, Document, Dream, Objective, Project, Record, Skill,
};
use crate::store::{Batch, DocumentStore, StoredDocument};

const DEVICON: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";

fn sample_skills() -> Vec<Value> {
    [
        ("HTML5", "Frontend", 95, "html5/html5-original.svg"),
        ("CSS3", "Frontend", 90, "css3/css3-original.svg"),
        ("JavaScript", "Frontend", 90, "javascript/javascript-original.svg"),
        ("React", "Frontend", 85, "react/react-original.svg"),
        ("Rust", "Backend", 85, "rust/rust-original.svg"),
        ("Node.js", "Backend", 80, "nodejs/nodejs-original.svg"),
        ("PostgreSQL", "Database", 85, "postgresql/postgresql-original.svg"),
        ("MongoDB", "Database", 75, "mongodb/mongodb-original.svg"),
        ("Git", "Tools", 90, "git/git-original.svg"),
        ("Docker", "Tools", 75, "docker/docker-original.svg"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, category, level, icon))| {
        json!({
            "name": name,
            "category": category,
            "proficiency_level": level,
            "icon_url": format!("{DEVICON}/{icon}"),
            "order_index": i + 1
        })
    })
    .collect()
}

fn sample_projects() -> Vec<Value> {
    vec![
        json!({
            "title": "3D Portfolio",
            "description": "An immersive portfolio site with an interactive WebGL background and a live content API.",
            "technologies": ["Three.js", "Rust", "PostgreSQL"],
            "image_url": "/images/portfolio-3d.jpg",
            "featured": true,
            "order_index": 1
        }),
        json!({
            "title": "Restaurant Website",
            "description": "A responsive restaurant site with dark mode and smooth animations.",
            "technologies": ["HTML5", "CSS3", "JavaScript"],
            "image_url": "/images/restaurant.jpg",
            "featured": true,
            "order_index": 2
        }),
        json!({
            "title": "Weather Dashboard",
            "description": "Real-time weather with a five-day forecast and air quality data.",
            "technologies": ["JavaScript", "Weather API"],
            "image_url": "/images/weather-app.jpg",
            "featured": true,
            "order_index": 3
        }),
        json!({
            "title": "Graph Algorithm Visualizer",
            "description": "Interactive visualization of BFS, DFS and shortest-path search.",
            "technologies": ["Java", "JavaFX"],
            "image_url": "/images/graph-viz.jpg",
            "featured": false,
            "order_index": 4
        }),
    ]
}

fn sample_objectives() -> Vec<Value> {
    vec![
        json!({
            "title": "Master Advanced Three.js",
            "description": "Shaders, particle systems and rendering performance.",
            "target_date": "2025-06-30",
            "priority": 1,
            "status": "in-progress",
            "order_index": 1
        }),
        json!({
            "title": "Full-Stack Certification",
            "description": "Complete a full-stack certification covering modern frameworks.",
            "target_date": "2025-12-31",
            "priority": 2,
            "status": "in-progress",
            "order_index": 2
        }),
        json!({
            "title": "Open Source Contributions",
            "description": "Contribute to five major open-source projects.",
            "target_date": "2025-09-30",
            "priority": 2,
            "status": "planned",
            "order_index": 3
        }),
        json!({
            "title": "Build SaaS Product",
            "description": "Launch a commercial SaaS product.",
            "target_date": "2026-03-31",
            "priority": 1,
            "status": "planned",
            "order_index": 4
        }),
    ]
}

fn sample_contacts() -> Vec<Value> {
    [
        ("email", "hello@example.com", "fas fa-envelope"),
        ("linkedin", "https://linkedin.com/in/example", "fab fa-linkedin"),
        ("github", "https://github.com/example", "fab fa-github"),
        ("twitter", "https://twitter.com/example", "fab fa-twitter"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (kind, value, icon))| {
        json!({"type": kind, "value": value, "icon": icon, "display_order": i + 1, "is_active": true})
    })
    .collect()
}

fn sample_dreams() -> Vec<Value> {
    [
        ("Build a Startup", "Create and scale a product that helps millions of people.", "Career"),
        ("Master Game Development", "Build immersive games with a modern engine.", "Learning"),
        ("Travel the World", "Visit all seven continents while working remotely.", "Travel"),
        ("Publish a Technical Book", "Write a book on web development and 3D graphics.", "Career"),
        ("Build a Smart Home", "Design a fully automated home with custom IoT.", "Personal"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (title, description, category))| {
        json!({"title": title, "description": description, "category": category, "order_index": i + 1})
    })
    .collect()
}

fn sample_achievements() -> Vec<Value> {
    [
        ("Bachelor of Technology", "Computer Science degree with distinction.", "2024-06-15", "Education"),
        ("First Full-Stack Project", "Shipped a production app serving 1000+ users.", "2024-03-20", "Career"),
        ("Hackathon Winner", "First place at a regional hackathon.", "2024-01-15", "Awards"),
        ("Open Source Contributor", "Contributions to popular open-source projects.", "2024-08-10", "Career"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (title, description, date, category))| {
        json!({
            "title": title,
            "description": description,
            "achievement_date": date,
            "category": category,
            "order_index": i + 1
        })
    })
    .collect()
}

fn batch<T: Document>(payloads: Vec<Value>) -> Result<Batch, AppError> {
    let documents = payloads
        .into_iter()
        .map(|payload| -> Result<StoredDocument, AppError> {
            let fields: T = decode(writable_fields::<T>(payload)?)?;
            Ok(Record::new(fields).to_stored()?)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Batch {
        collection: T::COLLECTION,
        documents,
    })
}

pub fn sample_batches() -> Result<Vec<Batch>, AppError> {
    Ok(vec![
        batch::<Skill>(sample_skills())?,
        batch::<Project>(sample_projects())?,
        batch::<Objective>(sample_objectives())?,
        batch::<ContactInfo>(sample_contacts())?,
        batch::<Dream>(sample_dreams())?,
        batch::<Achievement>(sample_achievements())?,
    ])
}

/// Replaces the six content collections with the sample data, all or nothing.
/// CVs are left alone.
pub async fn seed_sample(store: &dyn DocumentStore) -> Result<Vec<(&'static str, usize)>, AppError> {
    let batches = sample_batches()?;
    store.reseed(&batches).await?;

    let counts: Vec<_> = batches
        .iter()
        .map(|b| (b.collection, b.documents.len()))
        .collect();
    for (collection, count) in &counts {
        info!("Seeded {count} {collection}");
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{list_contacts, list_projects, list_skills};
    use crate::store::MemoryDocumentStore;

    #[test]
    fn test_sample_data_is_valid() {
        let batches = sample_batches().unwrap();
        assert_eq!(batches.len(), 6);
        assert!(batches.iter().all(|b| !b.documents.is_empty()));
    }

    #[tokio::test]
    async fn test_seed_replaces_existing_content() {
        let store = MemoryDocumentStore::new();
        crate::content::create::<Skill>(
            &store,
            json!({"name": "Stale", "category": "Other", "proficiency_level": 1}),
        )
        .await
        .unwrap();

        seed_sample(&store).await.unwrap();

        let skills = list_skills(&store).await.unwrap();
        assert_eq!(skills.len(), sample_skills().len());
        assert!(skills.iter().all(|s| s.fields.name != "Stale"));
        assert_eq!(list_projects(&store, Some(true)).await.unwrap().len(), 3);
        assert_eq!(list_contacts(&store).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_seed_twice_does_not_duplicate() {
        let store = MemoryDocumentStore::new();
        seed_sample(&store).await.unwrap();
        seed_sample(&store).await.unwrap();
        assert_eq!(list_projects(&store, None).await.unwrap().len(), 4);
    }
}
