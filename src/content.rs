//! Content loading and queries.
//!
//! The content directory holds one JSON document per category. Everything is
//! read once into a [`ContentStore`] and never mutated afterwards; renderers
//! and preview builders only borrow from it.
//!
//! ```text
//! content/
//! ├── profile.json          # required
//! ├── skills.json           # { "categories": [...] }
//! ├── projects.json         # { "categories": [...], "projects": [...] }
//! ├── experience.json       # { "experiences": [...] }
//! ├── education.json        # { "education": [...] }
//! ├── achievements.json     # { "achievements": [...] }
//! ├── certifications.json   # { "certifications": [...] }
//! ├── activities.json       # { "activities": [...] }
//! └── site.json             # titles, keywords, optional navigation
//! ```
//!
//! Every document except `profile.json` is optional; a missing file is the
//! same as an empty collection.
//!
//! ## Validation
//!
//! - Ids are unique within each collection
//! - A project's category must appear in `projects.json` `categories` when
//!   that list is non-empty

use crate::dates;
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The filter tab that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Required content file missing: {0}")]
    Missing(PathBuf),
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: ContentKind, id: RecordId },
    #[error("Project {id} uses category '{category}' which is not listed in projects.json")]
    UnknownCategory { id: RecordId, category: String },
}

/// The record kinds that can be previewed and rendered as cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Project,
    Experience,
    Education,
    Achievement,
    Certification,
    Activity,
}

impl ContentKind {
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Project => "project",
            ContentKind::Experience => "experience",
            ContentKind::Education => "education",
            ContentKind::Achievement => "achievement",
            ContentKind::Certification => "certification",
            ContentKind::Activity => "activity",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A borrowed view over any card-renderable record.
#[derive(Debug, Clone, Copy)]
pub enum ContentRecord<'a> {
    Project(&'a Project),
    Experience(&'a Experience),
    Education(&'a Education),
    Achievement(&'a Achievement),
    Certification(&'a Certification),
    Activity(&'a Activity),
}

impl<'a> ContentRecord<'a> {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRecord::Project(_) => ContentKind::Project,
            ContentRecord::Experience(_) => ContentKind::Experience,
            ContentRecord::Education(_) => ContentKind::Education,
            ContentRecord::Achievement(_) => ContentKind::Achievement,
            ContentRecord::Certification(_) => ContentKind::Certification,
            ContentRecord::Activity(_) => ContentKind::Activity,
        }
    }

    pub fn id(&self) -> &'a RecordId {
        match self {
            ContentRecord::Project(r) => &r.id,
            ContentRecord::Experience(r) => &r.id,
            ContentRecord::Education(r) => &r.id,
            ContentRecord::Achievement(r) => &r.id,
            ContentRecord::Certification(r) => &r.id,
            ContentRecord::Activity(r) => &r.id,
        }
    }

    pub fn title(&self) -> String {
        match self {
            ContentRecord::Project(r) => r.title.clone(),
            ContentRecord::Experience(r) => format!("{} at {}", r.title, r.company),
            ContentRecord::Education(r) => r.display_title(),
            ContentRecord::Achievement(r) => r.title.clone(),
            ContentRecord::Certification(r) => r.title.clone(),
            ContentRecord::Activity(r) => r.title.clone(),
        }
    }

    /// Image gallery, falling back to the single cover image.
    pub fn images(&self) -> Vec<String> {
        let (images, cover): (&[String], Option<&String>) = match self {
            ContentRecord::Project(r) => (&r.images, r.image.as_ref()),
            ContentRecord::Experience(r) => (&r.images, None),
            ContentRecord::Education(r) => (&r.images, None),
            ContentRecord::Achievement(r) => (&r.images, r.image.as_ref()),
            ContentRecord::Certification(r) => (&r.images, r.image.as_ref()),
            ContentRecord::Activity(r) => (&r.images, r.image.as_ref()),
        };
        if !images.is_empty() {
            images.to_vec()
        } else {
            cover.into_iter().cloned().collect()
        }
    }
}

/// All portfolio content, loaded once.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pub profile: Profile,
    pub skills: SkillsData,
    pub projects: ProjectsData,
    pub experience: ExperienceData,
    pub education: EducationData,
    pub achievements: AchievementsData,
    pub certifications: CertificationsData,
    pub activities: ActivitiesData,
    pub site: SiteMeta,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T, ContentError> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::debug!(file = %path.display(), "content file absent, using empty collection");
        return Ok(T::default());
    }
    read_json(&path)
}

fn check_unique<'a>(
    kind: ContentKind,
    ids: impl Iterator<Item = &'a RecordId>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

impl ContentStore {
    /// Load and validate every content document in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let profile_path = dir.join("profile.json");
        if !profile_path.exists() {
            return Err(ContentError::Missing(profile_path));
        }
        let store = ContentStore {
            profile: read_json(&profile_path)?,
            skills: read_optional(dir, "skills.json")?,
            projects: read_optional(dir, "projects.json")?,
            experience: read_optional(dir, "experience.json")?,
            education: read_optional(dir, "education.json")?,
            achievements: read_optional(dir, "achievements.json")?,
            certifications: read_optional(dir, "certifications.json")?,
            activities: read_optional(dir, "activities.json")?,
            site: read_optional(dir, "site.json")?,
        };
        store.validate()?;
        Ok(store)
    }

    fn validate(&self) -> Result<(), ContentError> {
        check_unique(
            ContentKind::Project,
            self.projects.projects.iter().map(|r| &r.id),
        )?;
        check_unique(
            ContentKind::Experience,
            self.experience.experiences.iter().map(|r| &r.id),
        )?;
        check_unique(
            ContentKind::Education,
            self.education.education.iter().map(|r| &r.id),
        )?;
        check_unique(
            ContentKind::Achievement,
            self.achievements.achievements.iter().map(|r| &r.id),
        )?;
        check_unique(
            ContentKind::Certification,
            self.certifications.certifications.iter().map(|r| &r.id),
        )?;
        check_unique(
            ContentKind::Activity,
            self.activities.activities.iter().map(|r| &r.id),
        )?;

        let categories = &self.projects.categories;
        if !categories.is_empty() {
            for project in &self.projects.projects {
                match &project.category {
                    Some(category) if !categories.contains(category) => {
                        return Err(ContentError::UnknownCategory {
                            id: project.id.clone(),
                            category: category.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Site navigation: `site.json` override or the default section list.
    pub fn navigation(&self) -> Vec<NavigationEntry> {
        self.site
            .navigation
            .clone()
            .unwrap_or_else(NavigationEntry::defaults)
    }

    /// Every card-renderable record, grouped by kind in page order.
    pub fn records(&self) -> Vec<ContentRecord<'_>> {
        let mut records = Vec::new();
        records.extend(self.projects.projects.iter().map(ContentRecord::Project));
        records.extend(
            self.experience
                .experiences
                .iter()
                .map(ContentRecord::Experience),
        );
        records.extend(self.education.education.iter().map(ContentRecord::Education));
        records.extend(
            self.achievements
                .achievements
                .iter()
                .map(ContentRecord::Achievement),
        );
        records.extend(
            self.certifications
                .certifications
                .iter()
                .map(ContentRecord::Certification),
        );
        records.extend(
            self.activities
                .activities
                .iter()
                .map(ContentRecord::Activity),
        );
        records
    }

    /// Filter tabs for the projects page. Always starts with "All".
    pub fn project_categories(&self) -> Vec<String> {
        let mut tabs = vec![ALL_CATEGORIES.to_string()];
        let source: Vec<String> = if self.projects.categories.is_empty() {
            let mut seen = Vec::new();
            for category in self.projects.projects.iter().filter_map(|p| p.category.clone()) {
                if !seen.contains(&category) {
                    seen.push(category);
                }
            }
            seen
        } else {
            self.projects.categories.clone()
        };
        tabs.extend(source.into_iter().filter(|c| c != ALL_CATEGORIES));
        tabs
    }

    /// Projects in a category; `"All"` returns every project.
    pub fn projects_in_category(&self, category: &str) -> Vec<&Project> {
        self.projects
            .projects
            .iter()
            .filter(|p| category == ALL_CATEGORIES || p.category.as_deref() == Some(category))
            .collect()
    }

    pub fn featured_projects(&self) -> Vec<&Project> {
        let featured: Vec<&Project> = self.projects.projects.iter().filter(|p| p.featured).collect();
        if featured.is_empty() {
            self.projects.projects.iter().take(3).collect()
        } else {
            featured
        }
    }

    /// Projects whose tech stack mentions the skill, matching substrings
    /// case-insensitively in either direction ("React" ~ "React Native").
    pub fn projects_using_skill(&self, skill: &str) -> Vec<&Project> {
        let skill = skill.to_lowercase();
        self.projects
            .projects
            .iter()
            .filter(|p| {
                p.tech_stack.iter().any(|tech| {
                    let tech = tech.to_lowercase();
                    tech.contains(&skill) || skill.contains(&tech)
                })
            })
            .collect()
    }

    pub fn sorted_experiences(&self) -> Vec<&Experience> {
        let mut items: Vec<&Experience> = self.experience.experiences.iter().collect();
        items.sort_by(|a, b| dates::newest_first(Some(&a.start_date), Some(&b.start_date)));
        items
    }

    pub fn sorted_education(&self) -> Vec<&Education> {
        let mut items: Vec<&Education> = self.education.education.iter().collect();
        items.sort_by(|a, b| dates::newest_first(a.start_date.as_deref(), b.start_date.as_deref()));
        items
    }

    pub fn sorted_achievements(&self) -> Vec<&Achievement> {
        let mut items: Vec<&Achievement> = self.achievements.achievements.iter().collect();
        items.sort_by(|a, b| dates::newest_first(a.date.as_deref(), b.date.as_deref()));
        items
    }

    pub fn sorted_certifications(&self) -> Vec<&Certification> {
        let mut items: Vec<&Certification> = self.certifications.certifications.iter().collect();
        items.sort_by(|a, b| dates::newest_first(a.date.as_deref(), b.date.as_deref()));
        items
    }

    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut items: Vec<&Activity> = self.activities.activities.iter().collect();
        items.sort_by(|a, b| dates::newest_first(a.date.as_deref(), b.date.as_deref()));
        items
    }
}
