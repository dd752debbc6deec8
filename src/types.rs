//! Shared content types.
//!
//! These mirror the JSON documents in the content directory one-to-one and are
//! shared by the loader, the preview builders, and the page renderers. Field
//! names follow the camelCase keys used in the data files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier. Data files use both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Bio,
    #[serde(default)]
    pub current_role: Option<CurrentRole>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bio {
    #[serde(default)]
    pub short: String,
    /// Markdown.
    #[serde(default)]
    pub long: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentRole {
    pub title: String,
    pub company: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsData {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsData {
    /// Filter tabs for the projects page, usually starting with `"All"`.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    /// Cover image, also the fallback when `images` is empty.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub live: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

// ============================================================================
// Experience and education
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceData {
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: RecordId,
    /// Role title.
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Employment type, e.g. "Full-time" or "Internship".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationData {
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: RecordId,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Education {
    /// "Degree in Field", or just the degree when no field is given.
    pub fn display_title(&self) -> String {
        match self.field.as_deref().filter(|f| !f.trim().is_empty()) {
            Some(field) => format!("{} in {}", self.degree, field),
            None => self.degree.clone(),
        }
    }
}

// ============================================================================
// Achievements, certifications, activities
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementsData {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Icon key resolved through [`crate::icons::Icon::from_key`].
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationsData {
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: RecordId,
    pub title: String,
    pub issuer: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitiesData {
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

// ============================================================================
// Site metadata and navigation
// ============================================================================

/// Site-wide metadata from `site.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeta {
    #[serde(default)]
    pub site_title: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub site_description: Option<String>,
    #[serde(default)]
    pub site_keywords: Vec<String>,
    /// Overrides the default navigation when present.
    #[serde(default)]
    pub navigation: Option<Vec<NavigationEntry>>,
}

/// One entry of the site navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    pub name: String,
    pub path: String,
    /// Id of the home-page section this entry scrolls to.
    pub id: String,
    pub aria_label: String,
}

impl NavigationEntry {
    fn section(name: &str, id: &str) -> Self {
        let path = if id == "home" {
            "/".to_string()
        } else {
            format!("/#{id}")
        };
        Self {
            name: name.to_string(),
            path,
            id: id.to_string(),
            aria_label: format!("Navigate to {id} section"),
        }
    }

    /// Navigation used when `site.json` does not define one.
    pub fn defaults() -> Vec<NavigationEntry> {
        [
            ("Home", "home"),
            ("About", "about"),
            ("Skills", "skills"),
            ("Projects", "projects"),
            ("Experience", "experience"),
            ("Achievements", "achievements"),
            ("Education", "education"),
            ("Contact", "contact"),
        ]
        .into_iter()
        .map(|(name, id)| NavigationEntry::section(name, id))
        .collect()
    }
}
