//! Preview overlay state.
//!
//! Clicking a card opens a slide-in panel with the record's long description,
//! an image carousel, metadata rows and outbound links. The panel content is a
//! [`PreviewRequest`] built from the record; [`PreviewController`] owns the
//! request while the panel is open, tracks the current image, and locks
//! background scrolling.
//!
//! ## Lifecycle
//!
//! ```text
//! open(req) ──▶ visible, index 0, scroll locked
//! close(now) ─▶ hidden, scroll unlocked, request kept for the exit animation
//! tick(now) ──▶ request dropped once close_delay has elapsed
//! ```
//!
//! ## Index policy
//!
//! - `next`/`previous` wrap modulo the image count and are no-ops for 0 or 1
//!   images.
//! - `select_image` rejects out-of-range indices: it returns `false` and the
//!   current index is unchanged. It never clamps.
//! - A request with no images still opens; `current_image` is then `None`.

use crate::content::{ContentRecord, ContentStore};
use crate::dates;
use crate::icons::Icon;
use crate::types::*;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Delay between hiding the panel and dropping its content.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataItem {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewLink {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

/// Everything the overlay displays for one record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreviewRequest {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub metadata: Vec<MetadataItem>,
    pub links: Vec<PreviewLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

fn meta(label: &str, value: impl Into<String>, icon: Option<Icon>) -> MetadataItem {
    MetadataItem {
        label: label.to_string(),
        value: value.into(),
        icon,
    }
}

/// Only links with a non-blank URL make it into the overlay.
fn link(label: &str, url: Option<&String>, icon: Icon) -> Option<PreviewLink> {
    url.filter(|u| !u.trim().is_empty()).map(|u| PreviewLink {
        label: label.to_string(),
        url: u.clone(),
        icon: Some(icon),
    })
}

impl PreviewRequest {
    pub fn for_project(project: &Project) -> Self {
        let mut metadata = Vec::new();
        if let Some(category) = &project.category {
            metadata.push(meta("Category", category, Some(Icon::Tag)));
        }
        let date = dates::format_long(project.date.as_deref());
        if !date.is_empty() {
            metadata.push(meta("Date", date, Some(Icon::Calendar)));
        }
        if let Some(status) = &project.status {
            metadata.push(meta("Status", status, None));
        }

        let links = [
            link("View Code", project.links.github.as_ref(), Icon::Github),
            link("Live Demo", project.links.live.as_ref(), Icon::ExternalLink),
            link("Watch Demo", project.links.demo.as_ref(), Icon::Play),
        ]
        .into_iter()
        .flatten()
        .collect();

        PreviewRequest {
            title: project.title.clone(),
            description: project
                .long_description
                .clone()
                .unwrap_or_else(|| project.description.clone()),
            images: ContentRecord::Project(project).images(),
            metadata,
            links,
            tags: project.tech_stack.clone(),
            highlights: project.highlights.clone(),
        }
    }

    pub fn for_experience(exp: &Experience) -> Self {
        let mut metadata = Vec::new();
        if let Some(location) = &exp.location {
            metadata.push(meta("Location", location, Some(Icon::MapMarker)));
        }
        if let Some(kind) = &exp.kind {
            metadata.push(meta("Type", kind, Some(Icon::Briefcase)));
        }
        let period = dates::format_period(Some(&exp.start_date), exp.end_date.as_deref(), exp.current);
        if !period.is_empty() {
            metadata.push(meta("Period", period, Some(Icon::Calendar)));
            metadata.push(meta(
                "Duration",
                dates::duration(
                    Some(&exp.start_date),
                    exp.end_date.as_deref(),
                    exp.current,
                    dates::today(),
                ),
                None,
            ));
        }

        PreviewRequest {
            title: format!("{} at {}", exp.title, exp.company),
            description: exp.description.clone(),
            images: exp.images.clone(),
            metadata,
            links: Vec::new(),
            tags: exp.technologies.clone(),
            highlights: exp
                .responsibilities
                .iter()
                .chain(&exp.highlights)
                .cloned()
                .collect(),
        }
    }

    pub fn for_education(edu: &Education) -> Self {
        let mut metadata = vec![meta(
            "Institution",
            &edu.institution,
            Some(Icon::GraduationCap),
        )];
        if let Some(location) = &edu.location {
            metadata.push(meta("Location", location, Some(Icon::MapMarker)));
        }
        let (start, end) = (edu.start_date.as_deref(), edu.end_date.as_deref());
        let period = dates::format_period(start, end, edu.current);
        if !period.is_empty() {
            let length = dates::duration(start, end, edu.current, dates::today());
            metadata.push(meta(
                "Duration",
                format!("{period} ({length})"),
                Some(Icon::Calendar),
            ));
        }
        if let Some(grade) = &edu.grade {
            metadata.push(meta("Grade", grade, None));
        }
        if edu.current {
            metadata.push(meta("Status", "Currently Pursuing", None));
        }

        PreviewRequest {
            title: edu.display_title(),
            description: edu.description.clone(),
            images: edu.images.clone(),
            metadata,
            links: Vec::new(),
            tags: Vec::new(),
            highlights: edu.achievements.clone(),
        }
    }

    pub fn for_achievement(item: &Achievement) -> Self {
        let mut metadata = vec![meta(
            "Date",
            dates::format_short(item.date.as_deref()),
            Some(Icon::Calendar),
        )];
        if let Some(category) = &item.category {
            metadata.push(meta("Category", category, Some(Icon::Tag)));
        }
        PreviewRequest {
            title: item.title.clone(),
            description: item.description.clone(),
            images: ContentRecord::Achievement(item).images(),
            metadata,
            links: link("View Achievement", item.link.as_ref(), Icon::ExternalLink)
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    pub fn for_certification(cert: &Certification) -> Self {
        PreviewRequest {
            title: cert.title.clone(),
            description: cert.description.clone(),
            images: ContentRecord::Certification(cert).images(),
            metadata: vec![
                meta(
                    "Date",
                    dates::format_short(cert.date.as_deref()),
                    Some(Icon::Calendar),
                ),
                meta("Issuer", &cert.issuer, None),
            ],
            links: link(
                "View Credential",
                cert.credential_url.as_ref(),
                Icon::ExternalLink,
            )
            .into_iter()
            .collect(),
            ..Default::default()
        }
    }

    pub fn for_activity(activity: &Activity) -> Self {
        let mut metadata = vec![meta(
            "Date",
            dates::format_short(activity.date.as_deref()),
            Some(Icon::Calendar),
        )];
        if let Some(issuer) = &activity.issuer {
            metadata.push(meta("Issuer", issuer, None));
        }
        PreviewRequest {
            title: activity.title.clone(),
            description: activity.description.clone(),
            images: ContentRecord::Activity(activity).images(),
            metadata,
            links: link("View Credential", activity.link.as_ref(), Icon::ExternalLink)
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    /// Skill detail: the projects that use it, in place of highlights.
    pub fn for_skill(store: &ContentStore, category: &SkillCategory, skill: &Skill) -> Self {
        let related = store.projects_using_skill(&skill.name);
        let mut metadata = vec![
            meta("Category", &category.name, Some(Icon::Tag)),
            meta("Projects", related.len().to_string(), Some(Icon::Code)),
        ];
        if let Some(level) = &skill.level {
            metadata.push(meta("Level", level, None));
        }
        PreviewRequest {
            title: skill.name.clone(),
            description: format!("Projects and experience with {}", skill.name),
            images: Vec::new(),
            metadata,
            links: Vec::new(),
            tags: Vec::new(),
            highlights: related.iter().map(|p| p.title.clone()).collect(),
        }
    }

    pub fn for_record(record: ContentRecord<'_>) -> Self {
        match record {
            ContentRecord::Project(r) => Self::for_project(r),
            ContentRecord::Experience(r) => Self::for_experience(r),
            ContentRecord::Education(r) => Self::for_education(r),
            ContentRecord::Achievement(r) => Self::for_achievement(r),
            ContentRecord::Certification(r) => Self::for_certification(r),
            ContentRecord::Activity(r) => Self::for_activity(r),
        }
    }
}

/// Whether the page behind the overlay may scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollLock {
    #[default]
    Released,
    Locked,
}

#[derive(Debug)]
pub struct PreviewController {
    request: Option<PreviewRequest>,
    index: usize,
    visible: bool,
    scroll: ScrollLock,
    clear_at: Option<Instant>,
    close_delay: Duration,
}

impl Default for PreviewController {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_DELAY)
    }
}

impl PreviewController {
    pub fn new(close_delay: Duration) -> Self {
        Self {
            request: None,
            index: 0,
            visible: false,
            scroll: ScrollLock::Released,
            clear_at: None,
            close_delay,
        }
    }

    /// Show `request`, replacing whatever was open.
    pub fn open(&mut self, request: PreviewRequest) {
        self.request = Some(request);
        self.index = 0;
        self.visible = true;
        self.scroll = ScrollLock::Locked;
        self.clear_at = None;
    }

    /// Hide the panel; the request survives until [`tick`](Self::tick) passes
    /// `now + close_delay`.
    pub fn close(&mut self, now: Instant) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.scroll = ScrollLock::Released;
        self.clear_at = Some(now + self.close_delay);
    }

    /// Drop a closed request once its exit delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.clear_at {
            if now >= deadline {
                self.request = None;
                self.index = 0;
                self.clear_at = None;
            }
        }
    }

    fn image_count(&self) -> usize {
        self.request.as_ref().map_or(0, |r| r.images.len())
    }

    pub fn next(&mut self) {
        let count = self.image_count();
        if count > 1 {
            self.index = (self.index + 1) % count;
        }
    }

    pub fn previous(&mut self) {
        let count = self.image_count();
        if count > 1 {
            self.index = (self.index + count - 1) % count;
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored and return `false`.
    pub fn select_image(&mut self, index: usize) -> bool {
        if index >= self.image_count() {
            return false;
        }
        self.index = index;
        true
    }

    pub fn close_delay(&self) -> Duration {
        self.close_delay
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll
    }

    pub fn request(&self) -> Option<&PreviewRequest> {
        self.request.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_image(&self) -> Option<&str> {
        self.request
            .as_ref()
            .and_then(|r| r.images.get(self.index))
            .map(String::as_str)
    }

    /// `"2 / 5"` counter, shown only for multi-image previews.
    pub fn counter(&self) -> Option<String> {
        let count = self.image_count();
        (count > 1).then(|| format!("{} / {}", self.index + 1, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn request_with_images(n: usize) -> PreviewRequest {
        PreviewRequest {
            title: "Test".to_string(),
            images: (0..n).map(|i| format!("/img/{i}.png")).collect(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Controller
    // =========================================================================

    #[test]
    fn open_shows_panel_and_locks_scroll() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(3));
        assert!(ctl.is_visible());
        assert_eq!(ctl.scroll_lock(), ScrollLock::Locked);
        assert_eq!(ctl.current_index(), 0);
        assert_eq!(ctl.current_image(), Some("/img/0.png"));
    }

    #[test]
    fn opening_new_preview_resets_index() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(4));
        ctl.next();
        ctl.next();
        assert_eq!(ctl.current_index(), 2);

        ctl.open(request_with_images(5));
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn next_wraps_around_and_returns_after_n_steps() {
        for n in 2..6 {
            let mut ctl = PreviewController::default();
            ctl.open(request_with_images(n));
            ctl.select_image(1);
            for _ in 0..n {
                ctl.next();
                assert!(ctl.current_index() < n);
            }
            assert_eq!(ctl.current_index(), 1);
        }
    }

    #[test]
    fn previous_wraps_from_first_to_last() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(3));
        ctl.previous();
        assert_eq!(ctl.current_index(), 2);
        ctl.previous();
        assert_eq!(ctl.current_index(), 1);
    }

    #[test]
    fn navigation_is_noop_for_zero_or_one_image() {
        for n in 0..2 {
            let mut ctl = PreviewController::default();
            ctl.open(request_with_images(n));
            ctl.next();
            ctl.previous();
            assert_eq!(ctl.current_index(), 0);
        }
    }

    #[test]
    fn select_image_rejects_out_of_range() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(3));
        assert!(ctl.select_image(2));
        assert!(!ctl.select_image(3));
        assert_eq!(ctl.current_index(), 2);
        assert!(!ctl.select_image(usize::MAX));
        assert_eq!(ctl.current_index(), 2);
    }

    #[test]
    fn select_image_without_request_is_rejected() {
        let mut ctl = PreviewController::default();
        assert!(!ctl.select_image(0));
    }

    #[test]
    fn empty_image_list_opens_with_no_current_image() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(0));
        assert!(ctl.is_visible());
        assert_eq!(ctl.current_image(), None);
        assert_eq!(ctl.counter(), None);
    }

    #[test]
    fn close_defers_clearing_the_request() {
        let mut ctl = PreviewController::new(Duration::from_millis(300));
        let t0 = Instant::now();
        ctl.open(request_with_images(2));
        ctl.close(t0);

        assert!(!ctl.is_visible());
        assert_eq!(ctl.scroll_lock(), ScrollLock::Released);
        assert!(ctl.request().is_some());

        ctl.tick(t0 + Duration::from_millis(299));
        assert!(ctl.request().is_some());

        ctl.tick(t0 + Duration::from_millis(300));
        assert!(ctl.request().is_none());
    }

    #[test]
    fn reopening_cancels_pending_clear() {
        let mut ctl = PreviewController::new(Duration::from_millis(300));
        let t0 = Instant::now();
        ctl.open(request_with_images(2));
        ctl.close(t0);
        ctl.open(request_with_images(1));
        ctl.tick(t0 + Duration::from_secs(1));
        assert!(ctl.is_visible());
        assert!(ctl.request().is_some());
    }

    #[test]
    fn counter_shows_position() {
        let mut ctl = PreviewController::default();
        ctl.open(request_with_images(5));
        ctl.next();
        assert_eq!(ctl.counter().as_deref(), Some("2 / 5"));
    }

    // =========================================================================
    // Builders
    // =========================================================================

    #[test]
    fn project_preview_uses_long_description_and_skips_blank_links() {
        let store = fixture_store();
        let req = PreviewRequest::for_project(find_project(&store, "Trail Mapper"));
        assert!(req.description.contains("vector tiles"));
        assert_eq!(req.images.len(), 3);
        let labels: Vec<&str> = req.links.iter().map(|l| l.label.as_str()).collect();
        // demo link is whitespace in the fixture
        assert_eq!(labels, vec!["View Code", "Live Demo"]);
        let meta: Vec<&str> = req.metadata.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(meta, vec!["Category", "Date", "Status"]);
    }

    #[test]
    fn project_preview_falls_back_to_cover_image() {
        let store = fixture_store();
        let req = PreviewRequest::for_project(find_project(&store, "Pocket Budget"));
        assert_eq!(req.images, vec!["/images/projects/budget.png"]);
        assert_eq!(req.description, "Envelope budgeting app with bank sync.");
    }

    #[test]
    fn project_without_images_has_empty_image_set() {
        let store = fixture_store();
        let req = PreviewRequest::for_project(find_project(&store, "dotctl"));
        assert!(req.images.is_empty());
        let mut ctl = PreviewController::default();
        ctl.open(req);
        assert!(ctl.is_visible());
        assert_eq!(ctl.current_image(), None);
    }

    #[test]
    fn experience_preview_merges_responsibilities_and_highlights() {
        let store = fixture_store();
        let req = PreviewRequest::for_experience(find_experience(&store, "Acme Labs"));
        assert_eq!(req.title, "Software Engineer at Acme Labs");
        assert_eq!(
            req.highlights,
            vec![
                "Own the checkout flow",
                "Run the frontend guild",
                "Cut page load time by 40%"
            ]
        );
        let period = req.metadata.iter().find(|m| m.label == "Period").unwrap();
        assert_eq!(period.value, "September 2021 - Present");
        let length = req.metadata.iter().find(|m| m.label == "Duration").unwrap();
        assert!(length.value.contains("yr") || length.value.contains("year"));
    }

    #[test]
    fn education_preview_appends_elapsed_time() {
        let store = fixture_store();
        let edu = &store.education.education[0];
        let req = PreviewRequest::for_education(edu);
        let duration = req.metadata.iter().find(|m| m.label == "Duration").unwrap();
        let expected = format!(
            "({})",
            dates::duration(
                edu.start_date.as_deref(),
                edu.end_date.as_deref(),
                edu.current,
                dates::today()
            )
        );
        assert!(duration.value.ends_with(&expected), "{}", duration.value);
    }

    #[test]
    fn dateless_records_skip_period_rows() {
        let store = fixture_store();
        let mut edu = store.education.education[0].clone();
        edu.start_date = None;
        edu.end_date = None;
        let req = PreviewRequest::for_education(&edu);
        assert!(req.metadata.iter().all(|m| m.label != "Duration"));

        let mut exp = find_experience(&store, "Acme Labs").clone();
        exp.start_date = String::new();
        let req = PreviewRequest::for_experience(&exp);
        assert!(req.metadata.iter().all(|m| m.label != "Period" && m.label != "Duration"));
    }

    #[test]
    fn education_preview_marks_current_programs() {
        let store = fixture_store();
        let bootcamp = store
            .education
            .education
            .iter()
            .find(|e| e.current)
            .unwrap();
        let req = PreviewRequest::for_education(bootcamp);
        assert!(
            req.metadata
                .iter()
                .any(|m| m.label == "Status" && m.value == "Currently Pursuing")
        );
    }

    #[test]
    fn certification_preview_has_issuer_and_credential_link() {
        let store = fixture_store();
        let req = PreviewRequest::for_certification(&store.certifications.certifications[0]);
        assert!(req.metadata.iter().any(|m| m.label == "Issuer" && m.value == "Postman"));
        assert_eq!(req.links[0].label, "View Credential");
    }

    #[test]
    fn achievement_without_link_has_no_links() {
        let store = fixture_store();
        let req = PreviewRequest::for_achievement(&store.achievements.achievements[1]);
        assert!(req.links.is_empty());
    }

    #[test]
    fn skill_preview_lists_related_projects() {
        let store = fixture_store();
        let category = &store.skills.categories[0];
        let react = &category.skills[0];
        let req = PreviewRequest::for_skill(&store, category, react);
        assert!(req.highlights.contains(&"Trail Mapper".to_string()));
        let count = req.metadata.iter().find(|m| m.label == "Projects").unwrap();
        assert_eq!(count.value, req.highlights.len().to_string());
    }

    #[test]
    fn preview_serializes_icons_as_slugs() {
        let store = fixture_store();
        let req = PreviewRequest::for_project(find_project(&store, "Trail Mapper"));
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""icon":"tag""#));
        assert!(json.contains(r#""tags":["React""#));
    }
}
