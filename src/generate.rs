//! HTML site generation.
//!
//! Loads config, content and relay settings from the content directory and
//! writes the finished static site.
//!
//! ## Generated Pages
//!
//! One file per [`Route`]:
//!
//! - **Home** (`index.html`): hero plus one section per navigation entry
//! - **Projects** (`projects/index.html`): every project, with category tabs
//! - **Achievements** (`achievements/index.html`): achievements, certifications, activities
//! - **Experience** / **Education**: full sorted lists
//! - **Not found** (`404.html`): navigation suggestions, root-absolute links
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── projects/index.html
//! ├── achievements/index.html
//! ├── experience/index.html
//! ├── education/index.html
//! ├── 404.html
//! ├── style.3f9a1c2e.css         # fingerprinted, colors from config.toml
//! ├── site.8b41d07a.js           # fingerprinted
//! └── images/...                 # assets_dir copied as-is
//! ```
//!
//! ## Render boundary
//!
//! Each page renders inside a boundary. A render error or panic does not abort
//! the build: the page is replaced by a "Something went wrong" page with retry
//! and home actions, the failure is logged, and it is reported in
//! [`BuildReport`]. With `dev` set the raw error is shown on the page.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use sha2::{Digest, Sha256};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use crate::components::{self, ImageResolver, ImageSize, RenderContext, RenderError, section};
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{ALL_CATEGORIES, ContentError, ContentStore};
use crate::icons::Icon;
use crate::preview::PreviewController;
use crate::relay::RelayConfig;
use crate::router::Route;
use crate::sections::ActiveSectionTracker;
use crate::theme::{Theme, ThemeStore};
use crate::types::NavigationEntry;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Relay config error: {0}")]
    Relay(#[from] confique::Error),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Applies the visitor's theme before first paint: stored choice, then the
/// theme forced in `config.toml`, then system preference, then light.
const THEME_BOOT: &str = "(function(){var d=document.documentElement,t=null;\
try{t=localStorage.getItem('theme');}catch(e){}\
if(t!=='light'&&t!=='dark')t=d.getAttribute('data-forced-theme');\
if(t!=='light'&&t!=='dark'){var m=window.matchMedia&&window.matchMedia('(prefers-color-scheme: dark)');\
t=m&&m.media!=='not all'&&m.matches?'dark':'light';}\
d.setAttribute('data-theme',t);})();";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Show raw render errors on error pages.
    pub dev: bool,
}

#[derive(Debug)]
pub struct PageReport {
    pub route: Route,
    pub output: &'static str,
    /// Set when the page was replaced by the error page.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    pub stylesheet: String,
    pub script: String,
    pub assets_copied: usize,
    pub missing_images: Vec<String>,
    pub relay_enabled: bool,
}

impl BuildReport {
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(|p| p.error.is_some())
    }
}

/// Fingerprinted stylesheet and script file names.
#[derive(Debug, Clone)]
struct Assets {
    stylesheet: String,
    script: String,
}

/// `{stem}.{first 8 hex of sha256}.{ext}`
pub fn fingerprint(stem: &str, ext: &str, contents: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(contents));
    format!("{stem}.{}.{ext}", &digest[..8])
}

pub fn build(source: &Path, output: &Path, options: &BuildOptions) -> Result<BuildReport, GenerateError> {
    let config = config::load_config(source)?;
    let store = ContentStore::load(source)?;
    let relay = RelayConfig::load(source)?;
    if !relay.is_configured() {
        tracing::warn!(
            missing = %relay.missing_keys().join(", "),
            "mail relay not configured; contact form will use mailto:"
        );
    }

    fs::create_dir_all(output)?;

    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    let assets = Assets {
        stylesheet: fingerprint("style", "css", css.as_bytes()),
        script: fingerprint("site", "js", JS.as_bytes()),
    };
    fs::write(output.join(&assets.stylesheet), &css)?;
    fs::write(output.join(&assets.script), JS)?;
    tracing::debug!(stylesheet = %assets.stylesheet, script = %assets.script, "wrote assets");

    let assets_copied = copy_assets(&source.join(&config.assets_dir), &output.join(&config.assets_dir))?;

    let fallback = config.theme.default.forced().unwrap_or(Theme::Light);
    let theme = ThemeStore::initialize(None, None, fallback);
    let images = ImageResolver::new(source, &config);

    let mut pages = Vec::new();
    for route in Route::pages() {
        let ctx = RenderContext {
            store: &store,
            config: &config,
            images: &images,
            theme: &theme,
            relay: &relay,
            root: route.root_prefix(),
        };
        let (markup, error) = render_guarded(&ctx, &assets, &route, options.dev, || {
            render_page(&ctx, &assets, &route)
        });

        let path = output.join(route.output_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, markup.into_string())?;
        tracing::debug!(page = route.output_path(), "generated");

        pages.push(PageReport {
            output: route.output_path(),
            route,
            error,
        });
    }

    Ok(BuildReport {
        pages,
        stylesheet: assets.stylesheet,
        script: assets.script,
        assets_copied,
        missing_images: images.missing(),
        relay_enabled: relay.is_configured(),
    })
}

/// Content directory validated without writing output.
#[derive(Debug)]
pub struct CheckReport {
    pub store: ContentStore,
    pub config: SiteConfig,
    /// Relay environment variables that are unset.
    pub relay_missing: Vec<&'static str>,
    pub missing_images: Vec<String>,
}

/// Load everything a build needs and resolve every image reference.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let config = config::load_config(source)?;
    let store = ContentStore::load(source)?;
    let relay = RelayConfig::load(source)?;
    let images = ImageResolver::new(source, &config);

    if let Some(avatar) = &store.profile.avatar {
        images.resolve(avatar, &store.profile.name, ImageSize::AVATAR, "");
    }
    for exp in &store.experience.experiences {
        if let Some(logo) = &exp.company_logo {
            images.resolve(logo, &exp.company, ImageSize::LOGO, "");
        }
    }
    for record in store.records() {
        let title = record.title();
        for src in record.images() {
            images.resolve(&src, &title, ImageSize::PREVIEW, "");
        }
    }

    Ok(CheckReport {
        missing_images: images.missing(),
        relay_missing: relay.missing_keys(),
        store,
        config,
    })
}

fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        tracing::debug!(dir = %src.display(), "no assets directory");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Render boundary
// ============================================================================

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn render_guarded(
    ctx: &RenderContext,
    assets: &Assets,
    route: &Route,
    dev: bool,
    render: impl FnOnce() -> Result<Markup, RenderError>,
) -> (Markup, Option<String>) {
    let failure = match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(Ok(markup)) => return (markup, None),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("panic: {}", panic_message(payload)),
    };
    tracing::error!(page = route.output_path(), error = %failure, "page failed to render");
    let detail = dev.then_some(failure.as_str());
    let page = fallback_page(route, detail, || render_error_page(ctx, assets, route, detail));
    (page, Some(failure))
}

/// The error page shares navbar and footer with the page that failed, so it
/// runs guarded too. A second panic yields [`bare_error_page`].
fn fallback_page(route: &Route, detail: Option<&str>, render: impl FnOnce() -> Markup) -> Markup {
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(page) => page,
        Err(payload) => {
            tracing::error!(
                page = route.output_path(),
                error = %panic_message(payload),
                "error page failed to render"
            );
            bare_error_page(detail)
        }
    }
}

/// Self-contained error page: no content, config or shared layout.
fn bare_error_page(detail: Option<&str>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Something went wrong" }
            }
            body {
                main role="alert" {
                    h1 { "Something went wrong" }
                    p { "This page could not be displayed. Please try again." }
                    p { a href="/" { "Go Home" } }
                    @if let Some(detail) = detail {
                        pre { code { (detail) } }
                    }
                }
            }
        }
    }
}

fn render_page(ctx: &RenderContext, assets: &Assets, route: &Route) -> Result<Markup, RenderError> {
    match route {
        Route::Home { .. } => render_home(ctx, assets),
        Route::Projects => render_projects_page(ctx, assets),
        Route::Achievements => render_achievements_page(ctx, assets),
        Route::Experience => render_experience_page(ctx, assets),
        Route::Education => render_education_page(ctx, assets),
        Route::NotFound => Ok(render_not_found(ctx, assets)),
    }
}

// ============================================================================
// Document
// ============================================================================

struct Seo {
    title: String,
    description: String,
    url: Option<String>,
}

fn seo_for(ctx: &RenderContext, route: &Route) -> Seo {
    let profile = &ctx.store.profile;
    let site = &ctx.store.site;
    let title = match route.title() {
        Some(page) => format!("{page} | {}", profile.name),
        None => site
            .site_title
            .clone()
            .unwrap_or_else(|| format!("{} - {}", profile.name, profile.title)),
    };
    let description = site
        .site_description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| profile.bio.short.clone());
    let url = match route {
        Route::NotFound => None,
        _ => site
            .site_url
            .as_deref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), route.path())),
    };
    Seo { title, description, url }
}

fn base_document(ctx: &RenderContext, assets: &Assets, route: &Route, content: Markup) -> Markup {
    let seo = seo_for(ctx, route);
    let profile = &ctx.store.profile;
    let keywords = ctx.store.site.site_keywords.join(", ");
    let nav = ctx.store.navigation();
    let page = match route {
        Route::Home { .. } => "home",
        Route::NotFound => "not-found",
        _ => "detail",
    };
    let forced = ctx.config.theme.default.forced();
    let sections = ActiveSectionTracker::new(
        nav.iter().map(|e| e.id.clone()).collect(),
        ctx.config.scroll.debounce(),
        ctx.config.scroll.edge_margin,
    );
    let overlay = PreviewController::new(ctx.config.preview.close_delay());
    let active = match route {
        Route::Home { .. } if !sections.current().is_empty() => Some(sections.current()),
        _ => route.nav_section(),
    };

    html! {
        (DOCTYPE)
        html lang="en" data-forced-theme=[forced.map(Theme::as_str)] {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (seo.title) }
                meta name="description" content=(seo.description);
                @if !keywords.is_empty() {
                    meta name="keywords" content=(keywords);
                }
                meta name="author" content=(profile.name);
                meta property="og:type" content="website";
                meta property="og:title" content=(seo.title);
                meta property="og:description" content=(seo.description);
                @if let Some(url) = &seo.url {
                    meta property="og:url" content=(url);
                    link rel="canonical" href=(url);
                }
                script { (PreEscaped(THEME_BOOT)) }
                link rel="stylesheet" href={ (ctx.root) (assets.stylesheet) };
            }
            body data-page=(page)
                data-sections=(sections.section_ids().join(" "))
                data-debounce-ms=(sections.debounce().as_millis())
                data-edge-margin=(sections.edge_margin()) {
                (components::skip_link())
                (components::navbar(ctx, &nav, active))
                main id="main-content" {
                    (content)
                }
                (components::footer(ctx, &nav))
                (components::preview_overlay(&overlay))
                script src={ (ctx.root) (assets.script) } defer {}
            }
        }
    }
}

fn card_grid(class: &str, cards: Vec<Markup>, empty: &str) -> Markup {
    html! {
        @if cards.is_empty() {
            p.empty-state { (empty) }
        } @else {
            div class={ "card-grid " (class) } {
                @for card in &cards { (card) }
            }
        }
    }
}

// ============================================================================
// Home page
// ============================================================================

const HOME_PREVIEW_COUNT: usize = 3;

fn render_hero(ctx: &RenderContext) -> Markup {
    let profile = &ctx.store.profile;
    html! {
        section.section.hero-section id="home" data-section="home" {
            div.container.hero {
                @if profile.avatar.is_some() {
                    div.hero-avatar {
                        (ctx.image(profile.avatar.as_deref(), &profile.name, ImageSize::AVATAR))
                    }
                }
                div.hero-text {
                    h1.hero-name { (profile.name) }
                    p.hero-title { (profile.title) }
                    @if !profile.tagline.is_empty() { p.hero-tagline { (profile.tagline) } }
                    @if let Some(role) = &profile.current_role {
                        p.hero-role { (Icon::Briefcase.render()) " " (role.title) " at " (role.company) }
                    }
                    div.hero-actions {
                        (components::button_link("View Projects", &ctx.href("/#projects"), Some(Icon::Code), true))
                        (components::button_link("Contact Me", &ctx.href("/#contact"), Some(Icon::Envelope), false))
                        @if let Some(resume) = &profile.resume_url {
                            (components::button_link("Download Resume", &ctx.href(resume), Some(Icon::Download), false))
                        }
                    }
                    (components::social_links(&profile.social))
                }
            }
        }
    }
}

fn render_about(ctx: &RenderContext) -> Markup {
    let profile = &ctx.store.profile;
    let bio = if profile.bio.long.trim().is_empty() {
        &profile.bio.short
    } else {
        &profile.bio.long
    };
    section(
        "about",
        "About Me",
        None,
        html! {
            div.about-grid {
                div.about-bio { (components::markdown(bio)) }
                aside.about-facts {
                    @if !profile.highlights.is_empty() {
                        h3 { "Highlights" }
                        ul { @for h in &profile.highlights { li { (h) } } }
                    }
                    @if !profile.languages.is_empty() {
                        h3 { "Languages" }
                        (components::badge_list(&profile.languages, profile.languages.len()))
                    }
                    @if let Some(location) = &profile.location {
                        p { (Icon::MapMarker.render()) " " (location) }
                    }
                }
            }
        },
    )
}

fn render_skills(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let mut categories = Vec::new();
    for category in &ctx.store.skills.categories {
        let chips = category
            .skills
            .iter()
            .map(|skill| components::skill_chip(ctx, category, skill))
            .collect::<Result<Vec<_>, _>>()?;
        let icon = Icon::resolve(category.icon.as_deref(), Icon::Code);
        categories.push(html! {
            div.skill-category {
                h3 { (icon.render()) " " (category.name) }
                div.skill-list { @for chip in &chips { (chip) } }
            }
        });
    }
    Ok(section(
        "skills",
        "Skills",
        Some("Select a skill to see where I've used it"),
        html! { @for c in &categories { (c) } },
    ))
}

fn view_all(ctx: &RenderContext, label: &str, path: &str) -> Markup {
    html! {
        div.section-footer {
            (components::button_link(label, &ctx.href(path), None, false))
        }
    }
}

fn render_home_projects(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .featured_projects()
        .into_iter()
        .map(|p| components::project_card(ctx, p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(section(
        "projects",
        "Featured Projects",
        None,
        html! {
            (card_grid("project-grid", cards, "No projects yet."))
            (view_all(ctx, "View All Projects", "/projects"))
        },
    ))
}

fn render_home_experience(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .sorted_experiences()
        .into_iter()
        .take(HOME_PREVIEW_COUNT)
        .map(|e| components::experience_card(ctx, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(section(
        "experience",
        "Experience",
        None,
        html! {
            (card_grid("experience-grid", cards, "No experience listed yet."))
            (view_all(ctx, "View Full Experience", "/experience"))
        },
    ))
}

fn render_home_achievements(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .sorted_achievements()
        .into_iter()
        .take(HOME_PREVIEW_COUNT)
        .map(|a| components::achievement_card(ctx, a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(section(
        "achievements",
        "Achievements",
        None,
        html! {
            (card_grid("achievement-grid", cards, "No achievements listed yet."))
            (view_all(ctx, "View All Achievements", "/achievements"))
        },
    ))
}

fn render_home_education(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .sorted_education()
        .into_iter()
        .take(HOME_PREVIEW_COUNT)
        .map(|e| components::education_card(ctx, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(section(
        "education",
        "Education",
        None,
        html! {
            (card_grid("education-grid", cards, "No education listed yet."))
            (view_all(ctx, "View All Education", "/education"))
        },
    ))
}

fn render_contact(ctx: &RenderContext) -> Markup {
    section(
        "contact",
        "Contact",
        Some("Let's build something together"),
        components::contact_form(ctx),
    )
}

/// Home page sections follow the navigation order.
fn render_home(ctx: &RenderContext, assets: &Assets) -> Result<Markup, RenderError> {
    let nav: Vec<NavigationEntry> = ctx.store.navigation();
    let mut sections = Vec::new();
    for entry in &nav {
        let markup = match entry.id.as_str() {
            "home" => render_hero(ctx),
            "about" => render_about(ctx),
            "skills" => render_skills(ctx)?,
            "projects" => render_home_projects(ctx)?,
            "experience" => render_home_experience(ctx)?,
            "achievements" => render_home_achievements(ctx)?,
            "education" => render_home_education(ctx)?,
            "contact" => render_contact(ctx),
            other => {
                tracing::debug!(section = other, "navigation entry has no home section");
                continue;
            }
        };
        sections.push(markup);
    }
    let route = Route::Home { section: None };
    Ok(base_document(
        ctx,
        assets,
        &route,
        html! { @for s in &sections { (s) } },
    ))
}

// ============================================================================
// Detail pages
// ============================================================================

fn render_projects_page(ctx: &RenderContext, assets: &Assets) -> Result<Markup, RenderError> {
    let store = ctx.store;
    let cards = store
        .projects
        .projects
        .iter()
        .map(|p| components::project_card(ctx, p))
        .collect::<Result<Vec<_>, _>>()?;

    let content = section(
        "projects",
        "Projects",
        Some("Things I've built"),
        html! {
            div.filter-tabs role="tablist" aria-label="Filter projects by category" {
                @for category in store.project_categories() {
                    @let count = store.projects_in_category(&category).len();
                    @let selected = category == ALL_CATEGORIES;
                    button.filter-tab type="button" role="tab" data-filter=(category)
                        aria-selected=(selected.to_string()) {
                        (category) " (" (count) ")"
                    }
                }
            }
            (card_grid("project-grid", cards, "No projects yet."))
        },
    );
    Ok(base_document(ctx, assets, &Route::Projects, content))
}

fn render_achievements_page(ctx: &RenderContext, assets: &Assets) -> Result<Markup, RenderError> {
    let store = ctx.store;
    let achievements = store
        .sorted_achievements()
        .into_iter()
        .map(|a| components::achievement_card(ctx, a))
        .collect::<Result<Vec<_>, _>>()?;
    let certifications = store
        .sorted_certifications()
        .into_iter()
        .map(|c| components::certification_card(ctx, c))
        .collect::<Result<Vec<_>, _>>()?;
    let activities = store
        .sorted_activities()
        .into_iter()
        .map(|a| components::activity_card(ctx, a))
        .collect::<Result<Vec<_>, _>>()?;

    let content = html! {
        (section("achievements", "Achievements", None,
            card_grid("achievement-grid", achievements, "No achievements listed yet.")))
        (section("certifications", "Certifications", None,
            card_grid("certification-grid", certifications, "No certifications listed yet.")))
        (section("activities", "Activities", None,
            card_grid("activity-grid", activities, "No activities listed yet.")))
    };
    Ok(base_document(ctx, assets, &Route::Achievements, content))
}

fn render_experience_page(ctx: &RenderContext, assets: &Assets) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .sorted_experiences()
        .into_iter()
        .map(|e| components::experience_card(ctx, e))
        .collect::<Result<Vec<_>, _>>()?;
    let content = section(
        "experience",
        "Experience",
        None,
        card_grid("experience-grid", cards, "No experience listed yet."),
    );
    Ok(base_document(ctx, assets, &Route::Experience, content))
}

fn render_education_page(ctx: &RenderContext, assets: &Assets) -> Result<Markup, RenderError> {
    let cards = ctx
        .store
        .sorted_education()
        .into_iter()
        .map(|e| components::education_card(ctx, e))
        .collect::<Result<Vec<_>, _>>()?;
    let content = section(
        "education",
        "Education",
        None,
        card_grid("education-grid", cards, "No education listed yet."),
    );
    Ok(base_document(ctx, assets, &Route::Education, content))
}

fn render_not_found(ctx: &RenderContext, assets: &Assets) -> Markup {
    let suggestions = [
        ("Home", "/"),
        ("Projects", "/projects"),
        ("Achievements", "/achievements"),
        ("Experience", "/experience"),
        ("Education", "/education"),
        ("Contact", "/#contact"),
    ];
    let content = html! {
        div.container.status-page {
            p.status-code { "404" }
            h1 { "Page not found" }
            p { "The page you're looking for doesn't exist or has been moved." }
            ul.suggestions {
                @for (label, path) in suggestions {
                    li { a href=(ctx.href(path)) { (label) } }
                }
            }
            (components::button_link("Go Home", &ctx.href("/"), None, true))
        }
    };
    base_document(ctx, assets, &Route::NotFound, content)
}

/// Fallback page shown in place of a page that failed to render.
fn render_error_page(ctx: &RenderContext, assets: &Assets, route: &Route, detail: Option<&str>) -> Markup {
    let content = html! {
        div.container.status-page role="alert" {
            h1 { "Something went wrong" }
            p { "This page could not be displayed. Please try again." }
            div.status-actions {
                a.button.button-primary href="" onclick="location.reload();return false;" { "Try Again" }
                (components::button_link("Go Home", &ctx.href("/"), None, false))
            }
            @if let Some(detail) = detail {
                pre.error-detail { code { (detail) } }
            }
        }
    };
    base_document(ctx, assets, route, content)
}
