//! Presentational building blocks.
//!
//! Everything here is a pure function from content to [`Markup`]. Cards embed
//! their overlay content as JSON in a `data-preview` attribute; the browser
//! script opens the overlay from that payload without another request.
//!
//! Image references go through [`ImageResolver`]: local files that do not
//! exist are logged once and replaced with a placeholder, and every `<img>`
//! also swaps itself for the placeholder if it fails to load in the browser.

use chrono::Datelike;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::contact::{self, Field};
use crate::content::{ContentRecord, ContentStore};
use crate::dates;
use crate::icons::Icon;
use crate::preview::{PreviewController, PreviewRequest};
use crate::relay::RelayConfig;
use crate::theme::{Theme, ThemeStore};
use crate::types::*;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Images
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const CARD: ImageSize = ImageSize { width: 600, height: 400 };
    pub const PREVIEW: ImageSize = ImageSize { width: 1200, height: 800 };
    pub const AVATAR: ImageSize = ImageSize { width: 400, height: 400 };
    pub const LOGO: ImageSize = ImageSize { width: 96, height: 96 };
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with("//")
        || src.starts_with("data:")
}

/// Maps content image references to output URLs.
///
/// Local references are relative to the content root and must live inside
/// the configured assets directory, which is copied to the output as-is.
#[derive(Debug)]
pub struct ImageResolver {
    content_root: PathBuf,
    assets_dir: String,
    placeholder_base: String,
    missing: RefCell<BTreeSet<String>>,
}

impl ImageResolver {
    pub fn new(content_root: &Path, config: &SiteConfig) -> Self {
        Self {
            content_root: content_root.to_path_buf(),
            assets_dir: config.assets_dir.trim_matches('/').to_string(),
            placeholder_base: config.images.placeholder_base.trim_end_matches('/').to_string(),
            missing: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn placeholder(&self, label: &str, size: ImageSize) -> String {
        format!(
            "{}/{}x{}?text={}",
            self.placeholder_base,
            size.width,
            size.height,
            urlencoding::encode(label)
        )
    }

    /// URL for `src` as seen from a page `root` levels below the site root.
    pub fn resolve(&self, src: &str, label: &str, size: ImageSize, root: &str) -> String {
        let src = src.trim();
        if src.is_empty() {
            return self.placeholder(label, size);
        }
        if is_remote(src) {
            return src.to_string();
        }

        let rel = src.trim_start_matches("./").trim_start_matches('/');
        let in_assets = Path::new(rel).starts_with(&self.assets_dir);
        if in_assets && self.content_root.join(rel).is_file() {
            return format!("{root}{rel}");
        }

        if self.missing.borrow_mut().insert(rel.to_string()) {
            if in_assets {
                tracing::warn!(image = rel, "image not found, using placeholder");
            } else {
                tracing::warn!(
                    image = rel,
                    assets_dir = %self.assets_dir,
                    "image outside assets directory, using placeholder"
                );
            }
        }
        self.placeholder(label, size)
    }

    /// Local references that were replaced with placeholders, sorted.
    pub fn missing(&self) -> Vec<String> {
        self.missing.borrow().iter().cloned().collect()
    }
}

// ============================================================================
// Render context
// ============================================================================

/// Everything a page needs besides its own route.
pub struct RenderContext<'a> {
    pub store: &'a ContentStore,
    pub config: &'a SiteConfig,
    pub images: &'a ImageResolver,
    pub theme: &'a ThemeStore,
    pub relay: &'a RelayConfig,
    /// Prefix back to the site root: `""`, `"../"`, or `"/"` on the not-found page.
    pub root: &'static str,
}

impl RenderContext<'_> {
    /// Turn a site-absolute path (`/projects`, `/#about`) into a relative href.
    pub fn href(&self, path: &str) -> String {
        site_href(self.root, path)
    }

    pub fn image(&self, src: Option<&str>, alt: &str, size: ImageSize) -> Markup {
        let resolved = self.images.resolve(src.unwrap_or_default(), alt, size, self.root);
        let fallback = self.images.placeholder(alt, size);
        html! {
            img src=(resolved) alt=(alt) width=(size.width) height=(size.height) loading="lazy"
                onerror={ "this.onerror=null;this.src='" (fallback) "'" };
        }
    }

    /// Resolve image URLs and serialize for a `data-preview` attribute.
    pub fn preview_json(&self, mut request: PreviewRequest) -> Result<String, RenderError> {
        let title = request.title.clone();
        request.images = request
            .images
            .iter()
            .map(|src| self.images.resolve(src, &title, ImageSize::PREVIEW, self.root))
            .collect();
        Ok(serde_json::to_string(&request)?)
    }
}

pub fn site_href(root: &str, path: &str) -> String {
    if is_remote(path) || path.starts_with("mailto:") || path.starts_with("tel:") {
        return path.to_string();
    }
    let rest = path.trim_start_matches('/');
    if rest.is_empty() {
        if root.is_empty() {
            "./".to_string()
        } else {
            root.to_string()
        }
    } else if rest.starts_with('#') || rest.contains('.') {
        format!("{root}{rest}")
    } else {
        format!("{root}{}/", rest.trim_end_matches('/'))
    }
}

/// First `max` items plus how many were hidden.
pub fn truncate_list(items: &[String], max: usize) -> (&[String], usize) {
    if items.len() <= max {
        (items, 0)
    } else {
        (&items[..max], items.len() - max)
    }
}

pub fn markdown(source: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(source));
    PreEscaped(out)
}

// ============================================================================
// Primitives
// ============================================================================

pub fn badge(text: &str) -> Markup {
    html! { span.badge { (text) } }
}

/// Badges truncated to `max` with a trailing `+N`.
pub fn badge_list(items: &[String], max: usize) -> Markup {
    let (shown, hidden) = truncate_list(items, max);
    html! {
        @if !shown.is_empty() {
            div.badges {
                @for item in shown { (badge(item)) }
                @if hidden > 0 {
                    span.badge.badge-more title={ (hidden) " more" } { "+" (hidden) }
                }
            }
        }
    }
}

pub fn button_link(label: &str, href: &str, icon: Option<Icon>, primary: bool) -> Markup {
    let external = is_remote(href);
    html! {
        a.button.button-primary[primary].button-secondary[!primary] href=(href)
            target=[external.then_some("_blank")] rel=[external.then_some("noopener noreferrer")] {
            @if let Some(icon) = icon { (icon.render()) }
            span { (label) }
        }
    }
}

pub fn section(id: &str, title: &str, subtitle: Option<&str>, body: Markup) -> Markup {
    html! {
        section.section id=(id) data-section=(id) aria-labelledby={ (id) "-title" } {
            div.container {
                header.section-header {
                    h2.section-title id={ (id) "-title" } { (title) }
                    @if let Some(subtitle) = subtitle {
                        p.section-subtitle { (subtitle) }
                    }
                }
                (body)
            }
        }
    }
}

pub fn skip_link() -> Markup {
    html! { a.skip-link href="#main-content" { "Skip to main content" } }
}

pub fn theme_toggle(theme: &ThemeStore) -> Markup {
    let next = theme.theme().toggled();
    let label = match next {
        Theme::Dark => "Switch to dark mode",
        Theme::Light => "Switch to light mode",
    };
    html! {
        button.theme-toggle type="button" id="theme-toggle" aria-label=(label) title=(label) {
            span.theme-icon-light { (Icon::Sun.render()) }
            span.theme-icon-dark { (Icon::Moon.render()) }
        }
    }
}

fn record_links(links: &[(&str, Option<&String>, Icon)]) -> Markup {
    let links: Vec<(&str, &String, Icon)> = links
        .iter()
        .filter_map(|&(label, url, icon)| {
            url.filter(|u| !u.trim().is_empty()).map(|u| (label, u, icon))
        })
        .collect();
    html! {
        @if !links.is_empty() {
            div.card-links {
                @for (label, url, icon) in links {
                    a.card-link href=(url) target="_blank" rel="noopener noreferrer" aria-label=(label) {
                        (icon.render()) span { (label) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Cards
// ============================================================================

fn card_shell(kind: &str, title: &str, preview: String, category: Option<&str>, body: Markup) -> Markup {
    html! {
        article class={ "card card-" (kind) } data-preview=(preview) data-category=[category]
            tabindex="0" role="button" aria-haspopup="dialog" aria-label={ "View details for " (title) } {
            (body)
        }
    }
}

pub fn project_card(ctx: &RenderContext, project: &Project) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_project(project))?;
    let cover = ContentRecord::Project(project).images().into_iter().next();
    let (highlights, _) = truncate_list(&project.highlights, ctx.config.layout.max_highlights);

    let body = html! {
        div.card-media {
            (ctx.image(cover.as_deref(), &project.title, ImageSize::CARD))
            @if project.featured { span.badge.badge-featured { "Featured" } }
        }
        div.card-body {
            div.card-meta {
                @if let Some(category) = &project.category { span.card-category { (category) } }
                @if let Some(status) = &project.status { span.card-status { (status) } }
            }
            h3.card-title { (project.title) }
            p.card-text { (project.description) }
            (badge_list(&project.tech_stack, ctx.config.layout.max_tech_stack))
            @if !highlights.is_empty() {
                ul.card-highlights { @for h in highlights { li { (h) } } }
            }
            (record_links(&[
                ("Code", project.links.github.as_ref(), Icon::Github),
                ("Live", project.links.live.as_ref(), Icon::ExternalLink),
                ("Demo", project.links.demo.as_ref(), Icon::Play),
            ]))
        }
    };
    Ok(card_shell("project", &project.title, preview, project.category.as_deref(), body))
}

pub fn experience_card(ctx: &RenderContext, exp: &Experience) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_experience(exp))?;
    let (highlights, _) = truncate_list(&exp.highlights, ctx.config.layout.max_highlights);
    let period = dates::format_period(Some(&exp.start_date), exp.end_date.as_deref(), exp.current);
    let duration = dates::duration(
        Some(&exp.start_date),
        exp.end_date.as_deref(),
        exp.current,
        dates::today(),
    );

    let body = html! {
        div.card-body {
            div.card-heading {
                @if exp.company_logo.is_some() {
                    div.card-logo { (ctx.image(exp.company_logo.as_deref(), &exp.company, ImageSize::LOGO)) }
                }
                div {
                    h3.card-title { (exp.title) }
                    p.card-subtitle { (Icon::Briefcase.render()) " " (exp.company) }
                }
                @if exp.current { span.badge.badge-current { "Current" } }
            }
            div.card-meta {
                @if !period.is_empty() {
                    span { (Icon::Calendar.render()) " " (period) }
                    span.card-duration { (duration) }
                }
                @if let Some(location) = &exp.location { span { (Icon::MapMarker.render()) " " (location) } }
                @if let Some(kind) = &exp.kind { span.card-category { (kind) } }
            }
            p.card-text { (exp.description) }
            @if !highlights.is_empty() {
                ul.card-highlights { @for h in highlights { li { (h) } } }
            }
            (badge_list(&exp.technologies, ctx.config.layout.max_tech_stack))
        }
    };
    Ok(card_shell("experience", &exp.title, preview, None, body))
}

pub fn education_card(ctx: &RenderContext, edu: &Education) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_education(edu))?;
    let title = edu.display_title();
    let (start, end) = (edu.start_date.as_deref(), edu.end_date.as_deref());
    let period = dates::format_period(start, end, edu.current);
    let duration = dates::duration(start, end, edu.current, dates::today());
    let (achievements, hidden) = truncate_list(&edu.achievements, ctx.config.layout.max_highlights);

    let body = html! {
        div.card-body {
            div.card-heading {
                span.card-icon { (Icon::GraduationCap.render()) }
                div {
                    h3.card-title { (title) }
                    p.card-subtitle { (edu.institution) }
                }
                @if edu.current { span.badge.badge-current { "In progress" } }
            }
            div.card-meta {
                @if !period.is_empty() {
                    span { (Icon::Calendar.render()) " " (period) }
                    span.card-duration { (duration) }
                }
                @if let Some(location) = &edu.location { span { (Icon::MapMarker.render()) " " (location) } }
                @if let Some(grade) = &edu.grade { span.card-grade { (grade) } }
            }
            @if !edu.description.is_empty() { p.card-text { (edu.description) } }
            @if !achievements.is_empty() {
                ul.card-highlights {
                    @for a in achievements { li { (a) } }
                    @if hidden > 0 { li.more { "+" (hidden) " more" } }
                }
            }
        }
    };
    Ok(card_shell("education", &title, preview, None, body))
}

pub fn achievement_card(ctx: &RenderContext, item: &Achievement) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_achievement(item))?;
    let icon = Icon::resolve(item.icon.as_deref(), Icon::Trophy);
    let date = dates::format_short(item.date.as_deref());

    let body = html! {
        div.card-body {
            div.card-heading {
                span.card-icon { (icon.render()) }
                div {
                    h3.card-title { (item.title) }
                    @if !date.is_empty() { p.card-subtitle { (date) } }
                }
            }
            @if let Some(category) = &item.category { span.card-category { (category) } }
            p.card-text { (item.description) }
            (record_links(&[("View", item.link.as_ref(), Icon::ExternalLink)]))
        }
    };
    Ok(card_shell("achievement", &item.title, preview, item.category.as_deref(), body))
}

pub fn certification_card(ctx: &RenderContext, cert: &Certification) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_certification(cert))?;
    let icon = Icon::resolve(cert.icon.as_deref(), Icon::Certificate);
    let date = dates::format_short(cert.date.as_deref());

    let body = html! {
        div.card-body {
            div.card-heading {
                span.card-icon { (icon.render()) }
                div {
                    h3.card-title { (cert.title) }
                    p.card-subtitle { (cert.issuer) @if !date.is_empty() { " · " (date) } }
                }
            }
            @if !cert.description.is_empty() { p.card-text { (cert.description) } }
            (record_links(&[("Credential", cert.credential_url.as_ref(), Icon::ExternalLink)]))
        }
    };
    Ok(card_shell("certification", &cert.title, preview, None, body))
}

pub fn activity_card(ctx: &RenderContext, activity: &Activity) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_activity(activity))?;
    let date = dates::format_short(activity.date.as_deref());
    let cover = ContentRecord::Activity(activity).images().into_iter().next();

    let body = html! {
        @if cover.is_some() {
            div.card-media { (ctx.image(cover.as_deref(), &activity.title, ImageSize::CARD)) }
        }
        div.card-body {
            h3.card-title { (activity.title) }
            div.card-meta {
                @if let Some(issuer) = &activity.issuer { span { (Icon::Users.render()) " " (issuer) } }
                @if !date.is_empty() { span { (Icon::Calendar.render()) " " (date) } }
            }
            p.card-text { (activity.description) }
            (record_links(&[("Details", activity.link.as_ref(), Icon::ExternalLink)]))
        }
    };
    Ok(card_shell("activity", &activity.title, preview, None, body))
}

/// Card for any content record.
pub fn record_card(ctx: &RenderContext, record: ContentRecord<'_>) -> Result<Markup, RenderError> {
    match record {
        ContentRecord::Project(r) => project_card(ctx, r),
        ContentRecord::Experience(r) => experience_card(ctx, r),
        ContentRecord::Education(r) => education_card(ctx, r),
        ContentRecord::Achievement(r) => achievement_card(ctx, r),
        ContentRecord::Certification(r) => certification_card(ctx, r),
        ContentRecord::Activity(r) => activity_card(ctx, r),
    }
}

pub fn skill_chip(
    ctx: &RenderContext,
    category: &SkillCategory,
    skill: &Skill,
) -> Result<Markup, RenderError> {
    let preview = ctx.preview_json(PreviewRequest::for_skill(ctx.store, category, skill))?;
    Ok(html! {
        button.skill-chip type="button" data-preview=(preview) aria-haspopup="dialog" {
            span.skill-name { (skill.name) }
            @if let Some(level) = &skill.level { span.skill-level { (level) } }
        }
    })
}

// ============================================================================
// Chrome: navigation, footer, overlay, contact form
// ============================================================================

/// Top navigation. `active` is the section id highlighted initially; on the
/// home page the browser script keeps it current while scrolling.
pub fn navbar(ctx: &RenderContext, entries: &[NavigationEntry], active: Option<&str>) -> Markup {
    let profile = &ctx.store.profile;
    html! {
        header.site-header {
            nav.navbar aria-label="Main navigation" {
                a.brand href=(ctx.href("/")) { (profile.name) }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" aria-label="Toggle navigation" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                ul.nav-links {
                    @for entry in entries {
                        @let is_active = active == Some(entry.id.as_str());
                        li {
                            a.nav-link.active[is_active] href=(ctx.href(&entry.path))
                                data-section=(entry.id) aria-label=(entry.aria_label)
                                aria-current=[is_active.then_some("true")] {
                                (entry.name)
                            }
                        }
                    }
                }
                (theme_toggle(ctx.theme))
            }
        }
    }
}

pub fn social_links(social: &SocialLinks) -> Markup {
    let links = [
        ("GitHub", social.github.as_ref(), Icon::Github),
        ("LinkedIn", social.linkedin.as_ref(), Icon::Linkedin),
        ("Twitter", social.twitter.as_ref(), Icon::Twitter),
        ("YouTube", social.youtube.as_ref(), Icon::Youtube),
    ];
    html! {
        ul.social-links {
            @for (label, url, icon) in links {
                @if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
                    li {
                        a href=(url) target="_blank" rel="noopener noreferrer" aria-label=(label) {
                            (icon.render())
                        }
                    }
                }
            }
        }
    }
}

pub fn footer(ctx: &RenderContext, entries: &[NavigationEntry]) -> Markup {
    let profile = &ctx.store.profile;
    let year = chrono::Local::now().year();
    html! {
        footer.site-footer {
            div.container {
                div.footer-brand {
                    p.footer-name { (profile.name) }
                    p.footer-title { (profile.title) }
                }
                nav aria-label="Footer navigation" {
                    ul.footer-links {
                        @for entry in entries {
                            li { a href=(ctx.href(&entry.path)) { (entry.name) } }
                        }
                    }
                }
                (social_links(&profile.social))
                p.copyright { "© " (year) " " (profile.name) }
            }
        }
    }
}

/// Empty overlay skeleton filled in by the browser script from a card's
/// `data-preview` payload. Visibility and the exit delay come from `state`.
pub fn preview_overlay(state: &PreviewController) -> Markup {
    html! {
        div.preview-overlay id="preview-overlay" hidden[!state.is_visible()]
            data-close-delay-ms=(state.close_delay().as_millis()) {
            div.preview-backdrop data-preview-close {}
            aside.preview-panel role="dialog" aria-modal="true" aria-labelledby="preview-title" {
                button.preview-close type="button" data-preview-close aria-label="Close preview" { "×" }
                div.preview-gallery {
                    img.preview-image alt="";
                    button.preview-prev type="button" aria-label="Previous image" { "‹" }
                    button.preview-next type="button" aria-label="Next image" { "›" }
                    span.preview-counter aria-live="polite" {}
                    div.preview-thumbs {}
                }
                div.preview-content {
                    h2.preview-title id="preview-title" {}
                    div.preview-description {}
                    dl.preview-metadata {}
                    div.preview-tags {}
                    ul.preview-highlights {}
                    div.preview-links {}
                }
            }
        }
    }
}

/// Contact form. Validation limits and status messages are carried as data
/// attributes so the browser script uses the same rules as
/// [`ContactController`](crate::contact::ContactController).
pub fn contact_form(ctx: &RenderContext) -> Markup {
    let profile = &ctx.store.profile;
    let relay = ctx.relay;
    let creds = relay.credentials();
    html! {
        div.contact-grid {
            div.contact-info {
                h3 { "Get in touch" }
                p { "Have a project in mind or just want to say hello? Send a message." }
                ul.contact-details {
                    li { (Icon::Envelope.render()) " " a href={ "mailto:" (profile.email) } { (profile.email) } }
                    @if let Some(phone) = &profile.phone {
                        li { (Icon::Phone.render()) " " a href={ "tel:" (phone) } { (phone) } }
                    }
                    @if let Some(location) = &profile.location {
                        li { (Icon::MapMarker.render()) " " (location) }
                    }
                }
                (social_links(&profile.social))
            }
            form.contact-form id="contact-form" novalidate
                data-recipient=(profile.email)
                data-recipient-name=(profile.name)
                data-relay-endpoint=[creds.map(|_| relay.endpoint.trim())]
                data-relay-service=[creds.map(|c| c.service_id)]
                data-relay-template=[creds.map(|c| c.template_id)]
                data-relay-key=[creds.map(|c| c.public_key)]
                data-name-min=(contact::NAME_MIN)
                data-name-max=(contact::NAME_MAX)
                data-message-min=(contact::MESSAGE_MIN)
                data-message-max=(contact::MESSAGE_MAX)
                data-mailto-subject=(contact::MAILTO_SUBJECT)
                data-msg-invalid=(contact::INVALID_FORM)
                data-msg-success=(contact::SEND_SUCCESS)
                data-msg-failure=(contact::SEND_FAILURE)
                data-msg-mailto=(contact::OPENING_MAIL_CLIENT) {
                div.form-field {
                    label for="contact-name" { "Name" }
                    input id="contact-name" type="text" name=(Field::Name.key()) autocomplete="name"
                        maxlength=(contact::NAME_MAX) required aria-describedby="contact-name-error";
                    span.field-error id="contact-name-error" data-error-for=(Field::Name.key()) aria-live="polite" {}
                }
                div.form-field {
                    label for="contact-email" { "Email" }
                    input id="contact-email" type="email" name=(Field::Email.key()) autocomplete="email"
                        required aria-describedby="contact-email-error";
                    span.field-error id="contact-email-error" data-error-for=(Field::Email.key()) aria-live="polite" {}
                }
                div.form-field {
                    label for="contact-message" { "Message" }
                    textarea id="contact-message" name=(Field::Message.key()) rows="6"
                        maxlength=(contact::MESSAGE_MAX) required aria-describedby="contact-message-error" {}
                    span.field-error id="contact-message-error" data-error-for=(Field::Message.key()) aria-live="polite" {}
                }
                div.form-status role="status" aria-live="polite" {}
                button.button.button-primary type="submit" { (Icon::Envelope.render()) span { "Send Message" } }
            }
        }
    }
}
