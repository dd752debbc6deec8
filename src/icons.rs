//! Icon registry.
//!
//! Data files name icons by string key (`"FaTrophy"`, `"SiPostman"`, ...). The
//! keys resolve through a closed mapping to [`Icon`]; unknown keys fall back to
//! a caller-chosen default so a typo in a data file never breaks a page.

use maud::{Markup, html};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Trophy,
    Medal,
    Download,
    Lightbulb,
    Users,
    Certificate,
    Postman,
    Udemy,
    Code,
    Github,
    Linkedin,
    Twitter,
    Youtube,
    Envelope,
    Phone,
    MapMarker,
    Calendar,
    Tag,
    Briefcase,
    GraduationCap,
    ExternalLink,
    Play,
    Sun,
    Moon,
}

impl Icon {
    /// Resolve a data-file key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Icon> {
        let icon = match key {
            "FaTrophy" => Icon::Trophy,
            "FaMedal" => Icon::Medal,
            "FaDownload" => Icon::Download,
            "FaLightbulb" => Icon::Lightbulb,
            "FaUsers" => Icon::Users,
            "FaCertificate" | "FaJava" => Icon::Certificate,
            "SiPostman" => Icon::Postman,
            "SiUdemy" => Icon::Udemy,
            "FaCode" => Icon::Code,
            "FaGithub" => Icon::Github,
            "FaLinkedin" => Icon::Linkedin,
            "FaTwitter" => Icon::Twitter,
            "FaYoutube" => Icon::Youtube,
            "FaEnvelope" => Icon::Envelope,
            "FaPhone" => Icon::Phone,
            "FaMapMarkerAlt" => Icon::MapMarker,
            "FaCalendar" => Icon::Calendar,
            "FaTag" => Icon::Tag,
            "FaBriefcase" => Icon::Briefcase,
            "FaGraduationCap" => Icon::GraduationCap,
            "FaExternalLinkAlt" => Icon::ExternalLink,
            "FaPlay" => Icon::Play,
            _ => return None,
        };
        Some(icon)
    }

    /// Resolve an optional key, falling back to `default`.
    pub fn resolve(key: Option<&str>, default: Icon) -> Icon {
        key.and_then(Icon::from_key).unwrap_or(default)
    }

    /// Stable slug used for CSS classes and serialized previews.
    pub fn slug(self) -> &'static str {
        match self {
            Icon::Trophy => "trophy",
            Icon::Medal => "medal",
            Icon::Download => "download",
            Icon::Lightbulb => "lightbulb",
            Icon::Users => "users",
            Icon::Certificate => "certificate",
            Icon::Postman => "postman",
            Icon::Udemy => "udemy",
            Icon::Code => "code",
            Icon::Github => "github",
            Icon::Linkedin => "linkedin",
            Icon::Twitter => "twitter",
            Icon::Youtube => "youtube",
            Icon::Envelope => "envelope",
            Icon::Phone => "phone",
            Icon::MapMarker => "map-marker",
            Icon::Calendar => "calendar",
            Icon::Tag => "tag",
            Icon::Briefcase => "briefcase",
            Icon::GraduationCap => "graduation-cap",
            Icon::ExternalLink => "external-link",
            Icon::Play => "play",
            Icon::Sun => "sun",
            Icon::Moon => "moon",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Icon::Trophy => "🏆",
            Icon::Medal => "🏅",
            Icon::Download => "⬇",
            Icon::Lightbulb => "💡",
            Icon::Users => "👥",
            Icon::Certificate | Icon::Postman | Icon::Udemy => "📜",
            Icon::Code => "</>",
            Icon::Github => "GH",
            Icon::Linkedin => "in",
            Icon::Twitter => "X",
            Icon::Youtube => "▶",
            Icon::Envelope => "✉",
            Icon::Phone => "☎",
            Icon::MapMarker => "📍",
            Icon::Calendar => "📅",
            Icon::Tag => "🏷",
            Icon::Briefcase => "💼",
            Icon::GraduationCap => "🎓",
            Icon::ExternalLink => "↗",
            Icon::Play => "▶",
            Icon::Sun => "☀",
            Icon::Moon => "☾",
        }
    }

    /// Decorative inline icon; hidden from assistive technology.
    pub fn render(self) -> Markup {
        html! {
            span class={ "icon icon-" (self.slug()) } aria-hidden="true" { (self.glyph()) }
        }
    }
}

impl Serialize for Icon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}
