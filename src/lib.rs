//! # Folio
//!
//! A static site generator for personal developer portfolios. A directory of
//! JSON documents (profile, skills, projects, experience, education,
//! achievements, certifications, activities) becomes a small static site.
//!
//! # Architecture
//!
//! ```text
//! content/*.json ─┐
//! config.toml    ─┼─▶ ContentStore + SiteConfig ─▶ generate ─▶ dist/
//! relay.toml/env ─┘                                  │
//!                                      components (maud) + static/site.js
//! ```
//!
//! Everything interactive on the generated site (preview overlay, active
//! section tracking, theme toggle, project filters, contact form) runs in a
//! small vanilla script. The same behavior is modeled in Rust as plain state
//! machines ([`preview`], [`sections`], [`theme`], [`contact`]) which the
//! generator uses to decide initial state and which the CLI `contact` command
//! drives directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Loads and validates the JSON documents into a [`content::ContentStore`] |
//! | [`types`] | Content types shared by the loader, previews and renderers |
//! | [`config`] | `config.toml` loading, validation, stock defaults and color CSS |
//! | [`router`] | Path to page mapping and output file names |
//! | [`generate`] | Renders every page with a per-page error boundary |
//! | [`components`] | Maud building blocks: cards, navbar, footer, overlay, contact form |
//! | [`preview`] | Overlay payloads per record kind and the overlay state machine |
//! | [`sections`] | Active-section detection for the home page navigation |
//! | [`theme`] | Light/dark theme state with persistence and subscribers |
//! | [`contact`] | Contact form validation, submission and mailto fallback |
//! | [`relay`] | Mail relay configuration and HTTP client |
//! | [`dates`] | Date parsing and display formatting |
//! | [`icons`] | Inline SVG icon set |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are Rust
//! expressions, so a renamed content field is a compile error, and all
//! interpolation is escaped by default.
//!
//! ## Previews Travel With Their Cards
//!
//! Each card carries its overlay payload as JSON in a `data-preview`
//! attribute. Opening a preview never fetches anything, and the payload is
//! built by the same [`preview::PreviewRequest`] constructors the tests check.
//!
//! ## Relay Credentials Never Live In Content
//!
//! Mail relay keys come from the environment or an untracked `relay.toml`.
//! When any key is missing the site still works: the form falls back to a
//! `mailto:` link.

pub mod components;
pub mod config;
pub mod contact;
pub mod content;
pub mod dates;
pub mod generate;
pub mod icons;
pub mod output;
pub mod preview;
pub mod relay;
pub mod router;
pub mod sections;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
