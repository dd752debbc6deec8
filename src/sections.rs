//! Active-section tracking for the home page navigation.
//!
//! The navbar highlights the section the visitor is looking at. On every
//! scroll or resize event (debounced) the tracker reads each known section's
//! viewport-relative bounds and picks the visible section whose top edge is
//! closest to one third of the viewport height.
//!
//! A section is a candidate when it is at least partly on screen:
//!
//! ```text
//! top <= viewport_height - edge_margin   and   bottom > edge_margin
//! ```
//!
//! With no candidate the first section (`home`) wins. The tracker keeps no
//! history: each evaluation is derived from the current layout only.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);
pub const DEFAULT_EDGE_MARGIN: f64 = 100.0;

/// Read access to the live page layout.
pub trait SectionLayout {
    fn viewport_height(&self) -> f64;
    /// Viewport-relative `(top, bottom)` of a section, `None` if not on the page.
    fn bounds(&self, section_id: &str) -> Option<(f64, f64)>;
}

/// Pick the active section id from the current layout.
///
/// Ties keep the earlier section in `section_ids` order.
pub fn detect_active<'a>(
    section_ids: &'a [String],
    layout: &dyn SectionLayout,
    edge_margin: f64,
) -> Option<&'a str> {
    let height = layout.viewport_height();
    let anchor = height / 3.0;
    let mut best: Option<(&str, f64)> = None;

    for id in section_ids {
        let Some((top, bottom)) = layout.bounds(id) else {
            continue;
        };
        if top > height - edge_margin || bottom <= edge_margin {
            continue;
        }
        let distance = (top - anchor).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((id.as_str(), distance));
        }
    }

    best.map(|(id, _)| id).or(section_ids.first().map(String::as_str))
}

#[derive(Debug)]
pub struct ActiveSectionTracker {
    section_ids: Vec<String>,
    current: String,
    debounce: Duration,
    edge_margin: f64,
    pending: Option<Instant>,
}

impl ActiveSectionTracker {
    /// `section_ids` in page order; the first one is the fallback.
    pub fn new(section_ids: Vec<String>, debounce: Duration, edge_margin: f64) -> Self {
        let current = section_ids.first().cloned().unwrap_or_default();
        Self {
            section_ids,
            current,
            debounce,
            edge_margin,
            pending: None,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn section_ids(&self) -> &[String] {
        &self.section_ids
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn edge_margin(&self) -> f64 {
        self.edge_margin
    }

    /// Record a scroll or resize event. Each event restarts the quiet period.
    pub fn on_event(&mut self, now: Instant) {
        self.pending = Some(now + self.debounce);
    }

    /// Re-derive if the debounce period has passed. Returns whether the active
    /// section changed.
    pub fn poll(&mut self, now: Instant, layout: &dyn SectionLayout) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                self.observe_now(layout)
            }
            _ => false,
        }
    }

    /// Re-derive immediately, bypassing the debounce (initial render).
    pub fn observe_now(&mut self, layout: &dyn SectionLayout) -> bool {
        let next = detect_active(&self.section_ids, layout, self.edge_margin)
            .unwrap_or_default()
            .to_string();
        let changed = next != self.current;
        self.current = next;
        changed
    }

    pub fn reset(&mut self) {
        self.current = self.section_ids.first().cloned().unwrap_or_default();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeLayout {
        height: f64,
        sections: HashMap<&'static str, (f64, f64)>,
    }

    impl FakeLayout {
        fn new(height: f64, sections: &[(&'static str, f64, f64)]) -> Self {
            Self {
                height,
                sections: sections.iter().map(|(id, t, b)| (*id, (*t, *b))).collect(),
            }
        }
    }

    impl SectionLayout for FakeLayout {
        fn viewport_height(&self) -> f64 {
            self.height
        }
        fn bounds(&self, section_id: &str) -> Option<(f64, f64)> {
            self.sections.get(section_id).copied()
        }
    }

    fn ids() -> Vec<String> {
        ["home", "about", "skills", "projects", "contact"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn selects_visible_section_near_upper_third() {
        let layout = FakeLayout::new(
            1000.0,
            &[
                ("home", -2000.0, -1200.0),
                ("about", -1200.0, 50.0),
                ("skills", 50.0, 800.0),
                ("projects", 1200.0, 2000.0),
            ],
        );
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("skills"));
    }

    #[test]
    fn falls_back_to_first_section_when_nothing_visible() {
        let layout = FakeLayout::new(1000.0, &[("about", 2000.0, 2500.0)]);
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("home"));
    }

    #[test]
    fn missing_sections_are_skipped() {
        let layout = FakeLayout::new(1000.0, &[("contact", 300.0, 900.0)]);
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("contact"));
    }

    #[test]
    fn closest_to_anchor_wins_among_visible() {
        // anchor = 400; about is 350 away, skills is 50 away
        let layout = FakeLayout::new(
            1200.0,
            &[("about", 50.0, 420.0), ("skills", 450.0, 1500.0)],
        );
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("skills"));
    }

    #[test]
    fn section_ending_within_margin_is_not_visible() {
        let layout = FakeLayout::new(1000.0, &[("about", -500.0, 100.0)]);
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("home"));
    }

    #[test]
    fn ties_keep_earlier_section() {
        let layout = FakeLayout::new(
            900.0,
            &[("about", 200.0, 600.0), ("skills", 400.0, 900.0)],
        );
        // anchor = 300: both are 100 away
        assert_eq!(detect_active(&ids(), &layout, 100.0), Some("about"));
    }

    #[test]
    fn empty_section_list_yields_none() {
        let layout = FakeLayout::new(1000.0, &[]);
        assert_eq!(detect_active(&[], &layout, 100.0), None);
    }

    #[test]
    fn tracker_starts_at_first_section() {
        let tracker = ActiveSectionTracker::new(ids(), DEFAULT_DEBOUNCE, DEFAULT_EDGE_MARGIN);
        assert_eq!(tracker.current(), "home");
    }

    #[test]
    fn poll_waits_for_debounce() {
        let layout = FakeLayout::new(1000.0, &[("projects", 100.0, 900.0)]);
        let mut tracker = ActiveSectionTracker::new(ids(), DEFAULT_DEBOUNCE, DEFAULT_EDGE_MARGIN);
        let t0 = Instant::now();

        tracker.on_event(t0);
        assert!(!tracker.poll(t0 + Duration::from_millis(49), &layout));
        assert_eq!(tracker.current(), "home");

        assert!(tracker.poll(t0 + Duration::from_millis(50), &layout));
        assert_eq!(tracker.current(), "projects");
    }

    #[test]
    fn later_events_restart_the_quiet_period() {
        let layout = FakeLayout::new(1000.0, &[("about", 100.0, 900.0)]);
        let mut tracker = ActiveSectionTracker::new(ids(), DEFAULT_DEBOUNCE, DEFAULT_EDGE_MARGIN);
        let t0 = Instant::now();

        tracker.on_event(t0);
        tracker.on_event(t0 + Duration::from_millis(40));
        assert!(!tracker.poll(t0 + Duration::from_millis(60), &layout));
        assert!(tracker.poll(t0 + Duration::from_millis(90), &layout));
        assert_eq!(tracker.current(), "about");
    }

    #[test]
    fn poll_without_event_does_nothing() {
        let layout = FakeLayout::new(1000.0, &[("about", 100.0, 900.0)]);
        let mut tracker = ActiveSectionTracker::new(ids(), DEFAULT_DEBOUNCE, DEFAULT_EDGE_MARGIN);
        assert!(!tracker.poll(Instant::now() + Duration::from_secs(1), &layout));
        assert_eq!(tracker.current(), "home");
    }

    #[test]
    fn reset_returns_to_home() {
        let layout = FakeLayout::new(1000.0, &[("skills", 100.0, 900.0)]);
        let mut tracker = ActiveSectionTracker::new(ids(), DEFAULT_DEBOUNCE, DEFAULT_EDGE_MARGIN);
        tracker.observe_now(&layout);
        assert_eq!(tracker.current(), "skills");
        tracker.reset();
        assert_eq!(tracker.current(), "home");
    }
}
