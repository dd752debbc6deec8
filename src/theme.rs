//! Light/dark theme state.
//!
//! A single [`ThemeStore`] is created at the root and handed by reference (or
//! cheap clone) to everything that renders theme-dependent output. Clones
//! share one state cell, so a toggle through any handle is seen by every
//! subscriber.
//!
//! Initial theme resolution, first match wins:
//!
//! 1. persisted visitor preference
//! 2. system preference (`prefers-color-scheme`)
//! 3. configured fallback

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Theme> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(Theme)>;

struct State {
    theme: Theme,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Shared, observable theme flag.
#[derive(Clone)]
pub struct ThemeStore {
    state: Rc<RefCell<State>>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ThemeStore")
            .field("theme", &state.theme)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl ThemeStore {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                theme,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Resolve the starting theme from persisted and system preferences.
    pub fn initialize(
        persisted: Option<Theme>,
        system_prefers_dark: Option<bool>,
        fallback: Theme,
    ) -> Self {
        let theme = persisted
            .or(system_prefers_dark.map(|dark| if dark { Theme::Dark } else { Theme::Light }))
            .unwrap_or(fallback);
        Self::new(theme)
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    /// Set the theme, notifying subscribers only on change.
    ///
    /// Listeners must not call `set`/`toggle` re-entrantly.
    pub fn set(&self, theme: Theme) {
        {
            let mut state = self.state.borrow_mut();
            if state.theme == theme {
                return;
            }
            state.theme = theme;
        }
        let state = self.state.borrow();
        for (_, listener) in &state.listeners {
            listener(theme);
        }
    }

    pub fn toggle(&self) -> Theme {
        let next = self.theme().toggled();
        self.set(next);
        next
    }

    pub fn subscribe(&self, listener: impl Fn(Theme) + 'static) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.state.borrow_mut().listeners.retain(|(sid, _)| *sid != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn persisted_preference_wins() {
        let store = ThemeStore::initialize(Some(Theme::Light), Some(true), Theme::Dark);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn system_preference_used_without_persisted() {
        let store = ThemeStore::initialize(None, Some(true), Theme::Light);
        assert!(store.is_dark());
    }

    #[test]
    fn fallback_when_nothing_known() {
        let store = ThemeStore::initialize(None, None, Theme::Dark);
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn toggle_notifies_subscribers() {
        let store = ThemeStore::new(Theme::Light);
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        store.subscribe(move |t| sink.set(Some(t)));

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(seen.get(), Some(Theme::Dark));
    }

    #[test]
    fn clones_share_state() {
        let store = ThemeStore::new(Theme::Light);
        let handle = store.clone();
        handle.toggle();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn setting_same_theme_does_not_notify() {
        let store = ThemeStore::new(Theme::Dark);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        store.subscribe(move |_| counter.set(counter.get() + 1));
        store.set(Theme::Dark);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let store = ThemeStore::new(Theme::Light);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let id = store.subscribe(move |_| counter.set(counter.get() + 1));
        store.unsubscribe(id);
        store.toggle();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn parse_round_trips_names() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(Theme::Light.as_str()), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
