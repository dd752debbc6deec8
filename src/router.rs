//! Path → page mapping.
//!
//! | Path | Route | Output file |
//! |------|-------|-------------|
//! | `/`, `/#section` | [`Route::Home`] | `index.html` |
//! | `/projects` | [`Route::Projects`] | `projects/index.html` |
//! | `/achievements` | [`Route::Achievements`] | `achievements/index.html` |
//! | `/experience` | [`Route::Experience`] | `experience/index.html` |
//! | `/education` | [`Route::Education`] | `education/index.html` |
//! | anything else | [`Route::NotFound`] | `404.html` |

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Home page, optionally scrolled to a section fragment.
    Home { section: Option<String> },
    Projects,
    Achievements,
    Experience,
    Education,
    NotFound,
}

impl Route {
    /// Every page the generator writes, in build order.
    pub fn pages() -> [Route; 6] {
        [
            Route::Home { section: None },
            Route::Projects,
            Route::Achievements,
            Route::Experience,
            Route::Education,
            Route::NotFound,
        ]
    }

    pub fn resolve(path: &str) -> Route {
        let (path, fragment) = match path.split_once('#') {
            Some((p, f)) => (p, Some(f)),
            None => (path, None),
        };
        let path = path.split('?').next().unwrap_or_default();
        let path = path.strip_suffix("index.html").unwrap_or(path);
        let path = path.trim_end_matches('/');

        match path {
            "" => Route::Home {
                section: fragment.filter(|f| !f.is_empty()).map(str::to_string),
            },
            "/projects" => Route::Projects,
            "/achievements" => Route::Achievements,
            "/experience" => Route::Experience,
            "/education" => Route::Education,
            _ => Route::NotFound,
        }
    }

    /// Canonical URL path.
    pub fn path(&self) -> String {
        match self {
            Route::Home { section: Some(s) } => format!("/#{s}"),
            Route::Home { section: None } => "/".into(),
            Route::Projects => "/projects".into(),
            Route::Achievements => "/achievements".into(),
            Route::Experience => "/experience".into(),
            Route::Education => "/education".into(),
            Route::NotFound => "/404".into(),
        }
    }

    /// File written under the output directory.
    pub fn output_path(&self) -> &'static str {
        match self {
            Route::Home { .. } => "index.html",
            Route::Projects => "projects/index.html",
            Route::Achievements => "achievements/index.html",
            Route::Experience => "experience/index.html",
            Route::Education => "education/index.html",
            Route::NotFound => "404.html",
        }
    }

    /// Page name used in `<title>`; `None` for the home page.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Route::Home { .. } => None,
            Route::Projects => Some("Projects"),
            Route::Achievements => Some("Achievements"),
            Route::Experience => Some("Experience"),
            Route::Education => Some("Education"),
            Route::NotFound => Some("Page Not Found"),
        }
    }

    /// Prefix from this page back to the site root. The not-found page is
    /// served for arbitrary paths, so its links are root-absolute.
    pub fn root_prefix(&self) -> &'static str {
        match self {
            Route::Home { .. } => "",
            Route::NotFound => "/",
            _ => "../",
        }
    }

    /// Navigation entry highlighted when this page is shown.
    pub fn nav_section(&self) -> Option<&'static str> {
        match self {
            Route::Home { .. } => Some("home"),
            Route::Projects => Some("projects"),
            Route::Achievements => Some("achievements"),
            Route::Experience => Some("experience"),
            Route::Education => Some("education"),
            Route::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves_to_home() {
        assert_eq!(Route::resolve("/"), Route::Home { section: None });
        assert_eq!(Route::resolve(""), Route::Home { section: None });
        assert_eq!(Route::resolve("/index.html"), Route::Home { section: None });
    }

    #[test]
    fn fragment_selects_home_section() {
        assert_eq!(
            Route::resolve("/#contact"),
            Route::Home {
                section: Some("contact".into())
            }
        );
        assert_eq!(Route::resolve("/#"), Route::Home { section: None });
    }

    #[test]
    fn detail_pages_tolerate_trailing_slash_and_index() {
        for path in ["/projects", "/projects/", "/projects/index.html"] {
            assert_eq!(Route::resolve(path), Route::Projects, "{path}");
        }
        assert_eq!(Route::resolve("/education?tab=1"), Route::Education);
        assert_eq!(Route::resolve("/achievements"), Route::Achievements);
        assert_eq!(Route::resolve("/experience/"), Route::Experience);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        for path in ["/blog", "/projects/42", "/PROJECTS", "/about"] {
            assert_eq!(Route::resolve(path), Route::NotFound, "{path}");
        }
    }

    #[test]
    fn output_paths_are_distinct() {
        let mut paths: Vec<_> = Route::pages().iter().map(Route::output_path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Route::pages().len());
    }

    #[test]
    fn path_resolves_back_to_route() {
        for route in Route::pages().into_iter().filter(|r| *r != Route::NotFound) {
            assert_eq!(Route::resolve(&route.path()), route);
        }
    }
}
