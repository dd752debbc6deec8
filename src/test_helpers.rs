//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup and lookup helpers over [`ContentStore`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = fixture_store();
//! let project = find_project(&store, "Trail Mapper");
//! assert!(project.featured);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::ContentStore;
use crate::types::{Experience, Project};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture content straight from the repository.
pub fn fixture_store() -> ContentStore {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    ContentStore::load(&fixtures).unwrap()
}

/// Write the smallest valid `profile.json` into `dir`.
pub fn write_minimal_profile(dir: &Path) {
    std::fs::write(
        dir.join("profile.json"),
        r#"{"name":"Sam Lee","title":"Engineer","email":"sam@example.com"}"#,
    )
    .unwrap();
}

// =========================================================================
// Lookups — panics with a clear message on miss
// =========================================================================

/// Find a project by title. Panics if not found.
pub fn find_project<'a>(store: &'a ContentStore, title: &str) -> &'a Project {
    store
        .projects
        .projects
        .iter()
        .find(|p| p.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = store.projects.projects.iter().map(|p| p.title.as_str()).collect();
            panic!("project '{title}' not found. Available: {titles:?}")
        })
}

/// Find an experience by company. Panics if not found.
pub fn find_experience<'a>(store: &'a ContentStore, company: &str) -> &'a Experience {
    store
        .experience
        .experiences
        .iter()
        .find(|e| e.company == company)
        .unwrap_or_else(|| {
            let names: Vec<&str> = store
                .experience
                .experiences
                .iter()
                .map(|e| e.company.as_str())
                .collect();
            panic!("experience at '{company}' not found. Available: {names:?}")
        })
}
