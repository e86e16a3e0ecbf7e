//! Fixture loader for Tacit domain datasets and golden query scenarios.
//!
//! Fixtures live next to this crate: `domains/<name>/` holds a domain
//! descriptor (`domain.toml`) and its pattern documents, `golden/` holds
//! expected query outcomes.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Walk up from whichever crate is running the test.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("domains").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Load a fixture file as text (TOML descriptors, JSON Lines).
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Descriptor text for a fixture domain.
pub fn domain_toml(domain: &str) -> String {
    load_fixture_text(&format!("domains/{domain}/domain.toml"))
}

/// Path to a fixture domain's pattern array.
pub fn domain_patterns_path(domain: &str) -> PathBuf {
    fixture_path(&format!("domains/{domain}/patterns.json"))
}

/// One expected ranking outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenQuery {
    pub query: String,
    pub domain: String,
    /// Unit expected to rank first.
    pub expected_top: Option<String>,
    /// Units that must rank below `expected_top`.
    #[serde(default)]
    pub ranked_below: Vec<String>,
    #[serde(default)]
    pub expect_generation: bool,
}

pub fn golden_queries() -> Vec<GoldenQuery> {
    load_fixture("golden/diy_queries.json")
}
