use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::fetcher::FetchedRepository;
use crate::github::RepositoryStats;

/// Everything the listing agents get to see about one extension.
///
/// Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionContext {
    pub name: Value,
    pub version: Value,
    pub description: Value,
    pub manifest_version: Value,
    pub permissions: Value,
    pub host_permissions: Value,
    pub content_scripts: Value,
    pub background: Value,
    pub readme: String,
    pub dependencies: Map<String, Value>,
    pub privacy_policy: Option<String>,
    pub license: Option<String>,
    pub repo_url: String,
    pub stars: u64,
    pub last_updated: String,
    pub open_issues: u64,
    pub default_locale: Value,
    pub icons: Value,
}

impl ExtensionContext {
    /// Merge manifest fields, documents, dependencies and statistics.
    pub fn assemble(
        repo_url: &str,
        manifest: &Map<String, Value>,
        readme: Option<&str>,
        dependencies: Map<String, Value>,
        privacy_policy: Option<&str>,
        license: Option<&str>,
        stats: &RepositoryStats,
    ) -> Self {
        let field = |key: &str, default: Value| manifest.get(key).cloned().unwrap_or(default);

        Self {
            name: field("name", json!("")),
            version: field("version", json!("")),
            description: field("description", json!("")),
            manifest_version: field("manifest_version", json!("")),
            permissions: field("permissions", json!([])),
            host_permissions: field("host_permissions", json!([])),
            content_scripts: field("content_scripts", json!([])),
            background: field("background", json!({})),
            readme: readme.unwrap_or_default().to_string(),
            dependencies,
            privacy_policy: privacy_policy.map(str::to_string),
            license: license.map(str::to_string),
            repo_url: repo_url.to_string(),
            stars: stats.stars,
            last_updated: stats.last_updated.clone(),
            open_issues: stats.open_issues,
            default_locale: field("default_locale", json!("")),
            icons: field("icons", json!({})),
        }
    }

    pub fn from_fetched(repo_url: &str, fetched: &FetchedRepository) -> Self {
        Self::assemble(
            repo_url,
            &fetched.manifest,
            fetched.readme.as_deref(),
            extract_dependencies(fetched.package_json.as_deref()),
            fetched.privacy_policy.as_deref(),
            fetched.license.as_deref(),
            &fetched.stats,
        )
    }

    /// Indented JSON, sent as the user message to every agent.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Pull `dependencies` and `devDependencies` out of package.json.
///
/// Absent or malformed input gives an empty map.
pub fn extract_dependencies(package_json: Option<&str>) -> Map<String, Value> {
    let Some(raw) = package_json else {
        return Map::new();
    };
    let Ok(Value::Object(package)) = serde_json::from_str::<Value>(raw) else {
        return Map::new();
    };

    let mut deps = Map::new();
    for key in ["dependencies", "devDependencies"] {
        deps.insert(
            key.to_string(),
            package.get(key).cloned().unwrap_or_else(|| json!({})),
        );
    }
    deps
}
