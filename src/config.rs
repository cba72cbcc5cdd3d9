// Fixed endpoints the importer talks to. The binary always runs with
// `ImportConfig::default()`; tests build their own config pointing at a
// local mock server.

/// Bulk import endpoint of the meal planner API.
pub const BULK_IMPORT_URL: &str = "https://meal-planner-lupl.onrender.com/api/import/recipes/bulk";

/// Web UI where imported recipes can be browsed.
pub const RECIPES_VIEWER_URL: &str = "https://meal-planner-pied-iota.vercel.app/recipes";

/// Where to upload and where to send the user afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    pub endpoint: String,
    pub viewer_url: String,
}

impl ImportConfig {
    /// Config that uploads to `endpoint` but keeps the default viewer URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        ImportConfig {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            endpoint: BULK_IMPORT_URL.into(),
            viewer_url: RECIPES_VIEWER_URL.into(),
        }
    }
}
