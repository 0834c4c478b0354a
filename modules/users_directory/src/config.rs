use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the users_directory module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersDirectoryConfig {
    #[serde(default = "default_search_limit")]
    pub default_search_limit: u32,
    #[serde(default = "default_max_search_limit")]
    pub max_search_limit: u32,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Prefix of the headers the upstream gateway uses to pass the verified identity.
    #[serde(default = "default_identity_header_prefix")]
    pub identity_header_prefix: String,
}

impl Default for UsersDirectoryConfig {
    fn default() -> Self {
        Self {
            default_search_limit: default_search_limit(),
            max_search_limit: default_max_search_limit(),
            min_query_len: default_min_query_len(),
            identity_header_prefix: default_identity_header_prefix(),
        }
    }
}

impl From<&UsersDirectoryConfig> for ServiceConfig {
    fn from(cfg: &UsersDirectoryConfig) -> Self {
        Self {
            min_query_len: cfg.min_query_len,
            default_search_limit: cfg.default_search_limit,
            max_search_limit: cfg.max_search_limit,
        }
    }
}

fn default_search_limit() -> u32 {
    20
}

fn default_max_search_limit() -> u32 {
    100
}

fn default_min_query_len() -> usize {
    2
}

fn default_identity_header_prefix() -> String {
    "x-auth-".to_string()
}
