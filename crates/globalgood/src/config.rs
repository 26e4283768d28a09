use std::{env, time::Duration};

use globalgood_core::storage::Tables;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Table names (defaults: `TheGlobalGood-*`)
    pub tables: Tables,
    /// AWS region of the tables (default: "us-west-1")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub region: String,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

fn var_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_PRODUCTS_TABLE_NAME` - Products table
    /// - `DYNAMODB_REVIEWS_TABLE_NAME` - Reviews table
    /// - `DYNAMODB_BLOGPOSTS_TABLE_NAME` - Blog posts table
    /// - `DYNAMODB_BLOGPOSTCOMMENTS_TABLE_NAME` - Blog post comments table
    /// - `AWS_REGION` - AWS region (default: "us-west-1")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let tables = Tables::default();
        Self {
            tables: Tables {
                products: var_or("DYNAMODB_PRODUCTS_TABLE_NAME", tables.products),
                reviews: var_or("DYNAMODB_REVIEWS_TABLE_NAME", tables.reviews),
                blog_posts: var_or("DYNAMODB_BLOGPOSTS_TABLE_NAME", tables.blog_posts),
                comments: var_or("DYNAMODB_BLOGPOSTCOMMENTS_TABLE_NAME", tables.comments),
            },
            region: var_or("AWS_REGION", "us-west-1".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: Tables::default(),
            region: "us-west-1".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config {
            request_timeout_seconds: 3,
            ..Config::default()
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.tables.products, "TheGlobalGood-Products");
        assert_eq!(config.tables.comments, "TheGlobalGood-BlogPostComments");
        assert_eq!(config.region, "us-west-1");
        assert_eq!(config.request_timeout_seconds, 10);
    }

    #[test]
    fn test_blank_variable_falls_back() {
        assert_eq!(
            var_or("GLOBALGOOD_TEST_UNSET_VARIABLE", "fallback".to_string()),
            "fallback"
        );
    }
}
