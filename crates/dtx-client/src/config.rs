//! Client configuration.

/// Configuration for the explorer client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the explorer API, without a trailing slash.
    pub base_url: String,
    /// Cluster the data-type requests are proxied to.
    pub cluster_id: String,
    /// Content type sent with operation documents.
    pub content_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            cluster_id: "default".to_string(),
            content_type: "application/json".to_string(),
        }
    }
}

/// Builder for client configuration.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn cluster_id(mut self, cluster: impl Into<String>) -> Self {
        self.config.cluster_id = cluster.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.cluster_id, "default");
        assert_eq!(config.content_type, "application/json");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfigBuilder::new()
            .base_url("http://explorer:9000/")
            .cluster_id("prod")
            .build();
        assert_eq!(config.base_url, "http://explorer:9000");
        assert_eq!(config.cluster_id, "prod");
        assert_eq!(config.content_type, "application/json");
    }
}
