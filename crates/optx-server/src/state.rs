//! # Application State
//!
//! This module defines the shared state that is available to all HTTP request handlers.
//! The state is created once at server startup and shared via `Arc` across all
//! concurrent requests.
//!
//! Each request builds its own hypergraph, so the state only carries
//! configuration: the listen address and the graph limits applied to every build.
//!
//! ## Environment
//!
//! - `OPTX_LISTEN_ADDR`: socket address to bind (default `0.0.0.0:3000`).
//! - `OPTX_MAX_NODES`: maximum join inputs per hypergraph (default 256).
//! - `OPTX_MAX_EDGES`: maximum join predicates per hypergraph (default 10000).
//!
//! Unparseable values are logged and ignored.

use optx_hypergraph::GraphConfig;
use tracing::warn;

/// Server-level configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Limits applied to every hypergraph built by a request.
    pub graph: GraphConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            graph: GraphConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `OPTX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup("OPTX_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(v) = parse_limit(&lookup, "OPTX_MAX_NODES") {
            config.graph.max_nodes = v;
        }
        if let Some(v) = parse_limit(&lookup, "OPTX_MAX_EDGES") {
            config.graph.max_edges = v;
        }
        config
    }
}

fn parse_limit(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.parse::<usize>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

/// Shared application state, accessible by all request handlers via Axum's State extractor.
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPTX_LISTEN_ADDR", "127.0.0.1:8080"),
            ("OPTX_MAX_NODES", "32"),
            ("OPTX_MAX_EDGES", "zero"),
        ]);
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.graph.max_nodes, 32);
        assert_eq!(config.graph.max_edges, GraphConfig::default().max_edges);
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.graph.max_nodes, 256);
    }
}
