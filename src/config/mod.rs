use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::ClientResult;

/// 客户端配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// 默认图名
    pub graph: String,
    pub commands: CommandConfig,
    pub log: LogConfig,
}

/// 服务端命令与元数据过程名
///
/// 这些名称属于协议细节，放在配置中以便对照实际服务端确认
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommandConfig {
    pub query: String,
    pub ro_query: String,
    pub delete: String,
    /// 请求紧凑结果格式的参数
    pub compact_flag: String,
    pub timeout_flag: String,
    pub labels_procedure: String,
    pub relationship_types_procedure: String,
    pub property_keys_procedure: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
    /// 为 false 时只输出到 stderr
    pub to_file: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graph: "default".to_string(),
            commands: CommandConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            query: "GRAPH.QUERY".to_string(),
            ro_query: "GRAPH.RO_QUERY".to_string(),
            delete: "GRAPH.DELETE".to_string(),
            compact_flag: "--compact".to_string(),
            timeout_flag: "timeout".to_string(),
            labels_procedure: "db.labels".to_string(),
            relationship_types_procedure: "db.relationshipTypes".to_string(),
            property_keys_procedure: "db.propertyKeys".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphdb-client".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
            to_file: true,
        }
    }
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ClientResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn with_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = graph.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ClientError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.commands.query, "GRAPH.QUERY");
        assert_eq!(config.commands.compact_flag, "--compact");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let config = ClientConfig::default().with_graph("social");
        config
            .save(temp_file.path())
            .expect("Failed to save config to temporary file");

        let loaded_config =
            ClientConfig::load(temp_file.path()).expect("Failed to load config from temporary file");
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"graph = \"movies\"\n\n[log]\nlevel = \"debug\"\n")
            .expect("Failed to write TOML content to temporary file");

        let config = ClientConfig::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(config.graph, "movies");
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.max_files, 5);
        assert_eq!(config.commands.ro_query, "GRAPH.RO_QUERY");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"graph = [")
            .expect("Failed to write TOML content to temporary file");

        let err = ClientConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
