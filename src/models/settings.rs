// Settings 配置数据结构

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ======================== 主配置结构 ========================

/// 应用设置（持久化用）
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub connection: ConnectionSettings,
}

// ======================== 连接设置 ========================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionSettings {
    pub default_port: u16,
    pub connection_timeout_secs: u32,
    /// 信任库路径，None 时使用 ~/.ssh/known_hosts
    pub known_hosts_path: Option<PathBuf>,
    /// 开启后未知主机直接拒绝，不询问
    pub strict_host_key_checking: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            default_port: 22,
            connection_timeout_secs: 30,
            known_hosts_path: None,
            strict_host_key_checking: false,
        }
    }
}
