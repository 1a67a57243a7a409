// SSH 连接配置

use std::path::PathBuf;
use std::time::Duration;

use crate::models::ConnectionSettings;

/// SSH 默认端口
pub const DEFAULT_PORT: u16 = 22;

/// SSH 连接配置
#[derive(Clone, Debug)]
pub struct SshConfig {
    /// 目标主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 连接超时（秒）
    pub connect_timeout: u64,
    /// 信任库路径，None 时使用 ~/.ssh/known_hosts
    pub known_hosts: Option<PathBuf>,
    /// 严格主机密钥检查
    pub strict_host_key_checking: bool,
}

impl SshConfig {
    /// 由全局连接设置创建配置，port 为 None 时使用设置中的默认端口
    pub fn from_settings(
        host: impl Into<String>,
        port: Option<u16>,
        settings: &ConnectionSettings,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.unwrap_or(settings.default_port),
            connect_timeout: u64::from(settings.connection_timeout_secs),
            known_hosts: settings.known_hosts_path.clone(),
            strict_host_key_checking: settings.strict_host_key_checking,
        }
    }

    /// known_hosts 中使用的主机名
    pub fn host_literal(&self) -> String {
        host_literal(&self.host, self.port)
    }

    /// 构建 russh 配置
    pub fn to_russh_config(&self) -> russh::client::Config {
        let mut config = russh::client::Config::default();
        // russh 没有单独的 connection_timeout，我们用 inactivity_timeout
        config.inactivity_timeout = Some(Duration::from_secs(self.connect_timeout));
        config
    }
}

/// known_hosts 主机写法：默认端口直接写主机，其他端口写成 [host]:port
pub fn host_literal(host: &str, port: u16) -> String {
    if port == DEFAULT_PORT {
        host.to_string()
    } else {
        format!("[{}]:{}", host, port)
    }
}

/// 解析 host[:port] 形式的目标；IPv6 需写成 [addr]:port
pub fn parse_target(target: &str) -> Result<(String, Option<u16>), String> {
    let invalid_port = |port: &str| format!("Invalid port '{}' in '{}'", port, target);

    if let Some(rest) = target.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| format!("Missing ']' in '{}'", target))?;
        return match tail.strip_prefix(':') {
            Some(port) => Ok((
                host.to_string(),
                Some(port.parse().map_err(|_| invalid_port(port))?),
            )),
            None if tail.is_empty() => Ok((host.to_string(), None)),
            None => Err(format!("Unexpected '{}' after ']' in '{}'", tail, target)),
        };
    }

    match target.rsplit_once(':') {
        // 多个冒号且没有方括号：视为裸 IPv6 地址
        Some((host, _)) if host.contains(':') => Ok((target.to_string(), None)),
        Some((host, port)) => Ok((
            host.to_string(),
            Some(port.parse().map_err(|_| invalid_port(port))?),
        )),
        None if target.is_empty() => Err("Empty host".to_string()),
        None => Ok((target.to_string(), None)),
    }
}
