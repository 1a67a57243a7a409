// 传输层的主机密钥校验入口
// 解析信任库路径、解析服务器公钥，然后执行 known_hosts 校验流程

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::known_hosts::keys::parse_key_blob;
use crate::known_hosts::{HostKeyStatus, KnownHostsError, KnownHostsFile};
use crate::ui::HostKeyUi;

/// 校验选项
#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
    /// 连接时使用的主机名（known_hosts 写法）
    pub host: String,
    /// 信任库路径，None 时使用 ~/.ssh/known_hosts
    pub known_hosts: Option<PathBuf>,
}

impl VerifyOptions {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            known_hosts: None,
        }
    }

    pub fn with_known_hosts(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts = Some(path.into());
        self
    }

    /// 实际使用的信任库路径
    pub fn known_hosts_path(&self) -> io::Result<PathBuf> {
        match &self.known_hosts {
            Some(path) => Ok(path.clone()),
            None => default_known_hosts_path(),
        }
    }
}

/// 用户主目录下的 known_hosts
pub fn default_known_hosts_path() -> io::Result<PathBuf> {
    default_known_hosts_path_from(dirs::home_dir())
}

/// 由主目录得出默认 known_hosts 路径；没有主目录时返回 NotFound
pub fn default_known_hosts_path_from(home: Option<PathBuf>) -> io::Result<PathBuf> {
    home.map(|home| known_hosts_path_in(&home))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not found"))
}

/// 给定主目录下的 known_hosts 路径
pub fn known_hosts_path_in(home: &Path) -> PathBuf {
    home.join(".ssh").join("known_hosts")
}

/// 校验服务器公钥
///
/// `key_blob` 为 SSH wire 格式的公钥数据。`fingerprint_hint` 只用于日志，
/// 提示中显示的指纹总是根据公钥重新计算。
pub async fn verify_host_key(
    options: &VerifyOptions,
    address: &str,
    key_blob: &[u8],
    fingerprint_hint: &str,
    ui: &dyn HostKeyUi,
) -> Result<HostKeyStatus, KnownHostsError> {
    let path = options.known_hosts_path()?;
    let key = parse_key_blob(key_blob)?;

    debug!(
        "[HostKey] Verifying {} ({}) against {} (server fingerprint {})",
        options.host,
        address,
        path.display(),
        fingerprint_hint
    );

    let mut known_hosts = KnownHostsFile::load(path)?;
    known_hosts
        .verify_host_key(ui, &options.host, address, &key)
        .await
}
