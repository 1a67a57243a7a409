// known_hosts 错误类型定义

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::entry::Entry;

/// 单行解析错误
///
/// 加载文件时这些错误会被吞掉（该行降级为 Unparsed），
/// 显式解析单行时才会返回给调用方。
#[derive(Debug, Error)]
pub enum EntryError {
    /// 结构错误（字段数量不足、哈希段数量不对等）
    #[error("Malformed known_hosts entry: {0}")]
    Malformed(String),

    /// base64 解码失败
    #[error("Invalid base64 in known_hosts entry: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// 公钥数据无法解析
    #[error("Invalid public key: {0}")]
    InvalidKey(String),
}

/// 信任库错误
#[derive(Debug, Error)]
pub enum KnownHostsError {
    /// 主机已知但密钥不一致（可能是中间人攻击）
    #[error(
        "Host key for '{host}' has changed (offending entry at {}:{line})",
        path.display()
    )]
    HostKeyChanged {
        /// 被查询的主机
        host: String,
        /// 与主机匹配、但密钥不同的条目
        entry: Box<Entry>,
        /// 条目所在行号（从 1 开始）
        line: usize,
        /// 信任库文件路径
        path: PathBuf,
    },

    /// 用户拒绝信任未知主机
    #[error("User rejected the host key")]
    UserRejectedKey,

    /// 条目构造失败
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// IO 错误（读写信任库、打开提示设备）
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl KnownHostsError {
    /// 是否为密钥变化
    pub fn is_host_key_changed(&self) -> bool {
        matches!(self, Self::HostKeyChanged { .. })
    }

    /// 是否为用户拒绝
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejectedKey)
    }
}
