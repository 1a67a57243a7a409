// SSH 错误类型定义

use thiserror::Error;

use crate::known_hosts::KnownHostsError;

/// SSH 错误类型
#[derive(Debug, Error)]
pub enum SshError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO 错误（网络连接等）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SSH 协议错误
    #[error("SSH protocol error: {0}")]
    Protocol(String),

    /// 主机密钥校验失败（密钥变化、用户拒绝、信任库读写失败）
    #[error("Host key verification failed: {0}")]
    HostKey(#[from] KnownHostsError),

    /// 连接超时
    #[error("Connection timeout after {0}s")]
    Timeout(u64),
}

impl From<russh::Error> for SshError {
    fn from(e: russh::Error) -> Self {
        match e {
            // check_server_key 返回 false：用户拒绝了未知主机
            russh::Error::UnknownKey => SshError::HostKey(KnownHostsError::UserRejectedKey),
            e => SshError::Protocol(e.to_string()),
        }
    }
}
