// SSH 连接事件定义

use chrono::{DateTime, Local};

use crate::known_hosts::Outcome;

/// 连接事件（用于 UI 显示）
#[derive(Clone, Debug)]
pub enum ConnectionEvent {
    /// 阶段变化
    StageChanged(ConnectionStage),
    /// 日志消息
    Log(LogEntry),
    /// 未知主机，等待用户确认公钥（通过 HostKeyAction 回应）
    HostKeyVerification {
        host: String,
        address: String,
        key_type: String,
        fingerprint: String,
        /// 完整的提示文本
        message: String,
    },
    /// 主机密钥校验完成
    HostKeyChecked { outcome: Outcome },
    /// 连接成功
    Connected { address: String },
    /// 连接失败
    Failed { error: String },
    /// 连接断开
    Disconnected { reason: String },
}

/// 用户对未知主机公钥的回应
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKeyAction {
    /// 信任并写入 known_hosts
    Accept,
    /// 拒绝，中止连接
    Reject,
}

/// 连接阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionStage {
    /// 初始化（解析配置、解析地址）
    Initializing = 0,
    /// TCP 连接目标主机
    ConnectingHost = 1,
    /// SSH 握手（密钥交换）
    Handshaking = 2,
    /// 校验主机密钥
    VerifyingHostKey = 3,
    /// 握手完成
    Connected = 4,
}

impl ConnectionStage {
    /// 获取阶段的本地化名称（英文）
    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::ConnectingHost => "Connecting to host",
            Self::Handshaking => "SSH handshake",
            Self::VerifyingHostKey => "Verifying host key",
            Self::Connected => "Connected",
        }
    }
}

/// 日志级别
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// 日志条目
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// 时间戳
    pub timestamp: DateTime<Local>,
    /// 日志级别
    pub level: LogLevel,
    /// 消息内容
    pub message: String,
}

impl LogEntry {
    /// 创建新的日志条目
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    /// 创建 Debug 级别日志
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    /// 创建 Info 级别日志
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// 创建 Warn 级别日志
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    /// 创建 Error 级别日志
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(ConnectionStage::Handshaking < ConnectionStage::VerifyingHostKey);
        assert_eq!(ConnectionStage::VerifyingHostKey.label_en(), "Verifying host key");
    }

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry::warn("Host key changed");
        assert_eq!(entry.level, LogLevel::Warn);
        assert!(entry.to_string().ends_with(" [WARN] Host key changed"));
    }
}
