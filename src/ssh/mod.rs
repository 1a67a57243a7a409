// SSH 连接模块
//
// 模块结构:
// - config: 连接配置 (SshConfig)
// - error: 错误类型 (SshError)
// - event: 连接事件 (ConnectionEvent, ConnectionStage, HostKeyAction, LogEntry)
// - handler: russh Handler 实现，握手时校验主机密钥
// - verify: 主机密钥校验入口 (verify_host_key, VerifyOptions)
// - client: SSH 客户端核心（握手探测）

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod verify;

// 公开导出
pub use client::SshClient;
pub use config::SshConfig;
pub use error::SshError;
pub use event::{ConnectionEvent, ConnectionStage, HostKeyAction, LogEntry, LogLevel};
pub use handler::{HostKeyPrompt, SshClientHandler};
pub use verify::{verify_host_key, VerifyOptions};
