// SSH 客户端核心实现

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use russh::Disconnect;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::config::{host_literal, SshConfig};
use super::error::SshError;
use super::event::{ConnectionEvent, ConnectionStage, LogEntry};
use super::handler::{HostKeyPrompt, SshClientHandler};
use super::verify::VerifyOptions;

/// SSH 客户端
/// 只完成握手（含主机密钥校验），随后断开
pub struct SshClient {
    /// 连接配置
    config: SshConfig,
    /// 事件发送器
    event_sender: mpsc::UnboundedSender<ConnectionEvent>,
    /// 未知主机的确认方式
    prompt: Option<HostKeyPrompt>,
}

impl SshClient {
    /// 创建新的 SSH 客户端
    pub fn new(
        config: SshConfig,
        event_sender: mpsc::UnboundedSender<ConnectionEvent>,
        prompt: HostKeyPrompt,
    ) -> Self {
        Self {
            config,
            event_sender,
            prompt: Some(prompt),
        }
    }

    /// 发送阶段变化事件
    fn emit_stage(&self, stage: ConnectionStage) {
        let _ = self.event_sender.send(ConnectionEvent::StageChanged(stage));
    }

    /// 发送日志事件
    fn log(&self, entry: LogEntry) {
        let _ = self.event_sender.send(ConnectionEvent::Log(entry));
    }

    /// 解析目标地址
    fn resolve(&self) -> Result<SocketAddr, SshError> {
        let addr = (self.config.host.as_str(), self.config.port);
        addr.to_socket_addrs()
            .map_err(|e| SshError::Config(format!("Failed to resolve address: {}", e)))?
            .next()
            .ok_or_else(|| SshError::Config("No valid address found".to_string()))
    }

    /// 连接并完成握手，然后断开
    /// 主机密钥未通过校验时返回 SshError::HostKey
    pub async fn probe(&mut self) -> Result<(), SshError> {
        let result = self.handshake().await;
        if let Err(e) = &result {
            let _ = self.event_sender.send(ConnectionEvent::Failed {
                error: e.to_string(),
            });
        }
        result
    }

    async fn handshake(&mut self) -> Result<(), SshError> {
        // 阶段 1: 初始化
        self.emit_stage(ConnectionStage::Initializing);
        self.log(LogEntry::info("Starting SSH connection..."));
        self.log(LogEntry::debug(format!(
            "Target: {}:{}",
            self.config.host, self.config.port
        )));

        let socket_addr = self.resolve()?;
        let prompt = self
            .prompt
            .take()
            .ok_or_else(|| SshError::Config("Client has already connected".to_string()))?;

        // 阶段 2: TCP 连接
        self.emit_stage(ConnectionStage::ConnectingHost);
        self.log(LogEntry::info(format!("Connecting to {}...", socket_addr)));

        let connect_timeout = Duration::from_secs(self.config.connect_timeout);
        let tcp_stream = timeout(connect_timeout, TcpStream::connect(socket_addr))
            .await
            .map_err(|_| SshError::Timeout(self.config.connect_timeout))?
            .map_err(SshError::Io)?;

        self.log(LogEntry::info("TCP connection established"));

        // 阶段 3: SSH 握手（check_server_key 在此期间执行）
        self.emit_stage(ConnectionStage::Handshaking);
        self.log(LogEntry::info("Starting SSH handshake..."));

        let russh_config = Arc::new(self.config.to_russh_config());
        let address = host_literal(&socket_addr.ip().to_string(), self.config.port);
        let mut options = VerifyOptions::new(self.config.host_literal());
        options.known_hosts = self.config.known_hosts.clone();

        let handler =
            SshClientHandler::new(self.event_sender.clone(), options, address.clone(), prompt);

        // 握手期间可能等待用户确认，不套连接超时
        let handle = russh::client::connect_stream(russh_config, tcp_stream, handler).await?;

        self.log(LogEntry::info("SSH handshake completed"));
        self.emit_stage(ConnectionStage::Connected);
        let _ = self.event_sender.send(ConnectionEvent::Connected {
            address: address.clone(),
        });

        handle
            .disconnect(Disconnect::ByApplication, "host key check finished", "en")
            .await?;
        let _ = self.event_sender.send(ConnectionEvent::Disconnected {
            reason: "probe finished".to_string(),
        });

        Ok(())
    }
}
