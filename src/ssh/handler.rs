// SSH 客户端 Handler 实现
// 实现 russh::client::Handler trait，在握手时校验服务器公钥

use std::future::Future;
use std::sync::Arc;

use russh::keys::ssh_key::HashAlg;
use russh::keys::PublicKey;
use tokio::sync::{mpsc, oneshot};

use super::error::SshError;
use super::event::{ConnectionEvent, ConnectionStage, HostKeyAction, LogEntry};
use super::verify::{verify_host_key, VerifyOptions};
use crate::known_hosts::keys::{fingerprint, key_blob};
use crate::known_hosts::{KnownHostsError, Outcome};
use crate::ui::{EventUi, HostKeyDetails, HostKeyUi};

/// 未知主机的确认方式
pub enum HostKeyPrompt {
    /// 直接使用给定的界面（终端、严格模式等）
    Ui(Arc<dyn HostKeyUi>),
    /// 通过 ConnectionEvent 交给前端，等待 HostKeyAction
    Events(Option<oneshot::Receiver<HostKeyAction>>),
}

/// SSH 客户端 Handler
/// 处理 SSH 连接过程中的各种回调
pub struct SshClientHandler {
    /// 事件发送器（用于通知 UI）
    event_sender: mpsc::UnboundedSender<ConnectionEvent>,
    /// 校验选项（主机名、信任库路径）
    options: VerifyOptions,
    /// 对端地址（known_hosts 写法）
    address: String,
    prompt: HostKeyPrompt,
}

impl SshClientHandler {
    /// 创建新的 Handler
    pub fn new(
        event_sender: mpsc::UnboundedSender<ConnectionEvent>,
        options: VerifyOptions,
        address: String,
        prompt: HostKeyPrompt,
    ) -> Self {
        Self {
            event_sender,
            options,
            address,
            prompt,
        }
    }

    /// 发送日志事件
    fn log(&self, entry: LogEntry) {
        let _ = self.event_sender.send(ConnectionEvent::Log(entry));
    }

    /// 本次校验使用的确认界面
    fn ui_for(&mut self, details: HostKeyDetails) -> Arc<dyn HostKeyUi> {
        match &mut self.prompt {
            HostKeyPrompt::Ui(ui) => ui.clone(),
            HostKeyPrompt::Events(rx) => {
                // 回应通道只有一个；再次需要确认时给一个已关闭的通道
                let rx = rx.take().unwrap_or_else(|| oneshot::channel().1);
                Arc::new(EventUi::new(self.event_sender.clone(), rx, details))
            }
        }
    }
}

impl russh::client::Handler for SshClientHandler {
    type Error = SshError;

    /// 检查服务器公钥（known_hosts）
    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let _ = self
            .event_sender
            .send(ConnectionEvent::StageChanged(ConnectionStage::VerifyingHostKey));

        let hint = server_public_key.fingerprint(HashAlg::Sha256).to_string();
        self.log(LogEntry::info(format!("Server key fingerprint: {}", hint)));
        self.log(LogEntry::debug(format!(
            "Server key type: {}",
            server_public_key.algorithm()
        )));

        let blob = key_blob(server_public_key);
        let details = HostKeyDetails {
            host: self.options.host.clone(),
            address: self.address.clone(),
            key_type: server_public_key.algorithm().as_str().to_string(),
            fingerprint: blob.as_deref().map(fingerprint).unwrap_or_default(),
        };
        let ui = self.ui_for(details);
        let options = self.options.clone();
        let address = self.address.clone();
        let event_sender = self.event_sender.clone();

        async move {
            let blob = blob.map_err(KnownHostsError::from)?;
            let result = verify_host_key(&options, &address, &blob, &hint, ui.as_ref()).await;

            if let Some(outcome) = Outcome::of(&result) {
                let _ = event_sender.send(ConnectionEvent::HostKeyChecked { outcome });
            }

            match result {
                Ok(_) => Ok(true),
                Err(e) if e.is_user_rejected() => Ok(false),
                Err(e) => {
                    if e.is_host_key_changed() {
                        let _ = event_sender.send(ConnectionEvent::Log(LogEntry::error(
                            "REMOTE HOST IDENTIFICATION HAS CHANGED!",
                        )));
                    }
                    let _ = event_sender.send(ConnectionEvent::Log(LogEntry::error(e.to_string())));
                    Err(SshError::HostKey(e))
                }
            }
        }
    }
}
