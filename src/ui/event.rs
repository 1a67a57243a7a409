// 事件通道确认界面
// 把确认请求作为 ConnectionEvent 发给前端，通过 oneshot 等待回应

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::HostKeyUi;
use crate::ssh::event::{ConnectionEvent, HostKeyAction, LogEntry};

/// 待确认的主机密钥信息（随事件发给前端展示）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostKeyDetails {
    pub host: String,
    pub address: String,
    pub key_type: String,
    pub fingerprint: String,
}

/// 事件通道确认界面
///
/// 一个实例只能回答一次提示。
pub struct EventUi {
    event_sender: mpsc::UnboundedSender<ConnectionEvent>,
    response_rx: Mutex<Option<oneshot::Receiver<HostKeyAction>>>,
    details: HostKeyDetails,
}

impl EventUi {
    pub fn new(
        event_sender: mpsc::UnboundedSender<ConnectionEvent>,
        response_rx: oneshot::Receiver<HostKeyAction>,
        details: HostKeyDetails,
    ) -> Self {
        Self {
            event_sender,
            response_rx: Mutex::new(Some(response_rx)),
            details,
        }
    }

    fn take_receiver(&self) -> Option<oneshot::Receiver<HostKeyAction>> {
        self.response_rx
            .lock()
            .map(|mut rx| rx.take())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HostKeyUi for EventUi {
    async fn prompt(&self, message: &str) -> io::Result<bool> {
        let rx = self.take_receiver().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "host key response already used")
        })?;

        let HostKeyDetails {
            host,
            address,
            key_type,
            fingerprint,
        } = self.details.clone();
        self.event_sender
            .send(ConnectionEvent::HostKeyVerification {
                host,
                address,
                key_type,
                fingerprint,
                message: message.to_string(),
            })
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "event channel closed"))?;

        debug!("[HostKey] Waiting for user decision on {}", self.details.host);
        let action = rx.await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::BrokenPipe,
                "host key prompt closed without an answer",
            )
        })?;
        info!("[HostKey] User chose {:?} for {}", action, self.details.host);

        Ok(action == HostKeyAction::Accept)
    }

    fn warn(&self, message: &str) {
        let _ = self
            .event_sender
            .send(ConnectionEvent::Log(LogEntry::warn(message)));
    }
}
