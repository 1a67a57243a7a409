// 严格模式：未知主机一律拒绝，不询问用户

use std::io;

use async_trait::async_trait;
use tracing::warn;

use super::HostKeyUi;

/// 严格主机密钥检查
///
/// 只接受信任库中已有的主机；已知主机新增地址时的警告仍交给内部 UI 显示。
pub struct StrictUi<U> {
    inner: U,
}

impl<U: HostKeyUi> StrictUi<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<U: HostKeyUi> HostKeyUi for StrictUi<U> {
    async fn prompt(&self, message: &str) -> io::Result<bool> {
        warn!(
            "[HostKey] Strict host key checking: refusing unknown host ({})",
            message.lines().next().unwrap_or_default()
        );
        Ok(false)
    }

    fn warn(&self, message: &str) {
        self.inner.warn(message);
    }
}
