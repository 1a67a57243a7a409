// 主机密钥确认界面
//
// 模块结构:
// - console: 终端设备确认 (ConsoleUi, ConsoleDevice)
// - event: 事件通道确认，交给前端处理 (EventUi)
// - strict: 严格模式，从不信任未知主机 (StrictUi)

pub mod console;
pub mod event;
pub mod strict;

use std::io;

use async_trait::async_trait;

pub use console::{ConsoleDevice, ConsoleUi, TtyDevice};
pub use event::{EventUi, HostKeyDetails};
pub use strict::StrictUi;

/// 主机密钥确认界面
#[async_trait]
pub trait HostKeyUi: Send + Sync {
    /// 显示提示并等待用户回答 yes / no
    async fn prompt(&self, message: &str) -> io::Result<bool>;

    /// 显示警告，不等待、不返回错误
    fn warn(&self, message: &str);
}
