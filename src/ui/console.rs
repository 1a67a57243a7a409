// 终端确认界面
// 直接读写控制终端（/dev/tty），不占用进程的 stdin / stdout

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::HostKeyUi;

/// 默认的终端设备路径
pub const TTY_PATH: &str = "/dev/tty";

/// 回答无法识别时的再次提示
const REPROMPT: &str = "Please type 'yes' or 'no': ";

/// 可读写的终端设备，Drop 即关闭
pub trait ConsoleDevice: Send {
    /// 原样写出消息（不追加换行）
    fn write_message(&mut self, message: &str) -> io::Result<()>;

    /// 读取一行；输入结束时返回 None
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// 基于文件的终端设备
pub struct TtyDevice {
    reader: BufReader<File>,
}

impl TtyDevice {
    /// 以读写方式打开设备
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }
}

impl ConsoleDevice for TtyDevice {
    fn write_message(&mut self, message: &str) -> io::Result<()> {
        let file = self.reader.get_mut();
        file.write_all(message.as_bytes())?;
        file.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

type Opener = dyn Fn() -> io::Result<Box<dyn ConsoleDevice>> + Send + Sync;

/// 终端确认界面
///
/// 每次提示或警告都重新打开设备，用完即关闭。
#[derive(Clone)]
pub struct ConsoleUi {
    opener: Arc<Opener>,
}

impl ConsoleUi {
    /// 使用自定义的设备打开函数
    pub fn new<F>(opener: F) -> Self
    where
        F: Fn() -> io::Result<Box<dyn ConsoleDevice>> + Send + Sync + 'static,
    {
        Self {
            opener: Arc::new(opener),
        }
    }

    /// 使用控制终端
    pub fn tty() -> Self {
        Self::new(|| Ok(Box::new(TtyDevice::open(TTY_PATH)?)))
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::tty()
    }
}

/// 写出提示并读取回答，直到得到 yes 或 no
fn ask(opener: &Opener, message: &str) -> io::Result<bool> {
    let mut device = opener()?;
    device.write_message(message)?;

    loop {
        let Some(line) = device.read_line()? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no answer to host key prompt",
            ));
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            other => {
                debug!("[HostKey] Unrecognized answer {:?}", other);
                device.write_message(REPROMPT)?;
            }
        }
    }
}

#[async_trait]
impl HostKeyUi for ConsoleUi {
    async fn prompt(&self, message: &str) -> io::Result<bool> {
        let opener = self.opener.clone();
        let message = message.to_string();
        tokio::task::spawn_blocking(move || ask(opener.as_ref(), &message))
            .await
            .map_err(io::Error::other)?
    }

    fn warn(&self, message: &str) {
        let result = (self.opener)().and_then(|mut device| device.write_message(message));
        if let Err(e) = result {
            error!("[HostKey] Failed to display warning: {}", e);
        }
    }
}
