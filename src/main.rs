// hostkey-guard - SSH 主机密钥校验工具
// 应用入口：连接目标主机，只完成握手与 known_hosts 校验，然后断开

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use hostkey_guard::known_hosts::Outcome;
use hostkey_guard::services::storage;
use hostkey_guard::ssh::config::parse_target;
use hostkey_guard::ssh::{
    ConnectionEvent, HostKeyPrompt, LogEntry, LogLevel, SshClient, SshConfig, SshError,
};
use hostkey_guard::ui::{ConsoleUi, HostKeyUi, StrictUi};

const USAGE: &str = "Usage: hostkey-guard <host>[:port]";

/// 把连接事件转成日志，并记下校验结果
async fn drain_events(mut events: mpsc::UnboundedReceiver<ConnectionEvent>) -> Option<Outcome> {
    let mut outcome = None;
    while let Some(event) = events.recv().await {
        match event {
            ConnectionEvent::StageChanged(stage) => debug!("[SSH] {}", stage.label_en()),
            ConnectionEvent::Log(entry) => log_entry(&entry),
            ConnectionEvent::HostKeyChecked { outcome: checked } => outcome = Some(checked),
            ConnectionEvent::Failed { error } => debug!("[SSH] Connection failed: {}", error),
            _ => {}
        }
    }
    outcome
}

fn log_entry(entry: &LogEntry) {
    match entry.level {
        LogLevel::Debug => debug!("[SSH] {}", entry.message),
        LogLevel::Info => info!("[SSH] {}", entry.message),
        LogLevel::Warn => warn!("[SSH] {}", entry.message),
        LogLevel::Error => error!("[SSH] {}", entry.message),
    }
}

fn run() -> Result<bool> {
    let target = std::env::args().nth(1).context(USAGE)?;
    let (host, port) = parse_target(&target).map_err(anyhow::Error::msg)?;

    let settings = storage::load_settings().context("Failed to load settings")?;
    let config = SshConfig::from_settings(host, port, &settings.connection);
    let host_literal = config.host_literal();

    let ui: Arc<dyn HostKeyUi> = if config.strict_host_key_checking {
        Arc::new(StrictUi::new(ConsoleUi::tty()))
    } else {
        Arc::new(ConsoleUi::tty())
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ssh-worker")
        .build()
        .context("Failed to create Tokio runtime")?;

    let (event_sender, events) = mpsc::unbounded_channel();
    let (result, outcome) = runtime.block_on(async move {
        let printer = tokio::spawn(drain_events(events));
        let mut client = SshClient::new(config, event_sender, HostKeyPrompt::Ui(ui));
        let result = client.probe().await;
        // 关闭事件通道，让 printer 结束
        drop(client);
        let outcome = printer.await.ok().flatten();
        (result, outcome)
    });

    if let Some(outcome) = outcome {
        println!("{}: {:?}", host_literal, outcome);
    }

    match result {
        Ok(()) => Ok(outcome.map_or(true, |o| o.allows_connection())),
        Err(SshError::HostKey(e)) => {
            error!("[HostKey] {}", e);
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to connect to {}", target)),
    }
}

fn main() -> ExitCode {
    // 初始化日志系统
    // 可以通过 RUST_LOG 环境变量控制日志级别，例如：RUST_LOG=debug hostkey-guard example.com
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false) // 不显示 target（模块路径）
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}
