// hostkey-guard - SSH known_hosts 信任库与主机密钥校验

pub mod known_hosts;
pub mod models;
pub mod services;
pub mod ssh;
pub mod ui;

pub use known_hosts::{HostKeyStatus, KnownHostsError, KnownHostsFile};
pub use ssh::{verify_host_key, VerifyOptions};
pub use ui::HostKeyUi;
