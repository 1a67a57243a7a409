// known_hosts 信任库模块
//
// 模块结构:
// - entry: 单行条目 (PlainEntry, HashedEntry, UnparsedEntry, Entry)
// - file: 信任库文件与校验流程 (KnownHostsFile, HostKeyStatus)
// - hash: 主机名 HMAC-SHA1 哈希
// - keys: 公钥编解码、指纹
// - error: 错误类型 (EntryError, KnownHostsError)

pub mod entry;
pub mod error;
pub mod file;
pub mod hash;
pub mod keys;

#[cfg(test)]
pub(crate) mod fixtures;

// 公开导出
pub use entry::{Entry, HashedEntry, HostKeyEntry, PlainEntry, UnparsedEntry};
pub use error::{EntryError, KnownHostsError};
pub use file::{HostKeyStatus, KnownHostsFile, Outcome};
pub use keys::{fingerprint, key_family};
