// known_hosts 信任库
// 负责加载、查询、追加与原子保存，以及首次信任（TOFU）校验流程

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use russh::keys::PublicKey;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::entry::{Entry, HashedEntry, HostKeyEntry};
use super::error::{EntryError, KnownHostsError};
use super::keys::{fingerprint, key_blob, key_family};
use crate::ui::HostKeyUi;

/// 校验通过的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// 主机名与地址都已信任该公钥
    Confirmed,
    /// 主机名已信任，地址是新的：自动加入并发出警告
    AddressAdded,
    /// 未知主机，用户确认后加入
    Accepted,
}

/// 校验的全部可能结果（用于日志与界面展示）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    Changed,
    NewAccepted,
    NewRejected,
    IpAddedWithWarning,
}

impl Outcome {
    /// 由校验结果得出 Outcome；Changed / Rejected 以外的错误没有对应值
    pub fn of(result: &Result<HostKeyStatus, KnownHostsError>) -> Option<Self> {
        match result {
            Ok(HostKeyStatus::Confirmed) => Some(Self::Confirmed),
            Ok(HostKeyStatus::AddressAdded) => Some(Self::IpAddedWithWarning),
            Ok(HostKeyStatus::Accepted) => Some(Self::NewAccepted),
            Err(KnownHostsError::HostKeyChanged { .. }) => Some(Self::Changed),
            Err(KnownHostsError::UserRejectedKey) => Some(Self::NewRejected),
            Err(_) => None,
        }
    }

    /// 是否允许连接继续
    pub fn allows_connection(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::NewAccepted | Self::IpAddedWithWarning
        )
    }
}

/// known_hosts 文件
///
/// 条目顺序即文件行顺序，只追加不重排。
#[derive(Clone, Debug)]
pub struct KnownHostsFile {
    entries: Vec<Entry>,
    path: PathBuf,
}

impl KnownHostsFile {
    /// 创建绑定到 path 的空信任库（不读文件）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            path: path.into(),
        }
    }

    /// 从文件加载
    ///
    /// 文件不存在时返回空信任库；无法识别的行保留为 Unparsed。
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, KnownHostsError> {
        let path = path.into();
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("[KnownHosts] {} does not exist, starting empty", path.display());
                return Ok(Self::new(path));
            }
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<Entry> = content
            .split_inclusive(|b| *b == b'\n')
            .enumerate()
            .map(|(index, raw)| {
                // 行尾统一按 \n 写回，\r\n 在这里一并去掉
                let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                let line = match std::str::from_utf8(raw) {
                    Ok(line) => line.to_string(),
                    Err(_) => {
                        warn!(
                            "[KnownHosts] {}:{} is not valid UTF-8",
                            path.display(),
                            index + 1
                        );
                        String::from_utf8_lossy(raw).into_owned()
                    }
                };
                Entry::parse_line(&line)
            })
            .collect();

        debug!(
            "[KnownHosts] Loaded {} line(s) from {} ({} unparsed)",
            entries.len(),
            path.display(),
            entries.iter().filter(|e| e.is_unparsed()).count()
        );

        Ok(Self { entries, path })
    }

    /// 绑定的文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 全部条目（文件顺序）
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 查询主机是否已信任该公钥
    ///
    /// 第一个匹配主机的条目决定结果：公钥一致返回 true，不一致返回 HostKeyChanged。
    /// 没有条目匹配该主机时返回 false。
    pub fn has_host_key(&self, host: &str, key: &PublicKey) -> Result<bool, KnownHostsError> {
        let Some((index, entry)) = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.matches_host(host))
        else {
            return Ok(false);
        };

        if entry.matches_key(key) {
            return Ok(true);
        }

        Err(KnownHostsError::HostKeyChanged {
            host: host.to_string(),
            entry: Box::new(entry.clone()),
            line: index + 1,
            path: self.path.clone(),
        })
    }

    /// 为主机追加一个新的哈希条目（只修改内存，不写文件）
    pub fn add_host_key(&mut self, host: &str, key: &PublicKey) -> Result<HashedEntry, EntryError> {
        let entry = HashedEntry::new(host, key)?;
        self.entries.push(entry.clone().into());
        Ok(entry)
    }

    /// 序列化为文件内容：每个条目一行，均以换行结尾
    pub fn to_file_content(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}\n", entry))
            .collect()
    }

    /// 保存到绑定路径
    ///
    /// 先写同目录临时文件再 rename，失败时原文件保持不变。
    /// 符号链接写到链接目标，已有文件的权限保持不变。
    pub fn save(&self) -> Result<(), KnownHostsError> {
        let target = match fs::canonicalize(&self.path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(e.into()),
        };
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(self.to_file_content().as_bytes())?;
        if let Ok(metadata) = fs::metadata(&target) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;

        debug!(
            "[KnownHosts] Saved {} line(s) to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// 追加条目并保存；任一步失败时撤销本次追加的条目
    fn add_and_save(&mut self, hosts: &[&str], key: &PublicKey) -> Result<(), KnownHostsError> {
        let before = self.entries.len();
        let result = hosts
            .iter()
            .try_for_each(|host| self.add_host_key(host, key).map(drop))
            .map_err(KnownHostsError::from)
            .and_then(|()| self.save());
        if result.is_err() {
            self.entries.truncate(before);
        }
        result
    }

    /// 校验主机公钥（TOFU）
    ///
    /// 1. 主机名已信任：再查地址；地址未知时自动加入地址并警告，不提示。
    /// 2. 主机名未知：提示用户，确认后同时加入主机名和地址。
    /// 3. 任一查询发现公钥变化：立即失败，不提示、不修改信任库。
    pub async fn verify_host_key(
        &mut self,
        ui: &dyn HostKeyUi,
        hostname: &str,
        address: &str,
        key: &PublicKey,
    ) -> Result<HostKeyStatus, KnownHostsError> {
        if self.has_host_key(hostname, key)? {
            if self.has_host_key(address, key)? {
                debug!("[HostKey] {} ({}) matches known_hosts", hostname, address);
                return Ok(HostKeyStatus::Confirmed);
            }

            self.add_and_save(&[address], key)?;
            info!(
                "[HostKey] Added {} key for address {} of trusted host {}",
                key_family(key),
                address,
                hostname
            );
            ui.warn(&format!(
                "Warning: Permanently added the {} host key for IP address '{}' to the list of known hosts.",
                key_family(key),
                address
            ));
            return Ok(HostKeyStatus::AddressAdded);
        }

        let prompt = format!(
            "The authenticity of host '{} ({})' can't be established.\n\
             {} key fingerprint is {}.\n\
             Are you sure you want to continue connecting (yes/no)? ",
            hostname,
            address,
            key_family(key),
            fingerprint(&key_blob(key)?)
        );

        if !ui.prompt(&prompt).await? {
            info!("[HostKey] User rejected key for {} ({})", hostname, address);
            return Err(KnownHostsError::UserRejectedKey);
        }

        self.add_and_save(&[hostname, address], key)?;
        info!(
            "[HostKey] Accepted new {} key for {} ({})",
            key_family(key),
            hostname,
            address
        );
        Ok(HostKeyStatus::Accepted)
    }
}
