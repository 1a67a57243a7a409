// known_hosts 条目
//
// 每一行对应一个 Entry：
// - Plain:    host[,host...] key-type base64-key [comment]
// - Hashed:   |1|base64-salt|base64-hash key-type base64-key [comment]
// - Unparsed: 其他任何内容，原样保留

use std::fmt;
use std::str::FromStr;

use russh::keys::PublicKey;
use tracing::debug;

use super::error::EntryError;
use super::hash::{generate_salt, hash_host, host_matches, HASH_MAGIC, SALT_LEN};
use super::keys::{decode_base64, encode_base64, key_blob, parse_key_blob, same_key};

/// 条目的公共能力
pub trait HostKeyEntry {
    /// 该条目是否指向给定主机
    fn matches_host(&self, host: &str) -> bool;

    /// 该条目的公钥是否与给定公钥一致
    fn matches_key(&self, key: &PublicKey) -> bool;
}

/// 取下一个空白分隔字段，返回 (字段, 剩余部分)
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some((&text[..end], &text[end..]))
}

/// 去掉一个行尾换行
fn strip_newline(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// 公钥字段（Plain 与 Hashed 共用）
#[derive(Clone, Debug, PartialEq, Eq)]
struct KeyField {
    key_type: String,
    key: PublicKey,
    blob: Vec<u8>,
    comment: Option<String>,
}

impl KeyField {
    fn from_key(key: &PublicKey) -> Result<Self, EntryError> {
        Ok(Self {
            key_type: key.algorithm().as_str().to_string(),
            blob: key_blob(key)?,
            key: key.clone(),
            comment: None,
        })
    }

    fn fmt_tail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} {}", self.key_type, encode_base64(&self.blob))?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

/// 拆分一行为 (host-spec, 公钥字段)
///
/// 检查顺序：字段数量 -> 公钥 base64 -> 公钥数据，host-spec 由调用方继续解析。
fn split_line(line: &str) -> Result<(&str, KeyField), EntryError> {
    let line = strip_newline(line);
    let malformed = || EntryError::Malformed(format!("expected at least 3 fields: {:?}", line));

    let (host_spec, rest) = next_field(line).ok_or_else(malformed)?;
    let (key_type, rest) = next_field(rest).ok_or_else(malformed)?;
    let (encoded_key, rest) = next_field(rest).ok_or_else(malformed)?;

    let blob = decode_base64(encoded_key)?;
    let key = parse_key_blob(&blob)?;

    let comment = rest.trim_start();
    let comment = (!comment.is_empty()).then(|| comment.to_string());

    Ok((
        host_spec,
        KeyField {
            key_type: key_type.to_string(),
            key,
            blob,
            comment,
        },
    ))
}

// ======================== Plain ========================

/// 明文条目：一个或多个逗号分隔的主机名/IP
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainEntry {
    hosts: Vec<String>,
    field: KeyField,
}

impl PlainEntry {
    /// 主机名/IP 列表
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn key_type(&self) -> &str {
        &self.field.key_type
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.field.key
    }

    pub fn comment(&self) -> Option<&str> {
        self.field.comment.as_deref()
    }
}

impl FromStr for PlainEntry {
    type Err = EntryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (host_spec, field) = split_line(line)?;
        let hosts = host_spec.split(',').map(str::to_string).collect();
        Ok(Self { hosts, field })
    }
}

impl HostKeyEntry for PlainEntry {
    fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    fn matches_key(&self, key: &PublicKey) -> bool {
        same_key(&self.field.key, key)
    }
}

impl fmt::Display for PlainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hosts.join(","))?;
        self.field.fmt_tail(f)
    }
}

// ======================== Hashed ========================

/// 哈希条目：只保存 salt 与 HMAC-SHA1(salt, host)
///
/// 每个条目只对应一个主机名或 IP。主机名与 IP 一起哈希后就无法单独判断其中一个是否已存在。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashedEntry {
    salt: Vec<u8>,
    hash: Vec<u8>,
    field: KeyField,
}

impl HashedEntry {
    /// 为主机生成新的哈希条目（随机 salt）
    pub fn new(host: &str, key: &PublicKey) -> Result<Self, EntryError> {
        let salt = generate_salt().to_vec();
        let hash = hash_host(&salt, host);
        Ok(Self {
            salt,
            hash,
            field: KeyField::from_key(key)?,
        })
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn key_type(&self) -> &str {
        &self.field.key_type
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.field.key
    }

    pub fn comment(&self) -> Option<&str> {
        self.field.comment.as_deref()
    }
}

impl FromStr for HashedEntry {
    type Err = EntryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (host_spec, field) = split_line(line)?;

        let salt_and_hash = host_spec.strip_prefix(HASH_MAGIC).ok_or_else(|| {
            EntryError::Malformed(format!("missing {} marker: {:?}", HASH_MAGIC, host_spec))
        })?;
        let segments: Vec<&str> = salt_and_hash.split('|').collect();
        let [salt, hash] = segments.as_slice() else {
            return Err(EntryError::Malformed(format!(
                "expected salt|hash, got {} segment(s)",
                segments.len()
            )));
        };

        let salt = decode_base64(salt)?;
        let hash = decode_base64(hash)?;
        if salt.len() != SALT_LEN {
            return Err(EntryError::Malformed(format!(
                "salt must be {} bytes, got {}",
                SALT_LEN,
                salt.len()
            )));
        }

        Ok(Self { salt, hash, field })
    }
}

impl HostKeyEntry for HashedEntry {
    fn matches_host(&self, host: &str) -> bool {
        host_matches(&self.salt, &self.hash, host)
    }

    fn matches_key(&self, key: &PublicKey) -> bool {
        same_key(&self.field.key, key)
    }
}

impl fmt::Display for HashedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}|{}",
            HASH_MAGIC,
            encode_base64(&self.salt),
            encode_base64(&self.hash)
        )?;
        self.field.fmt_tail(f)
    }
}

// ======================== Unparsed ========================

/// 无法识别的行，原样保留，不匹配任何主机和公钥
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnparsedEntry {
    raw: String,
}

impl UnparsedEntry {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// 原始文本（含可能的行尾换行）
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl HostKeyEntry for UnparsedEntry {
    fn matches_host(&self, _host: &str) -> bool {
        false
    }

    fn matches_key(&self, _key: &PublicKey) -> bool {
        false
    }
}

impl fmt::Display for UnparsedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.strip_suffix('\n').unwrap_or(&self.raw))
    }
}

// ======================== Entry ========================

/// known_hosts 中的一行
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Plain(PlainEntry),
    Hashed(HashedEntry),
    Unparsed(UnparsedEntry),
}

impl Entry {
    /// 宽松解析一行：任何失败都降级为 Unparsed，不返回错误
    pub fn parse_line(line: &str) -> Self {
        let content = line.trim_start();
        if content.trim_end().is_empty() || content.starts_with('#') {
            return Self::Unparsed(UnparsedEntry::new(line));
        }

        let parsed = if content.starts_with(HASH_MAGIC) {
            line.parse().map(Self::Hashed)
        } else {
            line.parse().map(Self::Plain)
        };

        parsed.unwrap_or_else(|e| {
            debug!("[KnownHosts] Keeping unparseable line verbatim: {}", e);
            Self::Unparsed(UnparsedEntry::new(line))
        })
    }

    /// 公钥（Unparsed 没有）
    pub fn public_key(&self) -> Option<&PublicKey> {
        match self {
            Self::Plain(entry) => Some(entry.public_key()),
            Self::Hashed(entry) => Some(entry.public_key()),
            Self::Unparsed(_) => None,
        }
    }

    /// 密钥类型标签（Unparsed 没有）
    pub fn key_type(&self) -> Option<&str> {
        match self {
            Self::Plain(entry) => Some(entry.key_type()),
            Self::Hashed(entry) => Some(entry.key_type()),
            Self::Unparsed(_) => None,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

impl HostKeyEntry for Entry {
    fn matches_host(&self, host: &str) -> bool {
        match self {
            Self::Plain(entry) => entry.matches_host(host),
            Self::Hashed(entry) => entry.matches_host(host),
            Self::Unparsed(entry) => entry.matches_host(host),
        }
    }

    fn matches_key(&self, key: &PublicKey) -> bool {
        match self {
            Self::Plain(entry) => entry.matches_key(key),
            Self::Hashed(entry) => entry.matches_key(key),
            Self::Unparsed(entry) => entry.matches_key(key),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(entry) => fmt::Display::fmt(entry, f),
            Self::Hashed(entry) => fmt::Display::fmt(entry, f),
            Self::Unparsed(entry) => fmt::Display::fmt(entry, f),
        }
    }
}

impl From<HashedEntry> for Entry {
    fn from(entry: HashedEntry) -> Self {
        Self::Hashed(entry)
    }
}
