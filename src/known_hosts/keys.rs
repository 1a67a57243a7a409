// 公钥编解码辅助函数

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::{Digest, Md5};
use russh::keys::ssh_key::Algorithm;
use russh::keys::PublicKey;

use super::error::EntryError;

/// 严格 base64 解码（标准字母表、规范填充、不允许空白）
pub fn decode_base64(text: &str) -> Result<Vec<u8>, EntryError> {
    Ok(BASE64.decode(text)?)
}

/// base64 编码
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// 从 SSH wire 格式的公钥数据解析公钥
pub fn parse_key_blob(blob: &[u8]) -> Result<PublicKey, EntryError> {
    PublicKey::from_bytes(blob).map_err(|e| EntryError::InvalidKey(e.to_string()))
}

/// 公钥序列化为 SSH wire 格式
pub fn key_blob(key: &PublicKey) -> Result<Vec<u8>, EntryError> {
    key.to_bytes().map_err(|e| EntryError::InvalidKey(e.to_string()))
}

/// 比较两个公钥的密钥材料（忽略注释）
pub fn same_key(a: &PublicKey, b: &PublicKey) -> bool {
    a.key_data() == b.key_data()
}

/// 密钥算法族名称（用于提示文本，如 "RSA"、"ED25519"）
pub fn key_family(key: &PublicKey) -> &'static str {
    match key.algorithm() {
        Algorithm::Rsa { .. } => "RSA",
        Algorithm::Dsa => "DSA",
        Algorithm::Ecdsa { .. } => "ECDSA",
        Algorithm::Ed25519 => "ED25519",
        Algorithm::SkEcdsaSha2NistP256 => "ECDSA-SK",
        Algorithm::SkEd25519 => "ED25519-SK",
        _ => "UNKNOWN",
    }
}

/// 公钥指纹：MD5 摘要，冒号分隔的小写十六进制
pub fn fingerprint(key_blob: &[u8]) -> String {
    Md5::digest(key_blob)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
