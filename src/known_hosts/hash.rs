// 主机名哈希（OpenSSH |1| 方案）
// HMAC-SHA1(salt, hostname)，salt 长度等于 SHA1 输出长度

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// 哈希方案版本标记
pub const HASH_MAGIC: &str = "|1|";

/// salt 长度（SHA1 输出长度，OpenSSH 要求 20 字节）
pub const SALT_LEN: usize = 20;

fn keyed(salt: &[u8]) -> HmacSha1 {
    HmacSha1::new_from_slice(salt).expect("HMAC accepts keys of any length")
}

/// 计算主机名哈希
pub fn hash_host(salt: &[u8], host: &str) -> Vec<u8> {
    let mut mac = keyed(salt);
    mac.update(host.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// 校验主机名与哈希是否一致（完全相等，常量时间比较）
pub fn host_matches(salt: &[u8], hash: &[u8], host: &str) -> bool {
    let mut mac = keyed(salt);
    mac.update(host.as_bytes());
    mac.verify_slice(hash).is_ok()
}

/// 生成新的随机 salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
