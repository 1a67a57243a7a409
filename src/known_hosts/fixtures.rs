// 测试用公钥与样例行

use russh::keys::PublicKey;

use super::keys::{decode_base64, parse_key_blob};

pub const SAMPLE_ENCODED_KEY: &str = concat!(
    "AAAAB3NzaC1yc2EAAAABIwAAAQEAsV0VMRbGmzhqxxayLRHmvnFvtyNqgbNKV46dU1bVFB+3y",
    "tNvue4Riqv/SVkPRNwMb7eWH29SviXaBxUhYyzKkDoNUq3rTNnH1Vnif6d6X4JCrUb5d3W+Dm",
    "YClyJrZ5HgD/hUpdSkTRqdbQ2TrvSAxRacj+vHHT4F4dm1bJSewm3B2D8HVOoi/CbVh3dsIiC",
    "dp8VltdZx4qYVfYe2LwVINCbAa3d3tj9ma7RVfw3OH2Mfb+toLd1N5tBQFb7oqTt2nC6I/6Bd",
    "4JwPUld+IEitw/suElq/AIJVQXXujeyiZlea90HE65U2mF1ytr17HTAIT2ySokJWyuBANGACk",
    "6iIaw==",
);

pub const OTHER_ENCODED_KEY: &str =
    "AAAAC3NzaC1lZDI1NTE5AAAAIKPNxdQMXwM4/sW7JPdzZRU3y7VWDPsZBQ2IZz+PZKK7";

pub const THIRD_ENCODED_KEY: &str = concat!(
    "AAAAB3NzaC1yc2EAAAABIwAAAQEAl/TQakPkePlnwCBRPitIVUTg6Z8VzN1en+DGkyo/evkmLw",
    "7o4NWR5qbysk9A9jXW332nxnEuAnbcCam9SHe1su1liVfyIK0+3bdn0YRB0sXIbNEtMs2LtCho",
    "/aV3cXPS+Cf1yut3wvIpaRnAzXxuKPCTXQ7/y0IXa8TwkRBH58OJa3RqfQ/NsSp5SAfdsrHyH2",
    "aitiVKm2jfbTKzSEqOQG/zq4J9GXTkq61gZugory/Tvl5/yPgSnOR6C9jVOMHf27ZPoRtyj9SY",
    "343Hd2QHiIE0KPZJEgCynKeWoKz8v6eTSK8n4rBnaqWdp8MnGZK1WGy05MguXbyCDuTC8AmJXQ",
    "==",
);

/// www.twistedmatrix.com 的哈希条目（sample key）
pub const SAMPLE_HASHED_PREFIX: &str = "|1|gJbSEPBG9ZSBoZpHNtZBD1bHKBA=|bQv+0Xa0dByrwkA1EB0E7Xop/Fo=";

fn key(encoded: &str) -> PublicKey {
    parse_key_blob(&decode_base64(encoded).unwrap()).unwrap()
}

pub fn sample_key() -> PublicKey {
    key(SAMPLE_ENCODED_KEY)
}

pub fn other_key() -> PublicKey {
    key(OTHER_ENCODED_KEY)
}

pub fn third_key() -> PublicKey {
    key(THIRD_ENCODED_KEY)
}

pub fn sample_plain_line() -> String {
    format!("www.twistedmatrix.com ssh-rsa {}\n", SAMPLE_ENCODED_KEY)
}

pub fn sample_host_ip_line() -> String {
    format!(
        "www.twistedmatrix.com,198.49.126.131 ssh-rsa {}\n",
        SAMPLE_ENCODED_KEY
    )
}

pub fn other_plain_line() -> String {
    format!("divmod.com ssh-ed25519 {}\n", OTHER_ENCODED_KEY)
}

pub fn sample_hashed_line() -> String {
    format!("{} ssh-rsa {}\n", SAMPLE_HASHED_PREFIX, SAMPLE_ENCODED_KEY)
}
