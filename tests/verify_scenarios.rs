// 主机密钥校验端到端场景

use std::fs;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use russh::keys::PublicKey;
use tempfile::TempDir;

use hostkey_guard::known_hosts::keys::{decode_base64, parse_key_blob};
use hostkey_guard::known_hosts::{Entry, HostKeyEntry, Outcome};
use hostkey_guard::{verify_host_key, HostKeyStatus, HostKeyUi, KnownHostsFile, VerifyOptions};

const KEY: &str = "AAAAC3NzaC1lZDI1NTE5AAAAIKPNxdQMXwM4/sW7JPdzZRU3y7VWDPsZBQ2IZz+PZKK7";

const OTHER_KEY: &str = concat!(
    "AAAAB3NzaC1yc2EAAAABIwAAAQEAl/TQakPkePlnwCBRPitIVUTg6Z8VzN1en+DGkyo/evkmLw",
    "7o4NWR5qbysk9A9jXW332nxnEuAnbcCam9SHe1su1liVfyIK0+3bdn0YRB0sXIbNEtMs2LtCho",
    "/aV3cXPS+Cf1yut3wvIpaRnAzXxuKPCTXQ7/y0IXa8TwkRBH58OJa3RqfQ/NsSp5SAfdsrHyH2",
    "aitiVKm2jfbTKzSEqOQG/zq4J9GXTkq61gZugory/Tvl5/yPgSnOR6C9jVOMHf27ZPoRtyj9SY",
    "343Hd2QHiIE0KPZJEgCynKeWoKz8v6eTSK8n4rBnaqWdp8MnGZK1WGy05MguXbyCDuTC8AmJXQ",
    "==",
);

fn key(encoded: &str) -> PublicKey {
    parse_key_blob(&decode_base64(encoded).unwrap()).unwrap()
}

fn blob(encoded: &str) -> Vec<u8> {
    decode_base64(encoded).unwrap()
}

/// 按预设回答提示，并记录提示与警告
struct ScriptedUi {
    answer: bool,
    prompts: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl ScriptedUi {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
        }
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostKeyUi for ScriptedUi {
    async fn prompt(&self, message: &str) -> io::Result<bool> {
        self.prompts.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

struct Store {
    _dir: TempDir,
    options: VerifyOptions,
}

impl Store {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let options =
            VerifyOptions::new("host.example").with_known_hosts(dir.path().join("known_hosts"));
        Self { _dir: dir, options }
    }

    fn trusting_host() -> Self {
        let store = Self::new();
        let mut file = store.load();
        file.add_host_key("host.example", &key(KEY)).unwrap();
        file.save().unwrap();
        store
    }

    fn load(&self) -> KnownHostsFile {
        KnownHostsFile::load(self.options.known_hosts_path().unwrap()).unwrap()
    }

    fn content(&self) -> String {
        fs::read_to_string(self.options.known_hosts_path().unwrap()).unwrap_or_default()
    }
}

#[test]
fn scenario_a_fresh_store() {
    let store = Store::new();
    let mut file = store.load();
    assert!(file.is_empty());

    file.add_host_key("host.example", &key(KEY)).unwrap();
    assert!(file.has_host_key("host.example", &key(KEY)).unwrap());

    file.save().unwrap();
    assert!(store.load().has_host_key("host.example", &key(KEY)).unwrap());
}

#[tokio::test]
async fn scenario_b_changed_key() {
    let store = Store::trusting_host();
    let before = store.content();
    let ui = ScriptedUi::answering(true);

    let result = verify_host_key(&store.options, "1.2.3.4", &blob(OTHER_KEY), "", &ui).await;
    assert_eq!(Outcome::of(&result), Some(Outcome::Changed));
    assert!(!Outcome::Changed.allows_connection());

    match result.unwrap_err() {
        hostkey_guard::KnownHostsError::HostKeyChanged { entry, line, .. } => {
            assert_eq!(line, 1);
            assert!(matches!(*entry, Entry::Hashed(_)));
            assert!(entry.matches_host("host.example"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(ui.prompt_count(), 0);
    assert_eq!(store.content(), before);
}

#[tokio::test]
async fn scenario_c_address_added_with_warning() {
    let store = Store::trusting_host();
    let ui = ScriptedUi::answering(false);

    let result = verify_host_key(&store.options, "1.2.3.4", &blob(KEY), "", &ui).await;
    assert_eq!(result.unwrap(), HostKeyStatus::AddressAdded);
    assert_eq!(ui.prompt_count(), 0);
    assert_eq!(
        ui.warnings(),
        vec![
            "Warning: Permanently added the ED25519 host key for IP address '1.2.3.4' to the list of known hosts."
                .to_string()
        ]
    );

    let file = store.load();
    assert_eq!(file.len(), 2);
    assert!(file.has_host_key("1.2.3.4", &key(KEY)).unwrap());
}

#[tokio::test]
async fn scenario_d_new_host_accepted() {
    let store = Store::new();
    let ui = ScriptedUi::answering(true);

    let result = verify_host_key(&store.options, "1.2.3.4", &blob(KEY), "", &ui).await;
    assert_eq!(Outcome::of(&result), Some(Outcome::NewAccepted));
    assert_eq!(ui.prompt_count(), 1);
    assert!(ui.warnings().is_empty());

    let file = store.load();
    assert!(file.has_host_key("host.example", &key(KEY)).unwrap());
    assert!(file.has_host_key("1.2.3.4", &key(KEY)).unwrap());
    // 新条目都是哈希形式
    assert!(!store.content().contains("host.example"));
    assert!(!store.content().contains("1.2.3.4"));
}

#[tokio::test]
async fn scenario_e_new_host_rejected() {
    let store = Store::new();
    let ui = ScriptedUi::answering(false);

    let result = verify_host_key(&store.options, "1.2.3.4", &blob(KEY), "", &ui).await;
    assert_eq!(Outcome::of(&result), Some(Outcome::NewRejected));
    assert_eq!(ui.prompt_count(), 1);
    assert!(store.load().is_empty());
    assert_eq!(store.content(), "");
}

#[tokio::test]
async fn plain_entries_from_other_tools_are_kept() {
    let store = Store::new();
    let existing = format!("# managed by hand\nhost.example ssh-ed25519 {} laptop\n", KEY);
    fs::write(store.options.known_hosts_path().unwrap(), &existing).unwrap();
    let ui = ScriptedUi::answering(true);

    let result = verify_host_key(&store.options, "1.2.3.4", &blob(KEY), "", &ui).await;
    assert_eq!(result.unwrap(), HostKeyStatus::AddressAdded);

    let content = store.content();
    assert!(content.starts_with(&existing));
    assert_eq!(content.lines().count(), 3);
}
