use std::path::PathBuf;

use authfetch_core::{
    client::ReqwestFetcher,
    constants::{AUTHFETCH_CONFIG_DIR_NAME, AUTHFETCH_STORAGE_FILE_NAME},
    fetch::AuthFetch,
    storage::FileStorage,
};
use once_cell::sync::OnceCell;
use url::Url;

static AUTHFETCH_CLI_CONFIG: OnceCell<CliConfig> = OnceCell::new();

pub(crate) fn cli_config() -> &'static CliConfig {
    AUTHFETCH_CLI_CONFIG
        .get()
        .expect("pls init authfetch cli config first")
}

pub(crate) fn init_cli_config(config: CliConfig) {
    AUTHFETCH_CLI_CONFIG
        .set(config)
        .expect("config can only be set once");
}

#[derive(Debug)]
pub struct CliConfig {
    pub host: Url,
    pub storage_path: PathBuf,
}

impl CliConfig {
    pub fn new(host: &str, storage_path: Option<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            host: Url::parse(host)?,
            storage_path: storage_path.unwrap_or_else(default_storage_path),
        })
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_path)
    }

    pub fn fetcher(&self) -> anyhow::Result<ReqwestFetcher> {
        ReqwestFetcher::new(Some(self.host.clone()))
    }

    pub fn auth_client(&self) -> anyhow::Result<AuthFetch<FileStorage, ReqwestFetcher>> {
        Ok(AuthFetch::new(self.storage(), self.fetcher()?))
    }
}

fn default_storage_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(AUTHFETCH_CONFIG_DIR_NAME)
        .join(AUTHFETCH_STORAGE_FILE_NAME)
}
