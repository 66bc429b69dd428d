use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory holding the per-site cookie jar files.
    pub cookie_dir: PathBuf,
    /// Jar file base name; the site suffix (`.copart.txt` / `.iaai.txt`) is appended.
    pub cookie_file_base: String,
    /// Interpreter used to run the cookie minter scripts.
    pub node_path: PathBuf,
    /// Working directory for minter invocations; script paths resolve against it.
    pub minter_dir: PathBuf,
    pub iaai_minter_script: String,
    pub copart_minter_script: String,
    pub minter_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// TCP/TLS connect timeout for listing requests, within the request timeout.
    pub connect_timeout_secs: u64,
    pub proxy_url: Option<String>,
    /// Base of the Copart lot-details endpoint; the lot id is appended.
    pub copart_lot_details_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("cookie_dir", &self.cookie_dir)
            .field("cookie_file_base", &self.cookie_file_base)
            .field("node_path", &self.node_path)
            .field("minter_dir", &self.minter_dir)
            .field("iaai_minter_script", &self.iaai_minter_script)
            .field("copart_minter_script", &self.copart_minter_script)
            .field("minter_timeout_secs", &self.minter_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .field("copart_lot_details_url", &self.copart_lot_details_url)
            .finish()
    }
}
