use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Crawlscope
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Traversal bounds and politeness
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Where the crawl starts; a missing scheme defaults to http
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of URLs dequeued (and so records produced)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum BFS distance from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Explicit delay between requests; overrides robots.txt Crawl-delay
    #[serde(rename = "delay-seconds", default)]
    pub delay_seconds: Option<f64>,

    #[serde(rename = "respect-robots", default)]
    pub respect_robots: bool,
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Product token, also used to match robots.txt groups
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Full header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, contact),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Which fetch strategy a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    #[default]
    Anonymous,
    SessionAuth,
    Browser,
}

impl FetchMode {
    /// The mode's name as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::SessionAuth => "session-auth",
            Self::Browser => "browser",
        }
    }
}

/// Fetch strategy selection and its settings
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub mode: FetchMode,

    /// HTTP request timeout
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub session: Option<SessionAuthConfig>,

    #[serde(default)]
    pub browser: Option<BrowserConfig>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Anonymous,
            timeout_seconds: default_timeout_seconds(),
            session: None,
            browser: None,
        }
    }
}

/// Form login performed once before a session-authenticated crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SessionAuthConfig {
    #[serde(rename = "login-url")]
    pub login_url: String,

    pub username: String,

    #[serde(default)]
    pub password: Option<String>,

    /// Read the password from this environment variable instead
    #[serde(rename = "password-env", default)]
    pub password_env: Option<String>,

    #[serde(rename = "username-field", default = "default_username_field")]
    pub username_field: String,

    #[serde(rename = "password-field", default = "default_password_field")]
    pub password_field: String,

    /// Additional form fields posted with the credentials
    #[serde(rename = "extra-fields", default)]
    pub extra_fields: BTreeMap<String, String>,
}

/// WebDriver-backed rendering
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Fixed settle time, and the bound on the selector wait
    #[serde(rename = "render-wait-seconds", default = "default_render_wait")]
    pub render_wait_seconds: f64,

    /// CSS selector to wait for instead of sleeping
    #[serde(rename = "wait-selector", default)]
    pub wait_selector: Option<String>,

    #[serde(default)]
    pub login: Option<BrowserLoginConfig>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            render_wait_seconds: default_render_wait(),
            wait_selector: None,
            login: None,
        }
    }
}

/// Scripted login run in the browser before crawling
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserLoginConfig {
    #[serde(rename = "login-url")]
    pub login_url: String,

    pub username: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(rename = "password-env", default)]
    pub password_env: Option<String>,

    #[serde(rename = "username-selector", default = "default_username_selector")]
    pub username_selector: String,

    #[serde(rename = "password-selector", default = "default_password_selector")]
    pub password_selector: String,

    #[serde(rename = "submit-selector", default = "default_submit_selector")]
    pub submit_selector: String,

    #[serde(rename = "wait-after-seconds", default = "default_login_wait")]
    pub wait_after_seconds: f64,
}

/// Export destinations; every path is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,

    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,

    #[serde(rename = "document-path", default)]
    pub document_path: Option<String>,

    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

fn default_max_pages() -> usize {
    50
}

fn default_max_depth() -> u32 {
    3
}

fn default_crawler_name() -> String {
    "crawlscope".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_username_field() -> String {
    "username".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_render_wait() -> f64 {
    2.0
}

fn default_username_selector() -> String {
    "#username".to_string()
}

fn default_password_selector() -> String {
    "#password".to_string()
}

fn default_submit_selector() -> String {
    "#login-submit".to_string()
}

fn default_login_wait() -> f64 {
    3.0
}
