use railplan_common::i18n::{normalize_locale, DEFAULT_LOCALE};
use railplan_notify::channels::email::SmtpSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_host")]
    pub http_host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Locale of CSV headers, line names and emails (`fr` or `en`)
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Raises the default log level to debug
    #[serde(default)]
    pub debug: bool,
    /// Insert the sample trains when the table is empty
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            locale: default_locale(),
            debug: false,
            seed_sample_data: default_seed_sample_data(),
            database: DatabaseConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; derived from `data_dir` when omitted
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            data_dir: default_data_dir(),
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "sqlite://{}?mode=rwc",
                Path::new(&self.data_dir).join("railplan.db").display()
            ),
        }
    }

    pub fn redacted_url(&self) -> String {
        railplan_storage::store::redact_db_url(&self.connection_url())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_server")]
    pub server: String,
    #[serde(default = "default_mail_port")]
    pub port: u16,
    #[serde(default = "default_mail_use_tls")]
    pub use_tls: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender address; falls back to the username, then `railplan@app.fr`
    #[serde(default)]
    pub default_sender: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: default_mail_server(),
            port: default_mail_port(),
            use_tls: default_mail_use_tls(),
            username: String::new(),
            password: String::new(),
            default_sender: None,
        }
    }
}

impl MailConfig {
    pub fn sender(&self) -> String {
        match &self.default_sender {
            Some(sender) if !sender.is_empty() => sender.clone(),
            _ if !self.username.is_empty() => self.username.clone(),
            _ => default_sender(),
        }
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.server.clone(),
            port: self.port,
            use_tls: self.use_tls,
            username: Some(self.username.clone()).filter(|u| !u.is_empty()),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
            from: self.sender(),
        }
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_mail_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_mail_port() -> u16 {
    587
}

fn default_mail_use_tls() -> bool {
    true
}

fn default_sender() -> String {
    "railplan@app.fr".to_string()
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ServerConfig {
    /// Load the TOML file at `path` (defaults when it does not exist), then
    /// apply environment overrides.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content)?
        } else {
            tracing::warn!(path, "Config file not found, using defaults");
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay the deployment environment variables
    /// (`DATABASE_URL`, `MAIL_SERVER`, `MAIL_PORT`, ...).
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("RAILPLAN_DATA_DIR") {
            self.database.data_dir = v;
        }
        if let Some(v) = lookup("HTTP_PORT") {
            self.http_port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid HTTP_PORT '{v}': {e}"))?;
        }
        if let Some(v) = lookup("RAILPLAN_LOCALE") {
            self.locale = v;
        }
        if let Some(v) = lookup("DEBUG") {
            self.debug = parse_bool(&v);
        }
        if let Some(v) = lookup("MAIL_SERVER") {
            self.mail.server = v;
        }
        if let Some(v) = lookup("MAIL_PORT") {
            self.mail.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid MAIL_PORT '{v}': {e}"))?;
        }
        if let Some(v) = lookup("MAIL_USE_TLS") {
            self.mail.use_tls = parse_bool(&v);
        }
        if let Some(v) = lookup("MAIL_USERNAME") {
            self.mail.username = v;
        }
        if let Some(v) = lookup("MAIL_PASSWORD") {
            self.mail.password = v;
        }
        if let Some(v) = lookup("MAIL_DEFAULT_SENDER") {
            self.mail.default_sender = Some(v);
        }
        self.locale = normalize_locale(&self.locale).to_string();
        Ok(())
    }
}
