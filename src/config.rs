use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "classfolio", about = "Class portfolio and photo gallery server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// SQLite database location (a path, optionally prefixed with sqlite://)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Key used to sign session cookies
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Upload endpoint of the remote image host
    #[arg(long, env = "IMAGE_HOST_URL")]
    pub image_host_url: Option<String>,

    /// API key for the remote image host
    #[arg(long, env = "IMAGE_HOST_API_KEY", hide_env_values = true)]
    pub image_host_api_key: Option<String>,

    /// API key for the transactional email provider
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for locally stored uploads
    pub path: Option<PathBuf>,
    pub max_upload_mb: usize,
    pub image_host: ImageHostConfig,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ImageHostConfig {
    pub upload_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub session_secret: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_upload_mb: 16,
            image_host: ImageHostConfig::default(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.sendgrid.com/v3/mail/send".to_string(),
            from_email: "noreply@portfolio.dev".to_string(),
            from_name: "Class Portfolio".to_string(),
            to_email: "walikelas@example.com".to_string(),
        }
    }
}

impl ImageHostConfig {
    /// Both the endpoint and the key are needed to talk to the host.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.upload_url.as_deref(), self.api_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI / environment overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref url) = cli.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(ref secret) = cli.session_secret {
            config.auth.session_secret = Some(secret.clone());
        }
        if let Some(ref url) = cli.image_host_url {
            config.storage.image_host.upload_url = Some(url.clone());
        }
        if let Some(ref key) = cli.image_host_api_key {
            config.storage.image_host.api_key = Some(key.clone());
        }
        if let Some(ref key) = cli.sendgrid_api_key {
            config.mail.api_key = Some(key.clone());
        }

        if config.storage.path.is_none() {
            config.storage.path = Some(data_dir.join("uploads"));
        }

        config.validate()?;
        Ok(config)
    }

    /// Required settings must be present before the server starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            anyhow::bail!("DATABASE_URL must be set");
        }
        if self
            .auth
            .session_secret
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            anyhow::bail!("SESSION_SECRET must be set");
        }
        Ok(())
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".classfolio")
        })
    }

    /// Filesystem path of the SQLite database named by the database URL.
    pub fn db_path(&self) -> PathBuf {
        let url = self.database.url.as_deref().unwrap_or_default();
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        PathBuf::from(path)
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("uploads"))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(dir: &std::path::Path) -> Cli {
        Cli {
            config: None,
            host: None,
            port: None,
            data_dir: Some(dir.to_path_buf()),
            database_url: Some(dir.join("portfolio.db").display().to_string()),
            session_secret: Some("s3cret".to_string()),
            image_host_url: None,
            image_host_api_key: None,
            sendgrid_api_key: None,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.max_upload_mb, 16);
        assert!(config.database.url.is_none());
        assert!(config.storage.path.is_none());
        assert!(config.mail.api_key.is_none());
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli_for(std::path::Path::new("/tmp/test-classfolio"));
        assert_eq!(Config::data_dir(&cli), PathBuf::from("/tmp/test-classfolio"));
    }

    #[test]
    fn load_resolves_paths_and_secrets() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli_for(tmp.path())).unwrap();
        assert_eq!(config.db_path(), tmp.path().join("portfolio.db"));
        assert_eq!(config.uploads_path(), tmp.path().join("uploads"));
        assert_eq!(config.auth.session_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.max_upload_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn load_without_database_url_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cli = cli_for(tmp.path());
        cli.database_url = None;
        let err = Config::load(&cli).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn load_with_blank_session_secret_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cli = cli_for(tmp.path());
        cli.session_secret = Some("   ".to_string());
        let err = Config::load(&cli).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn db_path_strips_sqlite_scheme() {
        let mut config = Config::default();
        config.database.url = Some("sqlite:///var/lib/app.db".to_string());
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/app.db"));

        config.database.url = Some("sqlite:data.db".to_string());
        assert_eq!(config.db_path(), PathBuf::from("data.db"));
    }

    #[test]
    fn image_host_needs_url_and_key() {
        let mut host = ImageHostConfig::default();
        assert!(host.credentials().is_none());
        host.upload_url = Some("https://img.example.com/upload".to_string());
        assert!(host.credentials().is_none());
        host.api_key = Some("key".to_string());
        assert_eq!(
            host.credentials(),
            Some(("https://img.example.com/upload", "key"))
        );
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
host = "192.168.1.1"
port = 9000

[storage]
max_upload_mb = 4

[mail]
to_email = "class@example.com"
"#,
        )
        .unwrap();

        let mut cli = cli_for(tmp.path());
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.max_upload_mb, 4);
        assert_eq!(config.mail.to_email, "class@example.com");
        assert_eq!(
            config.mail.api_url,
            "https://api.sendgrid.com/v3/mail/send"
        );
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
host = "192.168.1.1"
port = 9000

[database]
url = "from-file.db"
"#,
        )
        .unwrap();

        let mut cli = cli_for(tmp.path());
        cli.config = Some(config_path);
        cli.host = Some("10.0.0.1".to_string());
        cli.port = Some(4000);
        cli.sendgrid_api_key = Some("SG.key".to_string());
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.db_path(), tmp.path().join("portfolio.db"));
        assert_eq!(config.mail.api_key.as_deref(), Some("SG.key"));
    }
}
