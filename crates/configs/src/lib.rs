use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub uri: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            name: default_db_name(),
            app_name: default_app_name(),
            max_pool_size: default_max_pool_size(),
            min_pool_size: default_min_pool_size(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Token signing and login behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Answer both unknown-email and wrong-password logins with the same message.
    #[serde(default)]
    pub uniform_login_errors: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            uniform_login_errors: false,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_db_name() -> String { "admin_panel".into() }
fn default_app_name() -> String { "admin-panel".into() }
fn default_max_pool_size() -> u32 { 10 }
fn default_min_pool_size() -> u32 { 0 }
fn default_connect_timeout() -> u64 { 10 }
fn default_token_ttl() -> u64 { 3600 }

/// Load `config.toml` (or `CONFIG_PATH`) and fill the keys it leaves out or
/// empty from the environment. A missing file means environment only; a file
/// that exists but does not parse is an error.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match load_from_file(&path) {
        Err(e) if is_missing_file(&e) => parse_with_env("", process_env),
        other => other,
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_with_env(&content, process_env)
}

/// Parse file content alone: unset keys take their defaults.
pub fn parse(content: &str) -> Result<AppConfig> {
    parse_with_env(content, |_| None)
}

/// Parse file content, resolving each key as file, then `env`, then default.
pub fn parse_with_env(content: &str, env: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let file: FileConfig = toml::from_str(content)?;
    Ok(file.resolve(&env))
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let cfg = load_default()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// On-disk shape: every key optional so the environment can fill the gaps.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    database: FileDatabase,
    #[serde(default)]
    auth: FileAuth,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    host: Option<String>,
    port: Option<u16>,
    worker_threads: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileDatabase {
    uri: Option<String>,
    name: Option<String>,
    app_name: Option<String>,
    max_pool_size: Option<u32>,
    min_pool_size: Option<u32>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileAuth {
    jwt_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    uniform_login_errors: Option<bool>,
}

struct Resolver<'a> {
    env: &'a dyn Fn(&str) -> Option<String>,
}

impl Resolver<'_> {
    fn env(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|v| !v.trim().is_empty())
    }

    fn text(&self, file: Option<String>, key: &str) -> Option<String> {
        file.filter(|v| !v.trim().is_empty()).or_else(|| self.env(key))
    }

    fn parsed<T: std::str::FromStr>(&self, file: Option<T>, key: &str) -> Option<T> {
        file.or_else(|| self.env(key).and_then(|v| v.trim().parse().ok()))
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl FileConfig {
    fn resolve(self, env: &dyn Fn(&str) -> Option<String>) -> AppConfig {
        let r = Resolver { env };
        let FileConfig { server, database, auth } = self;
        AppConfig {
            server: ServerConfig {
                host: r.text(server.host, "SERVER_HOST").unwrap_or_else(default_host),
                port: r.parsed(server.port, "PORT").unwrap_or_else(default_port),
                worker_threads: r
                    .parsed(server.worker_threads, "TOKIO_WORKER_THREADS")
                    .filter(|n| *n > 0),
            },
            database: DatabaseConfig {
                uri: r.text(database.uri, "MONGO_URI").unwrap_or_default(),
                name: r.text(database.name, "MONGO_DB_NAME").unwrap_or_else(default_db_name),
                app_name: database.app_name.unwrap_or_else(default_app_name),
                max_pool_size: database.max_pool_size.unwrap_or_else(default_max_pool_size),
                min_pool_size: database.min_pool_size.unwrap_or_else(default_min_pool_size),
                connect_timeout_secs: database
                    .connect_timeout_secs
                    .unwrap_or_else(default_connect_timeout),
            },
            auth: AuthSettings {
                jwt_secret: r.text(auth.jwt_secret, "JWT_SECRET").unwrap_or_default(),
                token_ttl_secs: r
                    .parsed(auth.token_ttl_secs, "JWT_TTL_SECS")
                    .unwrap_or_else(default_token_ttl),
                uniform_login_errors: auth
                    .uniform_login_errors
                    .or_else(|| r.env("UNIFORM_LOGIN_ERRORS").as_deref().and_then(parse_flag))
                    .unwrap_or(false),
            },
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("server.host must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(anyhow!("database.uri is empty; set it in config.toml or MONGO_URI"));
        }
        let lower = self.uri.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.uri must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        if self.max_pool_size < self.min_pool_size {
            return Err(anyhow!("database.max_pool_size must be >= min_pool_size"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        uri = "mongodb://localhost:27017"
        name = "panel"

        [auth]
        jwt_secret = "s3cret"
        uniform_login_errors = true
    "#;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_full_file() {
        let cfg = parse(FULL).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.name, "panel");
        assert_eq!(cfg.auth.token_ttl_secs, 3600);
        assert!(cfg.auth.uniform_login_errors);
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        cfg.validate().unwrap();
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.name, "admin_panel");
        assert_eq!(cfg.database.max_pool_size, 10);
        assert!(!cfg.auth.uniform_login_errors);
    }

    #[test]
    fn file_values_win_over_environment() {
        let env = env_of(&[
            ("SERVER_HOST", "10.0.0.1"),
            ("PORT", "9999"),
            ("MONGO_URI", "mongodb://elsewhere"),
            ("MONGO_DB_NAME", "other"),
            ("JWT_SECRET", "env-secret"),
            ("JWT_TTL_SECS", "60"),
            ("UNIFORM_LOGIN_ERRORS", "false"),
        ]);
        let cfg = parse_with_env(FULL, env).unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.database.uri, "mongodb://localhost:27017");
        assert_eq!(cfg.database.name, "panel");
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert!(cfg.auth.uniform_login_errors);
        // not set in the file, so the environment fills it
        assert_eq!(cfg.auth.token_ttl_secs, 60);
    }

    #[test]
    fn environment_fills_missing_and_empty_keys() {
        let file = r#"
            [server]
            host = ""
            [database]
            uri = "  "
        "#;
        let env = env_of(&[
            ("SERVER_HOST", "10.0.0.1"),
            ("PORT", "7000"),
            ("TOKIO_WORKER_THREADS", "4"),
            ("MONGO_URI", "mongodb://db:27017"),
            ("JWT_SECRET", "env-secret"),
            ("UNIFORM_LOGIN_ERRORS", "yes"),
        ]);
        let cfg = parse_with_env(file, env).unwrap();
        assert_eq!(cfg.bind_addr(), "10.0.0.1:7000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.database.uri, "mongodb://db:27017");
        assert_eq!(cfg.auth.jwt_secret, "env-secret");
        assert!(cfg.auth.uniform_login_errors);
        cfg.validate().unwrap();
    }

    #[test]
    fn unparsable_environment_values_fall_back_to_defaults() {
        let env = env_of(&[
            ("PORT", "eighty"),
            ("JWT_TTL_SECS", "-1"),
            ("TOKIO_WORKER_THREADS", "0"),
        ]);
        let cfg = parse_with_env("", env).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.auth.token_ttl_secs, 3600);
        assert_eq!(cfg.server.worker_threads, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse("[server\nport = ").is_err());
        assert!(parse("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn only_a_missing_file_counts_as_absent() {
        let dir = std::env::temp_dir().join(format!("configs-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("absent.toml");
        let err = load_from_file(missing.to_str().unwrap()).unwrap_err();
        assert!(is_missing_file(&err));

        let broken = dir.join("broken.toml");
        std::fs::write(&broken, "[database\nuri = ").unwrap();
        let err = load_from_file(broken.to_str().unwrap()).unwrap_err();
        assert!(!is_missing_file(&err));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_non_mongo_uri() {
        let db = DatabaseConfig { uri: "postgres://x".into(), ..Default::default() };
        assert!(db.validate().is_err());
        let ok = DatabaseConfig {
            uri: "mongodb+srv://cluster0.example.net".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            uri: "mongodb://h".into(),
            max_pool_size: 1,
            min_pool_size: 5,
            ..Default::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_missing_secret_and_zero_ttl() {
        assert!(AuthSettings::default().validate().is_err());
        let zero =
            AuthSettings { jwt_secret: "k".into(), token_ttl_secs: 0, uniform_login_errors: false };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn zero_port_is_invalid() {
        let cfg = parse("[server]\nport = 0").unwrap();
        assert!(cfg.server.validate().is_err());
    }
}
