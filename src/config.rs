use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf, str::FromStr};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub files_dir: PathBuf,
    pub database_url: String,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i64,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Product catalog API with image uploads")]
pub struct Args {
    /// Host to bind to (overrides STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding uploaded images and thumbnails (overrides FILES_DIR)
    #[arg(long)]
    pub files_dir: Option<PathBuf>,

    /// Database URL (overrides STORE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Request body limit for uploads, in bytes (overrides STORE_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Session lifetime in hours (overrides STORE_SESSION_TTL_HOURS)
    #[arg(long)]
    pub session_ttl_hours: Option<i64>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args)?, migrate))
    }

    /// CLI values win; environment fills the gaps; defaults fill the rest.
    fn merge(args: Args) -> Result<Self> {
        let env_host = env::var("STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_env("STORE_PORT", 5000u16)?;
        let env_files = env::var("FILES_DIR").unwrap_or_else(|_| "./data/images".into());
        let env_db = env::var("STORE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/store.db?mode=rwc".into());
        let env_max_upload = parse_env("STORE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let env_ttl = parse_env("STORE_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            files_dir: args.files_dir.unwrap_or_else(|| PathBuf::from(env_files)),
            database_url: args.database_url.unwrap_or(env_db),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
            session_ttl_hours: args.session_ttl_hours.unwrap_or(env_ttl),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
