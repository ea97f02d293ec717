use std::env;
use std::path::PathBuf;

/// Runtime configuration for the backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port (default: 3000)
    pub port: u16,

    /// Store connection string (default: local SQLite file)
    pub database_url: String,

    /// Allowed CORS origins, comma separated in the environment (default: "*")
    pub allowed_origins: Vec<String>,

    /// Directory receiving uploaded files (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum upload size in bytes (default: 50 MB)
    pub max_file_size: usize,

    /// The single extension accepted by the ingest pipeline, without the dot
    pub allowed_extension: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "sqlite://learning_penguin.db?mode=rwc".to_string(),
            allowed_origins: vec!["*".to_string()],
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 50 * 1024 * 1024, // 50 MB
            allowed_extension: "pdf".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            allowed_origins: env::var("CORS_ORIGIN")
                .ok()
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(default.allowed_origins),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            allowed_extension: env::var("ALLOWED_EXTENSION")
                .map(|v| v.trim_start_matches('.').to_lowercase())
                .unwrap_or(default.allowed_extension),
        }
    }

    /// Config for local development and tests: uploads under the given directory
    pub fn development(upload_dir: impl Into<PathBuf>, database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            upload_dir: upload_dir.into(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:5173".to_string(),
            ],
            ..Self::default()
        }
    }

    /// True when any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
