use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identities permitted to use the admin surface. The single source of
    /// truth for both login and the request gate.
    pub admin_emails: Vec<String>,
    /// Argon2 PHC-format hash shared by the admin accounts.
    pub admin_password_hash: String,
    /// HS256 secret for signed session tokens.
    pub token_secret: String,
    /// Session token lifetime in hours.
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Gcs,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// Base URL prepended to local blob keys when building public URLs
    pub public_base_url: String,
    /// GCS bucket name (required when backend is gcs)
    pub gcs_bucket: Option<String>,
    /// Path to GCS service account JSON (optional, defaults to ADC)
    pub gcs_credentials_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./files".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            gcs_bucket: None,
            gcs_credentials_file: None,
        }
    }
}

impl AuthConfig {
    /// Check an identity claim against the admin allow-list.
    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let admin_emails: Vec<String> = std::env::var("ADMIN_EMAILS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH").unwrap_or_default();

        let token_secret = std::env::var("TOKEN_SECRET").unwrap_or_default();

        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "gcs" => StorageBackend::Gcs,
            _ => StorageBackend::Local,
        };

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./files".to_string());

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let gcs_bucket = std::env::var("GCS_BUCKET").ok();
        let gcs_credentials_file = std::env::var("GCS_CREDENTIALS_FILE").ok();

        let config = Config {
            server: ServerConfig {
                bind_address,
                data_dir,
            },
            auth: AuthConfig {
                admin_emails,
                admin_password_hash,
                token_secret,
                token_ttl_hours,
            },
            storage: StorageConfig {
                backend: storage_backend,
                local_storage_path,
                public_base_url,
                gcs_bucket,
                gcs_credentials_file,
            },
            test_mode,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "TOKEN_SECRET must be set".to_string(),
            ));
        }

        if self.auth.admin_emails.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_EMAILS must list at least one admin identity".to_string(),
            ));
        }

        if self.auth.admin_password_hash.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_PASSWORD_HASH must be set".to_string(),
            ));
        }

        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "TOKEN_TTL_HOURS must be positive".to_string(),
            ));
        }

        if matches!(self.storage.backend, StorageBackend::Gcs) && self.storage.gcs_bucket.is_none()
        {
            return Err(ConfigError::ValidationError(
                "GCS_BUCKET is required when STORAGE_BACKEND=gcs".to_string(),
            ));
        }

        Ok(())
    }
}
