//! Environment-driven process configuration
//!
//! Built once in `main` and passed through `AppState`; nothing mutates it
//! afterwards.

use std::env;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub upload_path: String,
    pub jwt_secret: String,
    pub max_file_size_mb: u64,
    pub max_files_per_upload: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server_address =
            env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let upload_path = env::var("UPLOAD_PATH").unwrap_or_else(|_| "./uploads".to_string());
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET must be set"))?;

        let max_file_size_mb = match env::var("MAX_FILE_SIZE_MB") {
            Ok(value) => value
                .parse::<u64>()
                .context("MAX_FILE_SIZE_MB must be a positive integer")?,
            Err(_) => 50,
        };

        let max_files_per_upload = match env::var("MAX_FILES_PER_UPLOAD") {
            Ok(value) => value
                .parse::<usize>()
                .context("MAX_FILES_PER_UPLOAD must be a positive integer")?,
            Err(_) => 10,
        };

        Ok(Config {
            server_address,
            upload_path,
            jwt_secret,
            max_file_size_mb,
            max_files_per_upload,
        })
    }

    /// Per-file payload bound in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Transport body cap for the upload routes: a full batch of maximum-size
    /// files plus multipart framing overhead.
    pub fn max_upload_body_bytes(&self) -> usize {
        let per_file = self.max_file_size_mb as usize * 1024 * 1024;
        per_file * self.max_files_per_upload + 1024 * 1024
    }
}
