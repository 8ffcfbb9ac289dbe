use std::path::PathBuf;

use clap::Parser;

/// Upper bound on images accepted in one upload.
pub const MAX_IMAGES_PER_TOUR: usize = 20;

/// Default request body limit: 200 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Upload panoramas and serve them as a linear virtual tour")]
pub struct ServerConfig {
    #[clap(short, long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
    #[clap(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,
    #[clap(short, long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,
    #[clap(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
    #[clap(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            cors_origin: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
