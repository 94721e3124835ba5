use std::path::PathBuf;

use clap::Parser;

/// Serves blood group predictions from fingerprint images.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BLOODGROUP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "BLOODGROUP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// ONNX model artifact loaded at startup
    #[arg(long, env = "BLOODGROUP_MODEL", default_value = "model.onnx")]
    pub model_path: PathBuf,

    /// Directory uploads are staged in while being classified (defaults to the system temp dir)
    #[arg(long, env = "BLOODGROUP_UPLOADS")]
    pub upload_dir: Option<PathBuf>,

    /// Number of HTTP worker threads (defaults to the number of CPUs)
    #[arg(long, env = "BLOODGROUP_WORKERS")]
    pub workers: Option<usize>,
}
