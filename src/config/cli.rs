use crate::config::HttpConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_request_url, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "http-kit")]
#[command(about = "Issue simple GET/POST requests and print the response body")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "TOML file with client settings")]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub connect_timeout_ms: Option<u64>,

    #[arg(long, global = true)]
    pub read_timeout_ms: Option<u64>,

    #[arg(long, global = true)]
    pub write_timeout_ms: Option<u64>,

    #[arg(long, global = true, help = "Verify TLS certificates and hostnames")]
    pub strict_tls: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// GET with optional query parameters
    Get {
        url: String,
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        #[arg(long, help = "Dispatch on a worker thread and wait for the callback")]
        callback: bool,
    },
    /// POST form-encoded parameters
    Post {
        url: String,
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        #[arg(long, help = "Dispatch on a worker thread and wait for the callback")]
        callback: bool,
    },
    /// POST a raw body
    PostBody {
        url: String,
        body: String,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// POST a raw body and stream the response to stdout
    Stream { url: String, body: String },
}

impl Command {
    pub fn url(&self) -> &str {
        match self {
            Command::Get { url, .. }
            | Command::Post { url, .. }
            | Command::PostBody { url, .. }
            | Command::Stream { url, .. } => url,
        }
    }
}

/// 解析 `key=value` 形式的參數
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((key.to_string(), value.to_string()))
}

impl CliConfig {
    /// 設定檔（或預設值）再套上命令列覆寫
    pub fn http_config(&self) -> Result<HttpConfig> {
        let mut config = match &self.config {
            Some(path) => HttpConfig::from_file(path)?,
            None => HttpConfig::default(),
        };

        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = ms;
        }
        if let Some(ms) = self.write_timeout_ms {
            config.write_timeout_ms = ms;
        }
        if self.strict_tls {
            config.trust_all_certificates = false;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_request_url("url", self.command.url())
    }
}
