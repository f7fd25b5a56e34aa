use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::env;
use std::time::Duration;

const DEFAULT_HTTP_ADDR: &str = ":8080";
const DEFAULT_READ_HEADER_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "bookmarks")]
#[command(about = "Runs the bookmarks service", long_about = None)]
pub struct Cli {
    /// Load environment overrides from this file instead of `./.env`
    #[arg(short = 'e', long = "env-file")]
    pub env_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub http_addr: String,
    pub read_header_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            read_header_timeout: DEFAULT_READ_HEADER_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl Config {
    /// Loads the env file (if any) into the process environment, then reads
    /// the config from it. Only an explicitly requested env file must exist.
    pub fn load(env_file: Option<&str>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_filename(path)
                    .with_context(|| format!("failed to load env file {path}"))?;
            }
            None => match dotenvy::dotenv() {
                Ok(path) => tracing::info!(path = ?path, "loaded .env file"),
                Err(e) if e.not_found() => tracing::info!("no .env file found"),
                Err(e) => tracing::warn!(error = %e, "failed to load .env file, ignoring it"),
            },
        }

        Ok(Config::from_lookup(|key| env::var(key).ok()))
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = lookup("HTTP_ADDR") {
            cfg.http_addr = addr;
        }

        if let Some(val) = lookup("HTTP_READ_HEADER_TIMEOUT") {
            match parse_duration(&val) {
                Ok(d) => cfg.read_header_timeout = d,
                Err(e) => tracing::warn!(error = %e, "invalid HTTP_READ_HEADER_TIMEOUT, using default"),
            }
        }

        if let Some(val) = lookup("HTTP_SHUTDOWN_TIMEOUT") {
            match parse_duration(&val) {
                Ok(d) => cfg.shutdown_timeout = d,
                Err(e) => tracing::warn!(error = %e, "invalid HTTP_SHUTDOWN_TIMEOUT, using default"),
            }
        }

        cfg
    }

    /// `:8080` style addresses listen on every interface.
    pub fn bind_address(&self) -> String {
        if self.http_addr.starts_with(':') {
            format!("0.0.0.0{}", self.http_addr)
        } else {
            self.http_addr.clone()
        }
    }
}

/// Parses durations written like `10s`, `250ms` or `1m30s`.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let s = raw.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        bail!("empty duration");
    }

    let mut nanos = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            bail!("invalid duration {raw:?}");
        }
        let value: f64 = rest[..num_end]
            .parse()
            .map_err(|_| anyhow!("invalid duration {raw:?}"))?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => bail!("missing unit in duration {raw:?}"),
            other => bail!("unknown unit {other:?} in duration {raw:?}"),
        };
        nanos += value * unit;
        rest = &rest[unit_end..];
    }

    let nanos = nanos.round();
    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        bail!("duration {raw:?} out of range");
    }

    Ok(Duration::from_nanos(nanos as u64))
}
