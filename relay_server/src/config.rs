use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use log::*;
use mageos_tools::MageosConfig;
use relay_common::helpers::{non_empty, parse_boolean_flag};
use relay_engine::{RelayOptions, DEFAULT_ORDER_ID_FIELD};
use url::Url;

const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
const DEFAULT_RELAY_PORT: u16 = 3000;
const DEFAULT_SENT_FILE: &str = "data/sent.json";
const DEFAULT_POLL_INTERVAL_MS: i64 = 15_000;
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The sent ledger. Relative paths are resolved against the working directory.
    pub sent_file: PathBuf,
    /// Orders are POSTed here.
    pub target_url: String,
    /// The period of the background poll. `None` disables the timer, leaving only the manual triggers.
    pub poll_interval: Option<Duration>,
    pub page_size: u32,
    /// Applies to calls to the commerce API and to the target.
    pub http_timeout: Duration,
    pub order_id_field: String,
    /// If true, the server also plays the part of the target system at `POST /target/orders`.
    pub dummy_target: bool,
    pub mageos: MageosConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let http_timeout = Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS);
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
            sent_file: PathBuf::from(DEFAULT_SENT_FILE),
            target_url: default_target_url(DEFAULT_RELAY_PORT),
            poll_interval: poll_interval_from_ms(DEFAULT_POLL_INTERVAL_MS),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout,
            order_id_field: DEFAULT_ORDER_ID_FIELD.to_string(),
            dummy_target: true,
            mageos: MageosConfig::default().with_timeout(http_timeout),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, target_url: default_target_url(port), ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = non_empty(env::var("RELAY_HOST").ok()).unwrap_or_else(|| DEFAULT_RELAY_HOST.into());
        let port = parse_env("RELAY_PORT", DEFAULT_RELAY_PORT);
        let sent_file = non_empty(env::var("RELAY_SENT_FILE").ok()).unwrap_or_else(|| {
            info!("🪛️ RELAY_SENT_FILE is not set. Using the default, {DEFAULT_SENT_FILE}.");
            DEFAULT_SENT_FILE.into()
        });
        let target_url = target_url_or_default(non_empty(env::var("RELAY_TARGET_URL").ok()), port);
        let poll_interval = poll_interval_from_ms(parse_env("RELAY_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS));
        let page_size = match parse_env("RELAY_PAGE_SIZE", DEFAULT_PAGE_SIZE) {
            0 => {
                warn!("🪛️ RELAY_PAGE_SIZE must be at least 1. Using the default, {DEFAULT_PAGE_SIZE}, instead.");
                DEFAULT_PAGE_SIZE
            },
            n => n,
        };
        let http_timeout = Duration::from_secs(parse_env("RELAY_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS));
        let order_id_field =
            non_empty(env::var("RELAY_ORDER_ID_FIELD").ok()).unwrap_or_else(|| DEFAULT_ORDER_ID_FIELD.into());
        let dummy_target = parse_boolean_flag(env::var("RELAY_DUMMY_TARGET").ok(), true);
        let mageos = MageosConfig::new_from_env_or_default().with_timeout(http_timeout);
        Self {
            host,
            port,
            sent_file: PathBuf::from(sent_file),
            target_url,
            poll_interval,
            page_size,
            http_timeout,
            order_id_field,
            dummy_target,
            mageos,
        }
    }

    /// The coordinator settings derived from this configuration.
    pub fn relay_options(&self) -> RelayOptions {
        let mut options = RelayOptions::new(self.target_url.clone());
        options.page_size = self.page_size;
        options.id_field = self.order_id_field.clone();
        // Slightly longer than the HTTP client timeout, which should fire first
        options.source_timeout = self.http_timeout + Duration::from_secs(1);
        options.forward_timeout = self.http_timeout + Duration::from_secs(1);
        options
    }

    pub fn server_options(&self) -> ServerOptions {
        ServerOptions::from_config(self)
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the configuration that request handlers need to see. Keep secrets out of here.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub poll_interval: Option<Duration>,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { poll_interval: config.poll_interval }
    }

    /// The poll interval as reported by `/health`. 0 means the timer is disabled.
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval.map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

pub fn default_target_url(port: u16) -> String {
    format!("http://localhost:{port}/target/orders")
}

/// Uses `value` if it is an absolute http(s) URL, and the dummy target on `port` otherwise.
pub fn target_url_or_default(value: Option<String>, port: u16) -> String {
    let default = default_target_url(port);
    let Some(value) = value else {
        info!("🪛️ RELAY_TARGET_URL is not set. Orders will be forwarded to the dummy target at {default}.");
        return default;
    };
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => value,
        Ok(url) => {
            error!("🪛️ RELAY_TARGET_URL must be an http(s) URL, not {}. Using {default} instead.", url.scheme());
            default
        },
        Err(e) => {
            error!("🪛️ {value} is not a valid URL for RELAY_TARGET_URL. {e} Using {default} instead.");
            default
        },
    }
}

/// Zero or negative intervals switch the background poll off.
pub fn poll_interval_from_ms(ms: i64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms as u64))
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match non_empty(env::var(name).ok()) {
        None => default,
        Some(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}
