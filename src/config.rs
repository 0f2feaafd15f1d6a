use crate::error::{
    BadEnvVarSnafu, HubError, HubResult, ParseNumberSnafu, ParseServerAddrSnafu,
    ZeroNotAllowedSnafu,
};
use snafu::{ResultExt, ensure};
use std::{env::VarError, net::SocketAddr, sync::Arc};

pub const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
pub const DEFAULT_SOURCE_URL: &str = "https://dummyjson.com/users";
pub const DEFAULT_FALLBACK_COUNT: usize = 25;
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_addr: SocketAddr,
    source_config: Arc<SourceConfig>,
    page_size: usize,
}

#[derive(Debug)]
pub struct SourceConfig {
    pub url: String,
    pub fallback_count: usize,
}

impl RuntimeConfiguration {
    pub fn new() -> HubResult<Self> {
        Self::from_vars(|name| match dotenvy::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
            Err(source) => Err(source).context(BadEnvVarSnafu { name }),
        })
    }

    ///`get_var` returns `Ok(None)` for unset variables, which fall back to the defaults
    pub fn from_vars(
        get_var: impl Fn(&'static str) -> HubResult<Option<String>>,
    ) -> HubResult<Self> {
        let server_ip =
            get_var("STUDENTHUB_SERVER_IP")?.unwrap_or_else(|| DEFAULT_SERVER_IP.to_string());
        let server_addr = server_ip
            .parse()
            .context(ParseServerAddrSnafu { original: server_ip })?;

        let url =
            get_var("STUDENTHUB_SOURCE_URL")?.unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

        let fallback_count = parse_count(
            "STUDENTHUB_FALLBACK_COUNT",
            get_var("STUDENTHUB_FALLBACK_COUNT")?,
            DEFAULT_FALLBACK_COUNT,
        )?;

        let page_size = parse_count(
            "STUDENTHUB_PAGE_SIZE",
            get_var("STUDENTHUB_PAGE_SIZE")?,
            DEFAULT_PAGE_SIZE,
        )?;
        ensure!(page_size > 0, ZeroNotAllowedSnafu {
            name: "STUDENTHUB_PAGE_SIZE"
        });

        Ok(Self {
            server_addr,
            source_config: Arc::new(SourceConfig {
                url,
                fallback_count,
            }),
            page_size,
        })
    }

    pub const fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub fn source_config(&self) -> Arc<SourceConfig> {
        self.source_config.clone()
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

fn parse_count(name: &'static str, raw: Option<String>, default: usize) -> HubResult<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    raw.trim()
        .parse()
        .context(ParseNumberSnafu { original: raw, name })
}
