use url::Url;

use crate::error::Result;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "quickchart.io";
pub const DEFAULT_PORT: u16 = 443;

/// Connection target of the chart service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Endpoint {
    /// Resolve a target from partial parts.
    ///
    /// Without a host the default target is used and `scheme`/`port` are
    /// ignored. A host without a scheme always means `https` on 443. A host
    /// with a scheme but no port gets 80 for `http` and 443 for anything else.
    pub fn resolve(scheme: Option<&str>, host: Option<&str>, port: Option<u16>) -> Self {
        let Some(host) = host else {
            return Self::default();
        };

        match scheme {
            Some(scheme) => Self {
                scheme: scheme.to_string(),
                host: host.to_string(),
                port: port.unwrap_or_else(|| default_port(scheme)),
            },
            None => Self {
                scheme: DEFAULT_SCHEME.to_string(),
                host: host.to_string(),
                port: DEFAULT_PORT,
            },
        }
    }

    /// `{scheme}://{host}:{port}`, with the port always written out.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Absolute URL of a service path such as `/chart/create`.
    pub fn request_url(&self, path: &str) -> Result<Url> {
        let url = Url::parse(&format!("{}{}", self.base_url(), path))?;
        Ok(url)
    }
}

fn default_port(scheme: &str) -> u16 {
    if scheme == "http" { 80 } else { DEFAULT_PORT }
}
