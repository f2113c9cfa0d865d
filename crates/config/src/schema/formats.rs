//! Format checks for string rules.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use url::{Host, Url};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("label pattern is valid")
});

static TLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,63}$").expect("tld pattern is valid"));

/// Options for URL validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlOptions {
    /// The host must be a dotted domain with an alphabetic TLD, or an IP.
    pub require_tld: bool,
    /// The URL must carry its own scheme; otherwise `http://` is assumed.
    pub require_protocol: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            require_tld: true,
            require_protocol: true,
        }
    }
}

/// Formats a string rule can enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    /// A domain name (TLD optional) or an IP address.
    Host,
    Url(UrlOptions),
}

impl StringFormat {
    /// URL format with default options.
    pub fn url() -> Self {
        Self::Url(UrlOptions::default())
    }

    pub(crate) fn matches(self, value: &str) -> bool {
        match self {
            Self::Email => is_email(value),
            Self::Host => is_host(value),
            Self::Url(options) => is_url(value, options),
        }
    }

    /// The tail of the failure message, e.g. `a valid email`.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::Email => "a valid email",
            Self::Host => "a valid (domain or ip)",
            Self::Url(_) => "a valid URL",
        }
    }
}

fn is_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_RE.is_match(value)
}

fn is_host(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok() || is_domain(value, false)
}

fn is_domain(value: &str, require_tld: bool) -> bool {
    if value.is_empty() || value.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = value.split('.').collect();
    if !labels.iter().all(|label| LABEL_RE.is_match(label)) {
        return false;
    }

    if require_tld {
        return labels.len() > 1 && labels.last().is_some_and(|tld| TLD_RE.is_match(tld));
    }
    true
}

fn is_url(value: &str, options: UrlOptions) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate = if !options.require_protocol && !value.contains("://") {
        format!("http://{value}")
    } else {
        value.to_string()
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain(domain)) => is_domain(domain, options.require_tld),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    }
}
