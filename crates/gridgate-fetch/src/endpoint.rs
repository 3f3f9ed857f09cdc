//! Sandbox vs. production endpoint selection.

/// Target PJM environment.
///
/// The sandbox ("train") environment uses separate hosts and a separate
/// session-cookie name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// The production Markets Gateway.
    #[default]
    Production,
    /// The training sandbox.
    Sandbox,
}

impl Environment {
    /// URL of the OpenAM single sign-on login endpoint.
    #[must_use]
    pub const fn sso_url(self) -> &'static str {
        match self {
            Self::Production => "https://sso.pjm.com/access/authenticate/",
            Self::Sandbox => "https://ssotrain.pjm.com/access/authenticate/",
        }
    }

    /// URL of the Markets Gateway query endpoint.
    #[must_use]
    pub const fn query_url(self) -> &'static str {
        match self {
            Self::Production => "https://marketsgateway.pjm.com/marketsgateway/xml/query",
            Self::Sandbox => "https://marketsgatewaytrain.pjm.com/marketsgateway/xml/query",
        }
    }

    /// Name of the session cookie carrying the token.
    #[must_use]
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::Production => "pjmauth",
            Self::Sandbox => "pjmauthtrain",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}
