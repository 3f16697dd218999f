//! Fastbank Configuration Settings
//!
//! Configuration for the banking server, loaded from environment
//! variables. The variant switch selects the vulnerable or the patched
//! behavior for the whole process.

/// Default HTTP server port.
const DEFAULT_PORT: u16 = 4000;

/// Which behavior the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// String-concatenated SQL, predictable session tokens.
    Insecure,
    /// Parameter binding, random session tokens.
    #[default]
    Hardened,
}

impl Variant {
    /// Parse a variant from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "insecure" => Self::Insecure,
            _ => Self::Hardened,
        }
    }

    /// Get the variant name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insecure => "insecure",
            Self::Hardened => "hardened",
        }
    }

    /// Check if this is the insecure variant.
    #[must_use]
    pub const fn is_insecure(&self) -> bool {
        matches!(self, Self::Insecure)
    }
}

/// Complete fastbank configuration.
#[derive(Debug, Clone)]
pub struct FastbankConfig {
    /// HTTP server port.
    pub port: u16,
    /// Selected behavior variant.
    pub variant: Variant,
}

impl FastbankConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `FASTBANK_PORT` (default 4000) and `FASTBANK_VARIANT`
    /// (`insecure` | `hardened`, default `hardened`).
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the startup path uniform
    /// with the other lab servers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_env_u16("FASTBANK_PORT", DEFAULT_PORT);

        let variant = std::env::var("FASTBANK_VARIANT")
            .map(|s| Variant::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Ok(Self { port, variant })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("environment variable {0} has an invalid value")]
    InvalidValue(String),
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
