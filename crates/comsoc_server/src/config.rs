//! Server settings. The CLI maps flags and `COMSOC_*` environment variables
//! onto this struct; `Default` matches the CLI defaults.

use std::fmt;
use std::str::FromStr;

/// Status for a result requested before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StillOpenStatus {
    /// 425 Too Early
    #[default]
    TooEarly,
    /// 503 Service Unavailable
    Unavailable,
}

impl StillOpenStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            StillOpenStatus::TooEarly => "too-early",
            StillOpenStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for StillOpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StillOpenStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "too-early" => Ok(StillOpenStatus::TooEarly),
            "unavailable" => Ok(StillOpenStatus::Unavailable),
            other => Err(format!("expected too-early or unavailable, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None`: one worker per physical core (actix default).
    pub workers: Option<usize>,
    pub still_open_status: StillOpenStatus,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            workers: None,
            still_open_status: StillOpenStatus::default(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
