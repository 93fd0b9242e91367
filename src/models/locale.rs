//! Locale model
//!
//! The bot speaks exactly two languages. Modeling them as a closed enum keeps
//! missing-translation errors out of runtime entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported message locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    En,
}

impl Locale {
    /// The other member of the locale set. Toggling twice is the identity.
    pub fn toggled(self) -> Self {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// Parse a stored locale code. Unknown codes are rejected so callers
    /// decide the fallback explicitly.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ar" => Some(Locale::Ar),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Ar
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
