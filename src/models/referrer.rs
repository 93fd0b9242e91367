//! Referrer argument parsing
//!
//! The `/start` deep-link parameter is untrusted text. Parsing it into an
//! explicit three-way result keeps the "malformed means no referrer" policy a
//! visible, tested branch rather than an implicit null.

/// Parse result of the optional `/start` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferrerArg {
    /// A syntactically valid user id distinct from the referee's own id.
    Valid(i64),
    /// No argument was supplied.
    Absent,
    /// An argument was supplied but is not usable (malformed, negative, or a
    /// self-referral). Treated the same as `Absent` for crediting.
    Invalid,
}

impl ReferrerArg {
    /// Parse the raw argument for a start event issued by `user_id`.
    pub fn parse(raw: Option<&str>, user_id: i64) -> Self {
        let Some(raw) = raw else {
            return ReferrerArg::Absent;
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return ReferrerArg::Absent;
        }

        match raw.parse::<i64>() {
            Ok(id) if id >= 0 && id != user_id => ReferrerArg::Valid(id),
            _ => ReferrerArg::Invalid,
        }
    }

    /// The referrer id, if one was validly supplied.
    pub fn valid_id(self) -> Option<i64> {
        match self {
            ReferrerArg::Valid(id) => Some(id),
            ReferrerArg::Absent | ReferrerArg::Invalid => None,
        }
    }
}
