//! Token and aura dispositions.
//!
//! A token's disposition describes its faction. An aura's disposition
//! describes which relation between the aura's token and another token
//! it affects. The relation is the product of both tokens' codes, so
//! `-1` means "enemies", `1` means "allies", and `0` means at least one
//! side is neutral.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Faction disposition of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenDisposition {
    /// Disposition hidden from players.
    Secret,
    /// Hostile to the players.
    Hostile,
    /// Neither hostile nor friendly.
    Neutral,
    /// Friendly to the players.
    Friendly,
}

impl TokenDisposition {
    /// Returns the numeric disposition code.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Secret => -2,
            Self::Hostile => -1,
            Self::Neutral => 0,
            Self::Friendly => 1,
        }
    }
}

/// Which tokens an aura affects, relative to the aura's own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum AuraDisposition {
    /// Only tokens hostile to the aura's token.
    Enemies,
    /// Every token.
    #[default]
    Any,
    /// Only tokens allied with the aura's token.
    Allies,
}

impl AuraDisposition {
    /// Returns the numeric code (`-1`, `0` or `1`).
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Enemies => -1,
            Self::Any => 0,
            Self::Allies => 1,
        }
    }

    /// Whether an aura with this disposition affects a token with the given
    /// relation code.
    #[must_use]
    pub const fn admits(self, relation: i8) -> bool {
        matches!(self, Self::Any) || self.code() == relation
    }
}

impl TryFrom<i8> for AuraDisposition {
    type Error = DomainError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Self::Enemies),
            0 => Ok(Self::Any),
            1 => Ok(Self::Allies),
            other => Err(DomainError::Validation(format!(
                "aura disposition must be -1, 0 or 1, got {other}"
            ))),
        }
    }
}

impl From<AuraDisposition> for i8 {
    fn from(disposition: AuraDisposition) -> Self {
        disposition.code()
    }
}

/// How secret tokens take part in disposition matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretDispositionPolicy {
    /// Secret tokens relate to others as neutral tokens do, so only
    /// auras affecting anyone reach them.
    #[default]
    AsNeutral,
    /// Secret tokens are treated as hostile.
    AsHostile,
    /// Secret tokens neither give nor receive aura effects.
    Exclude,
}

impl SecretDispositionPolicy {
    /// Resolves a token disposition to the code used for matching, or
    /// `None` when the token is excluded.
    #[must_use]
    pub const fn resolve(self, disposition: TokenDisposition) -> Option<i8> {
        match (disposition, self) {
            (TokenDisposition::Secret, Self::AsNeutral) => Some(0),
            (TokenDisposition::Secret, Self::AsHostile) => Some(-1),
            (TokenDisposition::Secret, Self::Exclude) => None,
            (other, _) => Some(other.code()),
        }
    }

    /// Relation code between two tokens: the product of their codes.
    #[must_use]
    pub fn relation(self, a: TokenDisposition, b: TokenDisposition) -> Option<i8> {
        Some(self.resolve(a)? * self.resolve(b)?)
    }
}

impl FromStr for SecretDispositionPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "as_neutral" => Ok(Self::AsNeutral),
            "as_hostile" => Ok(Self::AsHostile),
            "exclude" => Ok(Self::Exclude),
            other => Err(DomainError::Validation(format!(
                "unknown secret disposition policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for SecretDispositionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AsNeutral => "as_neutral",
            Self::AsHostile => "as_hostile",
            Self::Exclude => "exclude",
        };
        f.write_str(name)
    }
}
