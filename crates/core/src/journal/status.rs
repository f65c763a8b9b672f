//! Journal entry status state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a journal entry.
///
/// The only legal transitions are Draft -> Posted and Posted -> Voided.
/// Posted and voided entries are immutable; correcting a posted entry
/// means voiding it with a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Editable, not yet part of any balance.
    Draft,
    /// Finalized and included in balances.
    Posted,
    /// Cancelled by a posted reversal; kept for audit.
    Voided,
}

impl EntryStatus {
    /// Returns true if an entry in this status can be posted.
    #[must_use]
    pub fn can_post(self) -> bool {
        self == Self::Draft
    }

    /// Returns true if an entry in this status can be voided.
    #[must_use]
    pub fn can_void(self) -> bool {
        self == Self::Posted
    }

    /// Returns true if entries in this status can no longer be edited.
    #[must_use]
    pub fn is_immutable(self) -> bool {
        self != Self::Draft
    }

    /// Returns true if `self -> target` is a legal transition.
    #[must_use]
    pub fn allows_transition(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Posted) | (Self::Posted, Self::Voided)
        )
    }

    /// Returns the lowercase string form used in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "voided" => Ok(Self::Voided),
            other => Err(format!("unknown entry status: {other}")),
        }
    }
}
