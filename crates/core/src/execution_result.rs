use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Result flags reported by the query engine when a batch completes.
///
/// Several flags can be raised at once (a cancelled batch that also failed
/// reports `FAILURE | CANCEL`), so this is a bitmask rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionResult(u32);

impl ExecutionResult {
    pub const SUCCESS: Self = Self(1);
    pub const FAILURE: Self = Self(2);
    pub const CANCEL: Self = Self(4);
    pub const TIMEOUT: Self = Self(8);
    pub const HALTED: Self = Self(16);
    /// Every flag the engine defines.
    pub const MASK: Self = Self(31);

    const NAMED: [(Self, &'static str); 5] = [
        (Self::SUCCESS, "Success"),
        (Self::FAILURE, "Failure"),
        (Self::CANCEL, "Cancel"),
        (Self::TIMEOUT, "Timeout"),
        (Self::HALTED, "Halted"),
    ];

    /// Raw value as reported by the engine, unknown bits dropped.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::MASK.0)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Collapse simultaneous flags into the status recorded for the query.
    ///
    /// Failure dominates, then Cancel; anything else is kept as reported.
    #[must_use]
    pub const fn resolve_status(self) -> Self {
        if self.contains(Self::FAILURE) {
            Self::FAILURE
        } else if self.contains(Self::CANCEL) {
            Self::CANCEL
        } else {
            self
        }
    }
}

impl BitOr for ExecutionResult {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ExecutionResult {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<ExecutionResult> for i64 {
    fn from(value: ExecutionResult) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
