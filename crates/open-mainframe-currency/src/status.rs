//! IDMS status taxonomy.
//!
//! Navigational verbs report their outcome through a numeric return code
//! rather than by failing.  Not-found and end-of-set conditions are normal
//! control flow: the calling program inspects the code and branches.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
//  Named status codes
// ---------------------------------------------------------------------------

/// The fixed status codes the record-access layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// Successful completion (0000).
    Good,
    /// End of set reached while walking members (0307).
    EndOfList,
    /// Record not found (0326).
    RowNotFound,
    /// End of index reached (1707).
    EndOfIndex,
    /// No index entry matched (1726).
    IndexRowNotFound,
    /// Scratch area does not exist (4303).
    ScratchAreaNotFound,
    /// Scratch record does not exist (4305).
    ScratchRecordNotFound,
    /// Scratch record was replaced (4317).
    ScratchRecordReplaced,
    /// Queue id does not exist (4404).
    QueueIdNotFound,
    /// Queue record does not exist (4405).
    QueueRecordNotFound,
}

impl StatusCode {
    /// All named codes, in numeric order.
    pub const ALL: [StatusCode; 10] = [
        Self::Good,
        Self::EndOfList,
        Self::RowNotFound,
        Self::EndOfIndex,
        Self::IndexRowNotFound,
        Self::ScratchAreaNotFound,
        Self::ScratchRecordNotFound,
        Self::ScratchRecordReplaced,
        Self::QueueIdNotFound,
        Self::QueueRecordNotFound,
    ];

    /// Numeric value of the code.
    pub fn code(self) -> u16 {
        match self {
            Self::Good => 0,
            Self::EndOfList => 307,
            Self::RowNotFound => 326,
            Self::EndOfIndex => 1707,
            Self::IndexRowNotFound => 1726,
            Self::ScratchAreaNotFound => 4303,
            Self::ScratchRecordNotFound => 4305,
            Self::ScratchRecordReplaced => 4317,
            Self::QueueIdNotFound => 4404,
            Self::QueueRecordNotFound => 4405,
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.code())
    }
}

// ---------------------------------------------------------------------------
//  Return code
// ---------------------------------------------------------------------------

/// Lowest code of the generic error range.
pub const ERROR_RANGE_START: u16 = 1;
/// Highest code of the generic error and status ranges.
pub const STATUS_RANGE_END: u16 = 9999;

/// A raw return code as carried between the record-access layer and the
/// calling program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnCode(pub u16);

impl ReturnCode {
    /// The good (0000) return code.
    pub const GOOD: ReturnCode = ReturnCode(0);

    /// Numeric value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Named status for this code, if it is one of the fixed codes.
    pub fn status(self) -> Option<StatusCode> {
        StatusCode::try_from(self.0).ok()
    }

    fn is(self, status: StatusCode) -> bool {
        self.0 == status.code()
    }

    /// `0000`: the call succeeded.
    pub fn is_good(self) -> bool {
        self.is(StatusCode::Good)
    }

    /// `0326`: no row matched.
    pub fn is_row_not_found(self) -> bool {
        self.is(StatusCode::RowNotFound)
    }

    /// `0307`: end of set reached.
    pub fn is_end_of_list(self) -> bool {
        self.is(StatusCode::EndOfList)
    }

    /// `1707`: end of index reached.
    pub fn is_end_of_index(self) -> bool {
        self.is(StatusCode::EndOfIndex)
    }

    /// `1726`: no index entry matched.
    pub fn is_index_row_not_found(self) -> bool {
        self.is(StatusCode::IndexRowNotFound)
    }

    /// `4404`.
    pub fn is_queue_id_not_found(self) -> bool {
        self.is(StatusCode::QueueIdNotFound)
    }

    /// `4405`.
    pub fn is_queue_record_not_found(self) -> bool {
        self.is(StatusCode::QueueRecordNotFound)
    }

    /// `4303`.
    pub fn is_scratch_area_not_found(self) -> bool {
        self.is(StatusCode::ScratchAreaNotFound)
    }

    /// `4305`.
    pub fn is_scratch_record_not_found(self) -> bool {
        self.is(StatusCode::ScratchRecordNotFound)
    }

    /// `4317`: an existing scratch record was overwritten.
    pub fn is_scratch_record_replaced(self) -> bool {
        self.is(StatusCode::ScratchRecordReplaced)
    }

    /// Any member of the not-found family (row, index row, queue, scratch).
    pub fn is_not_found(self) -> bool {
        self.is_row_not_found()
            || self.is_index_row_not_found()
            || self.is_queue_id_not_found()
            || self.is_queue_record_not_found()
            || self.is_scratch_area_not_found()
            || self.is_scratch_record_not_found()
    }

    /// End of a set walk or of an index scan.
    pub fn is_end(self) -> bool {
        self.is_end_of_list() || self.is_end_of_index()
    }

    /// Code lies in the generic error range `[1, 9999]`.
    pub fn is_any_error(self) -> bool {
        (ERROR_RANGE_START..=STATUS_RANGE_END).contains(&self.0)
    }

    /// Code lies in the status range `[0, 9999]`.
    pub fn is_any_status(self) -> bool {
        self.0 <= STATUS_RANGE_END
    }
}

impl From<StatusCode> for ReturnCode {
    fn from(status: StatusCode) -> Self {
        Self(status.code())
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------
