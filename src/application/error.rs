//! Analysis error types
//!
//! Display strings are the exact messages reported in the `error` key.

use thiserror::Error;

use crate::domain::TargetError;
use crate::infrastructure::ParsingError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("URL not specified")]
    EmptyTarget,

    #[error("invalid seller link")]
    InvalidSellerLink { target: String },

    /// No listing could be retrieved for a category
    #[error("could not retrieve data")]
    NoCategoryData { url: String },

    /// The seller's profile page could not be fetched
    #[error("could not retrieve seller data")]
    NoSellerData { user_id: u64 },

    #[error("parser setup failed: {0}")]
    ParserSetup(#[from] ParsingError),
}

impl AnalysisError {
    /// Errors raised on the seller path are reported with `"type": "seller"`
    pub fn is_seller_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidSellerLink { .. } | AnalysisError::NoSellerData { .. }
        )
    }
}

impl From<TargetError> for AnalysisError {
    fn from(error: TargetError) -> Self {
        match error {
            TargetError::Empty => AnalysisError::EmptyTarget,
            TargetError::MalformedSeller { target } => AnalysisError::InvalidSellerLink { target },
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
