use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeoTrackError {
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("No target has been spawned yet")]
    NoActiveTarget,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Target not found in the orbit catalog: {0}")]
    TargetNotFound(String),

    #[error("HTTP status {status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Event loop channel closed")]
    ChannelClosed,
}

impl NeoTrackError {
    /// Errors caused by the caller's input, reported synchronously and never retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NeoTrackError::InvalidElements(_)
                | NeoTrackError::NoActiveTarget
                | NeoTrackError::InvalidConfig(_)
        )
    }

    /// Errors raised while talking to the orbital backend.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            NeoTrackError::HttpStatus { .. }
                | NeoTrackError::ReqwestError(_)
                | NeoTrackError::MalformedResponse(_)
        )
    }
}

impl PartialEq for NeoTrackError {
    fn eq(&self, other: &Self) -> bool {
        use NeoTrackError::*;
        match (self, other) {
            (InvalidElements(a), InvalidElements(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (InvalidUrl(a), InvalidUrl(b)) => a == b,
            (TargetNotFound(a), TargetNotFound(b)) => a == b,
            (
                HttpStatus {
                    status: s1,
                    url: u1,
                },
                HttpStatus {
                    status: s2,
                    url: u2,
                },
            ) => s1 == s2 && u1 == u2,
            (MalformedResponse(a), MalformedResponse(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,

            // reqwest errors carry no comparable payload: same variant is enough
            (ReqwestError(_), ReqwestError(_)) => true,

            (NoActiveTarget, NoActiveTarget) => true,
            (ChannelClosed, ChannelClosed) => true,

            _ => false,
        }
    }
}
