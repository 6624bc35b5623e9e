//! Error kind → HTTP status.

use actix_web::http::StatusCode;
use comsoc_store::ErrorKind;

use crate::config::StillOpenStatus;

impl StillOpenStatus {
    pub fn status(self) -> StatusCode {
        match self {
            StillOpenStatus::TooEarly => {
                StatusCode::from_u16(425).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
            }
            StillOpenStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub fn status_for(kind: ErrorKind, still_open: StillOpenStatus) -> StatusCode {
    match kind {
        ErrorKind::BadDeadline
        | ErrorKind::BadAltCount
        | ErrorKind::BadTieBreak
        | ErrorKind::MalformedPreference
        | ErrorKind::MissingOrInvalidThreshold
        | ErrorKind::Decode => StatusCode::BAD_REQUEST,
        ErrorKind::UnknownRule => StatusCode::NOT_IMPLEMENTED,
        ErrorKind::UnknownBallot => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyVoted => StatusCode::FORBIDDEN,
        ErrorKind::NotEligible => StatusCode::UNAUTHORIZED,
        ErrorKind::BallotClosed => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::BallotStillOpen => still_open.status(),
        ErrorKind::Compute => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
