//! Request handlers. Bodies arrive as raw bytes and are decoded with the lock
//! already held, so the critical section spans decode → encode.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use comsoc_io::wire::{
    decode, endpoints, NewBallotRequest, NewBallotResponse, ResultRequest, VoteRequest,
};
use comsoc_store::{BallotError, Clock};
use tracing::{debug, warn};

use crate::status::status_for;
use crate::AppState;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(endpoints::NEW_BALLOT).route(web::post().to(new_ballot)))
        .service(web::resource(endpoints::VOTE).route(web::post().to(vote)))
        .service(web::resource(endpoints::RESULT).route(web::post().to(result)));
}

fn reject(state: &AppState, endpoint: &str, err: BallotError) -> HttpResponse {
    let status = status_for(err.kind(), state.still_open);
    if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
        warn!(endpoint, kind = ?err.kind(), error = %err, "request failed");
    } else {
        debug!(endpoint, kind = ?err.kind(), error = %err, "request rejected");
    }
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(format!("error {endpoint}: {err}"))
}

pub async fn new_ballot(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let mut store = state.store.lock();
    let created = decode::<NewBallotRequest>(&body)
        .map_err(BallotError::from)
        .and_then(|req| store.create_ballot(&req));
    match created {
        Ok(ballot_id) => HttpResponse::Created().json(NewBallotResponse { ballot_id }),
        Err(e) => reject(&state, endpoints::NEW_BALLOT, e),
    }
}

/// Success echoes the accepted vote.
pub async fn vote(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let mut store = state.store.lock();
    let now = state.clock.now();
    let accepted = decode::<VoteRequest>(&body)
        .map_err(BallotError::from)
        .and_then(|req| store.cast_vote(&req, now).map(|()| req));
    match accepted {
        Ok(req) => HttpResponse::Ok().json(req),
        Err(e) => reject(&state, endpoints::VOTE, e),
    }
}

pub async fn result(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let store = state.store.lock();
    let now = state.clock.now();
    let outcome = decode::<ResultRequest>(&body)
        .map_err(BallotError::from)
        .and_then(|req| store.compute_result(&req.ballot_id, now));
    match outcome {
        Ok(outcome) => HttpResponse::Ok().json(outcome.to_response()),
        Err(e) => reject(&state, endpoints::RESULT, e),
    }
}
