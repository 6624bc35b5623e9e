//! comsoc_store — authoritative in-memory registry of ballots and votes.
//!
//! Lifecycle per ballot: **Open** while `now < deadline`, **Closed** after.
//! Closure is derived from the clock on every request, never stored.
//!
//! - `validate`: creation and vote checks, all run before any mutation
//! - `dispatch`: rule → scoring engine + tie-break, zero-vote fallback
//! - `store`: `BallotStore` (create / vote / result) and `SharedStore`,
//!   the single process-wide lock every operation runs under
//! - `clock`: wall clock for serving, manual clock for tests and local runs

pub mod ballot;
pub mod clock;
pub mod dispatch;
pub mod error;
pub mod store;
pub mod validate;

pub use ballot::Ballot;
pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatch::{compute_outcome, Outcome};
pub use error::{BallotError, ErrorKind};
pub use store::{BallotStore, SharedStore};
