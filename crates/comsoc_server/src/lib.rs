//! comsoc_server — HTTP surface of the ballot engine.
//!
//! Three `POST` endpoints (`/new_ballot`, `/vote`, `/result`) exchanging JSON
//! bodies. Other methods on those paths answer 405. Every handler runs its
//! whole decode → validate → mutate/compute → encode sequence under the
//! store's single lock.

#![forbid(unsafe_code)]

pub mod config;
pub mod handlers;
pub mod status;

use std::io;
use std::net::TcpListener;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use actix_web::dev::{Server, ServerHandle};
use actix_web::{rt, web, App, HttpServer};
use comsoc_store::{Clock, SharedStore, SystemClock};
use tracing::info;

pub use config::{ServerConfig, StillOpenStatus};
pub use handlers::routes;

/// Shared by every worker.
pub struct AppState {
    pub store: SharedStore,
    pub clock: Arc<dyn Clock>,
    pub still_open: StillOpenStatus,
}

impl AppState {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>, still_open: StillOpenStatus) -> Self {
        Self { store, clock, still_open }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(SharedStore::new(), Arc::new(SystemClock), config.still_open_status)
    }
}

/// Build the server on an already bound listener. Must be called inside an
/// actix system.
pub fn serve(listener: TcpListener, state: web::Data<AppState>, workers: Option<usize>) -> io::Result<Server> {
    let mut http = HttpServer::new(move || App::new().app_data(state.clone()).configure(routes));
    if let Some(n) = workers {
        http = http.workers(n);
    }
    Ok(http.listen(listener)?.run())
}

/// Bind and serve until shut down (Ctrl-C).
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(config.addr())?;
    info!(addr = %listener.local_addr()?, still_open = %config.still_open_status, "listening");
    let state = web::Data::new(AppState::from_config(&config));
    serve(listener, state, config.workers)?.await
}

/// Server running on its own thread, for launchers that drive it from
/// blocking code.
pub struct BackgroundServer {
    addr: std::net::SocketAddr,
    handle: ServerHandle,
    thread: Option<JoinHandle<io::Result<()>>>,
}

impl BackgroundServer {
    /// Bind on the calling thread (so bind errors surface here), then serve on
    /// a new thread. The listener accepts connections as soon as this returns.
    pub fn spawn(config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.addr())?;
        let addr = listener.local_addr()?;
        let state = web::Data::new(AppState::from_config(config));
        let workers = config.workers;
        let (tx, rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("comsoc-server".into())
            .spawn(move || {
                rt::System::new().block_on(async move {
                    let server = serve(listener, state, workers)?;
                    let _ = tx.send(server.handle());
                    server.await
                })
            })?;

        let handle = rx.recv().map_err(|_| {
            io::Error::new(io::ErrorKind::Other, "server thread exited before starting")
        })?;
        info!(%addr, "background server started");
        Ok(Self { addr, handle, thread: Some(thread) })
    }

    pub fn addr(&self) -> std::net::SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Graceful stop; waits for the server thread.
    pub fn stop(mut self) -> io::Result<()> {
        rt::System::new().block_on(self.handle.stop(true));
        match self.thread.take().map(JoinHandle::join) {
            Some(Ok(res)) => res,
            Some(Err(_)) => Err(io::Error::new(io::ErrorKind::Other, "server thread panicked")),
            None => Ok(()),
        }
    }
}
