use parking_lot::Mutex;
use tokio::sync::watch;
use crate::models::server::ServerStatus;
use crate::utils::FetchError;

/// What the status view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Data(ServerStatus),
    Error(String),
}

/// Result of offering a fetch result to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Yes,
    Stale,
    Disposed,
}

struct Book {
    issued: u64,
    applied: u64,
    disposed: bool,
    last_data: Option<ServerStatus>,
}

/// Single owner of the view state. Results carry the sequence number they were
/// issued under and only move the state forward.
pub struct StatusStore {
    book: Mutex<Book>,
    state: watch::Sender<ViewState>,
}

impl StatusStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            book: Mutex::new(Book { issued: 0, applied: 0, disposed: false, last_data: None }),
            state,
        }
    }

    pub fn begin_fetch(&self) -> u64 {
        let mut book = self.book.lock();
        book.issued += 1;
        book.issued
    }

    pub fn apply(&self, seq: u64, result: Result<ServerStatus, FetchError>) -> Applied {
        let mut book = self.book.lock();
        if book.disposed {
            return Applied::Disposed;
        }
        if seq <= book.applied {
            return Applied::Stale;
        }
        book.applied = seq;

        let next = match result {
            Ok(status) => {
                book.last_data = Some(status.clone());
                ViewState::Data(status)
            }
            // last_data is kept but not shown
            Err(e) => ViewState::Error(e.to_string()),
        };
        self.state.send_replace(next);
        Applied::Yes
    }

    pub fn dispose(&self) {
        self.book.lock().disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.book.lock().disposed
    }

    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn last_data(&self) -> Option<ServerStatus> {
        self.book.lock().last_data.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
