pub mod session;
pub mod state;
pub mod storage;

pub use session::{NoRedirect, RedirectLocation, SessionManager, TOKEN_EXPIRY_KEY, TOKEN_KEY};
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
