//! In-memory adapters for tests and development wiring.

mod session_repository;
mod user_store;

pub use session_repository::InMemorySessionRepository;
pub use user_store::InMemoryUserStore;
