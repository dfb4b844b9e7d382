//! Session and credential lifecycle

pub mod guard;
pub mod memory;
pub mod ports;
pub mod session;

pub use guard::SessionGuardedTransport;
pub use memory::MemoryCredentialStore;
pub use ports::CredentialStore;
pub use session::SessionManager;
