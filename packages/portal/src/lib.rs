//! MediChain portal core
//!
//! Session persistence, route guarding and portal flows for the two-role
//! MediChain portal. The pure HTTP surface lives in `medichain_client`; this
//! crate owns everything stateful on the client side:
//!
//! - [`storage`]: pluggable string key/value backends (memory, file)
//! - [`session`]: the role-scoped session store over a backend
//! - [`guard`]: the pre-view authorization decision
//! - [`flows`]: login/signup/refresh plus the authenticated dashboard
//!   operations, with single-retry 401 recovery
//!
//! # Example
//!
//! ```rust,ignore
//! use medichain_client::{ApiClient, Role};
//! use portal::{FileBackend, Portal, PortalConfig, SessionStore};
//!
//! let config = PortalConfig::from_env();
//! let portal = Portal::new(
//!     ApiClient::new().with_base_url(config.api_url.clone()),
//!     SessionStore::new(FileBackend::open(&config.session_dir)?),
//! );
//!
//! let session = portal.login(Role::Patient, "pat@example.com", "secret1").await?;
//! let appointments = portal.appointments(Role::Patient).await?;
//! ```

pub mod config;
pub mod error;
pub mod flows;
pub mod guard;
pub mod session;
pub mod storage;
pub mod testing;

pub use config::PortalConfig;
pub use error::{PortalError, Result, StorageError};
pub use flows::Portal;
pub use guard::{login_route, AccessDecision, DenyReason};
pub use session::{Session, SessionState, SessionStore};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
