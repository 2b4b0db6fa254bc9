#![cfg_attr(not(test), forbid(unsafe_code))]

//! Client core for the Expensa backend.
//!
//! [`ApiClient`] attaches the bearer and anti-forgery tokens to every request,
//! [`SessionStore`] owns who is signed in, and [`services`] exposes one typed
//! command per backend operation. Everything here is single-threaded: handles
//! are `Rc`-based and meant to live on one UI thread or one CLI task.

pub mod api;
pub mod claims;
pub mod interest;
pub mod record;
pub mod services;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError, ApiRequest, ApiResponse, ResponseKind};
pub use claims::{Claims, ClaimsError};
pub use interest::Interest;
pub use record::PersistedSession;
pub use session::{
    LogoutReason, ProfileState, Session, SessionEvent, SessionStore, SubscriptionId, View,
};
pub use storage::{MemoryStorage, SessionStorage, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
