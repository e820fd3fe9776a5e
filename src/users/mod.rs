//! User resource.
//!
//! # Data Flow
//! ```text
//! JSON body → model.rs (UserPayload → validated NewUser)
//!     → handlers.rs (log, call store, map errors)
//!     → store.rs (mutex-guarded map + ID counter)
//!     → User → JSON response
//! ```

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{NewUser, User, UserId, UserPayload};
pub use store::{StoreError, UserStore};
