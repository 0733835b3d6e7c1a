//! Core data model for tradepost.
//!
//! Draft field values, wizard steps, post records and account types.

mod account;
mod field;
mod post;
mod step;

pub use account::NewUser;
pub use field::{FieldValue, Fields};
pub use post::{Condition, PostKind, PostRecord, PostsStatus, StoredPost};
pub use step::Step;
