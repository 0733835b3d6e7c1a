//! External collaborators consumed by the post workflow.
//!
//! The wizard and registration flow only see these traits. [`Storage`]
//! provides local implementations so the whole flow runs offline.
//!
//! [`Storage`]: crate::storage::Storage

use crate::{
    model::{NewUser, PostRecord, PostsStatus},
    storage::StorageError,
};

/// Errors reported by an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no posts remaining on the current plan")]
    QuotaExhausted,

    #[error("an account already exists for {0}")]
    EmailTaken(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reports how many posts the user may still create.
pub trait QuotaService {
    fn check_posts_status(&self) -> Result<PostsStatus, ServiceError>;
}

/// Creates posts. Consuming quota is this collaborator's job.
pub trait PostService {
    fn create_post(&self, record: &PostRecord) -> Result<(), ServiceError>;
}

/// Creates user accounts.
pub trait UserDirectory {
    fn create_user(&self, user: &NewUser) -> Result<(), ServiceError>;
}
