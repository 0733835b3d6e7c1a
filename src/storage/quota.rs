//! Quota ledger: remaining free and paid posts.
//!
//! A single row. A missing row reads as zero remaining posts; callers seed it
//! once with the configured free allowance.

use rusqlite::{Connection, OptionalExtension};

use crate::{
    model::PostsStatus,
    services::{QuotaService, ServiceError},
};

use super::{Result, Storage};

impl Storage {
    /// Creates the ledger with `free_posts` if it doesn't exist yet.
    ///
    /// Returns whether the ledger was created.
    pub fn seed_quota(&self, free_posts: u32) -> Result<bool> {
        let rows = self.conn.execute(
            "INSERT OR IGNORE INTO quota (id, free_posts, paid_posts) VALUES (1, ?1, 0)",
            [free_posts],
        )?;
        Ok(rows > 0)
    }

    /// Adds posts to the ledger, creating it if needed.
    ///
    /// Each count saturates at `u32::MAX`.
    pub fn grant_posts(&self, free: u32, paid: u32) -> Result<PostsStatus> {
        self.conn.execute(
            "INSERT INTO quota (id, free_posts, paid_posts) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                 free_posts = MIN(free_posts + excluded.free_posts, ?3),
                 paid_posts = MIN(paid_posts + excluded.paid_posts, ?3)",
            [free, paid, u32::MAX],
        )?;
        read_status(&self.conn)
    }
}

impl QuotaService for Storage {
    fn check_posts_status(&self) -> core::result::Result<PostsStatus, ServiceError> {
        Ok(read_status(&self.conn)?)
    }
}

/// Spends one post: a free one if any remain, otherwise a paid one.
pub(super) fn consume_post(conn: &Connection) -> core::result::Result<(), ServiceError> {
    let status = read_status(conn)?;
    let column = if status.remaining_free_posts > 0 {
        "free_posts"
    } else if status.remaining_paid_posts > 0 {
        "paid_posts"
    } else {
        return Err(ServiceError::QuotaExhausted);
    };
    conn.execute(
        &format!("UPDATE quota SET {column} = {column} - 1 WHERE id = 1"),
        [],
    )
    .map_err(super::StorageError::from)?;
    Ok(())
}

fn read_status(conn: &Connection) -> Result<PostsStatus> {
    let row = conn
        .query_row(
            "SELECT free_posts, paid_posts FROM quota WHERE id = 1",
            [],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
        )
        .optional()?;
    let (free, paid) = row.unwrap_or((0, 0));
    Ok(PostsStatus {
        remaining_free_posts: free,
        remaining_paid_posts: paid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(free: u32, paid: u32) -> PostsStatus {
        PostsStatus {
            remaining_free_posts: free,
            remaining_paid_posts: paid,
        }
    }

    #[test]
    fn unseeded_ledger_reports_nothing_remaining() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(storage.check_posts_status().unwrap(), status(0, 0));
    }

    #[test]
    fn seed_only_applies_once() {
        let storage = Storage::in_memory().unwrap();

        assert!(storage.seed_quota(3).unwrap());
        assert!(!storage.seed_quota(10).unwrap());

        assert_eq!(storage.check_posts_status().unwrap(), status(3, 0));
    }

    #[test]
    fn grant_adds_to_existing_ledger() {
        let storage = Storage::in_memory().unwrap();
        storage.seed_quota(1).unwrap();

        let after = storage.grant_posts(2, 5).unwrap();

        assert_eq!(after, status(3, 5));
    }

    #[test]
    fn grant_saturates_instead_of_overflowing() {
        let storage = Storage::in_memory().unwrap();
        storage.seed_quota(3).unwrap();

        let after = storage.grant_posts(u32::MAX, 0).unwrap();
        assert_eq!(after, status(u32::MAX, 0));

        storage.grant_posts(1, u32::MAX).unwrap();
        storage.grant_posts(0, 7).unwrap();
        assert_eq!(
            storage.check_posts_status().unwrap(),
            status(u32::MAX, u32::MAX)
        );
    }

    #[test]
    fn consume_spends_free_before_paid() {
        let storage = Storage::in_memory().unwrap();
        storage.grant_posts(1, 1).unwrap();

        consume_post(&storage.conn).unwrap();
        assert_eq!(storage.check_posts_status().unwrap(), status(0, 1));

        consume_post(&storage.conn).unwrap();
        assert_eq!(storage.check_posts_status().unwrap(), status(0, 0));

        let err = consume_post(&storage.conn).unwrap_err();
        assert!(matches!(err, ServiceError::QuotaExhausted));
    }
}
