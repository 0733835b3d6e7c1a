//! Local post service: created posts, newest last.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    model::{PostRecord, StoredPost},
    services::{PostService, ServiceError},
};

use super::{Result, Storage, StorageError, quota};

impl PostService for Storage {
    /// Stores the post and spends one post from the quota, atomically.
    fn create_post(&self, record: &PostRecord) -> core::result::Result<(), ServiceError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(StorageError::from)?;

        quota::consume_post(&tx)?;

        let post = StoredPost {
            id: Uuid::new_v4(),
            record: record.clone(),
            created_at: Timestamp::now(),
        };
        let json = serde_json::to_string(&post.record).map_err(StorageError::from)?;
        tx.execute(
            "INSERT INTO posts (id, kind, record, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                post.id.to_string(),
                post.record.kind.as_str(),
                json,
                post.created_at.to_string(),
            ],
        )
        .map_err(StorageError::from)?;

        tx.commit().map_err(StorageError::from)?;
        tracing::info!(id = %post.id, kind = %post.record.kind, "post created");
        Ok(())
    }
}

impl Storage {
    /// Lists all created posts, oldest first.
    pub fn list_posts(&self) -> Result<Vec<StoredPost>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, record, created_at FROM posts ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut posts = Vec::new();
        for row in rows {
            let (id, record, created_at) = row?;
            posts.push(StoredPost {
                id: id
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("invalid post id: {e}")))?,
                record: serde_json::from_str(&record)
                    .map_err(|e| StorageError::Corrupt(format!("post {id}: {e}")))?,
                created_at: created_at
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?,
            });
        }
        Ok(posts)
    }
}
