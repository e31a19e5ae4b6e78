//! Pending submission store implementation

use crate::error::Result;
use crate::models::{ContentSignature, FormPayload, PendingSubmission, SubmissionId};
use libsql::{params, Connection};

use super::Database;

/// Trait for pending submission storage (async)
///
/// Records are only ever inserted or deleted; there is no update path.
#[allow(async_fn_in_trait)]
pub trait SubmissionStore {
    /// Find the id of a stored record with the given signature
    async fn find_by_signature(&self, signature: &ContentSignature)
        -> Result<Option<SubmissionId>>;

    /// Insert a record and return its store-assigned id
    async fn insert(
        &self,
        payload: &FormPayload,
        signature: &ContentSignature,
        captured_at: i64,
    ) -> Result<SubmissionId>;

    /// List every stored record
    async fn list_all(&self) -> Result<Vec<PendingSubmission>>;

    /// Delete a record; deleting an absent id is not an error
    async fn remove(&self, id: SubmissionId) -> Result<()>;

    /// Number of stored records
    async fn count(&self) -> Result<usize>;

    /// Delete every record, returning how many were removed
    async fn clear(&self) -> Result<usize>;
}

/// libSQL implementation of `SubmissionStore`
pub struct LibSqlSubmissionStore {
    db: Database,
}

impl LibSqlSubmissionStore {
    /// Create a store over an opened database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a store backed by a database file
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path).await?))
    }

    /// Open an in-memory store (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    const fn conn(&self) -> &Connection {
        self.db.connection()
    }

    fn parse_row(row: &libsql::Row) -> Result<PendingSubmission> {
        let payload: String = row.get(2)?;
        Ok(PendingSubmission {
            id: SubmissionId::new(row.get(0)?),
            signature: ContentSignature::from_stored(row.get(1)?),
            payload: serde_json::from_str(&payload)?,
            captured_at: row.get(3)?,
        })
    }
}

impl SubmissionStore for LibSqlSubmissionStore {
    async fn find_by_signature(
        &self,
        signature: &ContentSignature,
    ) -> Result<Option<SubmissionId>> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id FROM pending_submissions WHERE signature = ? ORDER BY id LIMIT 1",
                [signature.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(SubmissionId::new(row.get(0)?))),
            None => Ok(None),
        }
    }

    async fn insert(
        &self,
        payload: &FormPayload,
        signature: &ContentSignature,
        captured_at: i64,
    ) -> Result<SubmissionId> {
        let payload_json = serde_json::to_string(payload)?;

        self.conn()
            .execute(
                "INSERT INTO pending_submissions (signature, payload, captured_at) VALUES (?, ?, ?)",
                params![signature.as_str(), payload_json, captured_at],
            )
            .await?;

        let id = SubmissionId::new(self.conn().last_insert_rowid());
        tracing::debug!("Stored pending submission {id}");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<PendingSubmission>> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, signature, payload, captured_at FROM pending_submissions ORDER BY id",
                (),
            )
            .await?;

        let mut submissions = Vec::new();
        while let Some(row) = rows.next().await? {
            match Self::parse_row(&row) {
                Ok(submission) => submissions.push(submission),
                // Unreadable rows stay in place; they are skipped, not deleted
                Err(error) => tracing::warn!("Skipping unreadable pending submission: {error}"),
            }
        }

        Ok(submissions)
    }

    async fn remove(&self, id: SubmissionId) -> Result<()> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM pending_submissions WHERE id = ?",
                [id.get()],
            )
            .await?;

        if removed > 0 {
            tracing::debug!("Removed pending submission {id}");
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM pending_submissions", ())
            .await?;

        let count: i64 = if let Some(row) = rows.next().await? {
            row.get(0)?
        } else {
            0
        };

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn clear(&self) -> Result<usize> {
        let removed = self
            .conn()
            .execute("DELETE FROM pending_submissions", ())
            .await?;
        Ok(usize::try_from(removed).unwrap_or(usize::MAX))
    }
}
