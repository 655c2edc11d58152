use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use time::OffsetDateTime;
use tower_sessions::{session::Id, session::Record, session_store, ExpiredDeletion, SessionStore};

use crate::entity::session::{self, ActiveModel as SessionActiveModel, Entity as SessionEntity};

/// A `tower-sessions` store that keeps session records in the application
/// database through Sea-ORM.
///
/// Works on every backend the crate is built for (PostgreSQL or SQLite), so
/// the login identity lives next to the vote log. Records are serialized with
/// MessagePack.
///
/// # Error Handling
///
/// - Database errors → `session_store::Error::Backend`
/// - Serialization errors → `session_store::Error::Encode`
/// - Deserialization errors → `session_store::Error::Decode`
#[derive(Debug, Clone)]
pub struct DbSessionStore {
    conn: DatabaseConnection,
}

impl DbSessionStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for DbSessionStore {
    /// Inserts a new record, regenerating the id until it does not collide
    /// with an existing row.
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let txn = self.conn.begin().await.map_err(backend)?;

        while SessionEntity::find_by_id(record.id.to_string())
            .one(&txn)
            .await
            .map_err(backend)?
            .is_some()
        {
            record.id = Id::default();
        }

        let model = SessionActiveModel {
            id: Set(record.id.to_string()),
            data: Set(encode(record)?),
            expiry_date: Set(to_db_time(record.expiry_date)?),
        };
        model.insert(&txn).await.map_err(backend)?;

        txn.commit().await.map_err(backend)?;
        Ok(())
    }

    /// Upserts the record.
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let data = encode(record)?;
        let expiry_date = to_db_time(record.expiry_date)?;

        match SessionEntity::find_by_id(record.id.to_string())
            .one(&self.conn)
            .await
            .map_err(backend)?
        {
            Some(existing) => {
                let mut active_model = existing.into_active_model();
                active_model.data = Set(data);
                active_model.expiry_date = Set(expiry_date);
                active_model.update(&self.conn).await.map_err(backend)?;
            }
            None => {
                let model = SessionActiveModel {
                    id: Set(record.id.to_string()),
                    data: Set(data),
                    expiry_date: Set(expiry_date),
                };
                model.insert(&self.conn).await.map_err(backend)?;
            }
        }

        Ok(())
    }

    /// Loads a record, treating expired rows as absent.
    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = to_db_time(OffsetDateTime::now_utc())?;

        let session = SessionEntity::find_by_id(session_id.to_string())
            .filter(session::Column::ExpiryDate.gt(now))
            .one(&self.conn)
            .await
            .map_err(backend)?;

        session
            .map(|model| {
                rmp_serde::from_slice(&model.data)
                    .map_err(|e| session_store::Error::Decode(e.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        SessionEntity::delete_by_id(session_id.to_string())
            .exec(&self.conn)
            .await
            .map_err(backend)?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for DbSessionStore {
    /// Bulk-deletes every session whose expiry date has passed. Run by the
    /// `purge-sessions` command.
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = to_db_time(OffsetDateTime::now_utc())?;

        let result = SessionEntity::delete_many()
            .filter(session::Column::ExpiryDate.lt(now))
            .exec(&self.conn)
            .await
            .map_err(backend)?;
        tracing::info!(purged = result.rows_affected, "deleted expired sessions");

        Ok(())
    }
}

fn backend(e: DbErr) -> session_store::Error {
    session_store::Error::Backend(e.to_string())
}

fn encode(record: &Record) -> session_store::Result<Vec<u8>> {
    rmp_serde::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))
}

// Sea-ORM timestamps are chrono-based; tower-sessions speaks `time`.
fn to_db_time(time: OffsetDateTime) -> session_store::Result<DateTimeWithTimeZone> {
    chrono::DateTime::from_timestamp(time.unix_timestamp(), time.nanosecond())
        .map(Into::into)
        .ok_or_else(|| session_store::Error::Encode(format!("expiry {time} is out of range")))
}
