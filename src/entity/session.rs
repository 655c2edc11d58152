//! Session entity model for Sea-ORM database interaction.
//!
//! Maps to the `tower_sessions` table, which holds the login identity of each
//! browser session.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a persisted browser session.
///
/// # Database Schema
///
/// | Column      | Type               | Description                         |
/// |-------------|--------------------|-------------------------------------|
/// | id          | TEXT (Primary Key) | Session ID from the cookie          |
/// | data        | BYTEA / BLOB       | MessagePack-encoded session record  |
/// | expiry_date | TIMESTAMPTZ        | Session expiration timestamp        |
///
/// The only application key stored in `data` is the display name under
/// [`USERNAME_KEY`](crate::identity::USERNAME_KEY).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tower_sessions")]
pub struct Model {
    /// The session identifier, as rendered by `tower_sessions::session::Id`.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// The serialized `tower_sessions::session::Record`.
    pub data: Vec<u8>,

    /// Sessions past this instant are treated as absent and may be purged.
    pub expiry_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
