/// Primary keys are UUIDs. User ids are issued by the identity provider,
/// every other id is generated by the database.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
