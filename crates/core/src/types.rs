/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User ids are the UUIDs minted by the hosted auth service.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
