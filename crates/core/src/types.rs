/// Operator ids are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Leads are keyed by store-assigned UUIDs.
pub type LeadId = uuid::Uuid;

/// Sign-in sessions are keyed by UUIDs, which access tokens carry as `sid`.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
