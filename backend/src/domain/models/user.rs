/// Account owner. The credential is opaque to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub credential: String,
    pub created_at: String,
}
