use serde::{Deserialize, Serialize};

/// A row from the `operators` table. Exactly one exists per authenticated
/// identity (email); creation happens through `services::provision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_approved: bool,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}
