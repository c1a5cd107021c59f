//! Floor facilities: zones, machines and teams

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical area of the production floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub zone_id: i32,
    pub zone_no: String,
    pub zone_description: Option<String>,
}

/// A press, cutter or other machine assigned to transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: i32,
    pub machine_name: String,
    pub status: bool,
}

/// An operator team; members are referenced by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: i32,
    pub team_name: String,
    pub user_ids: Vec<Uuid>,
    pub status: bool,
}
