use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Dashboard {
    pub pending_members: i64,
    pub members: i64,
    pub admins: i64,
    pub upcoming_events: i64,
    pub open_tasks: i64,
    pub done_tasks: i64,
}
