pub mod bonus;
pub mod dispatch;
pub mod merge;
pub mod notify;
pub mod reconcile;
pub mod respondents;
