pub mod employees;
pub mod slack_actions;
pub mod sync;
pub mod visits;
