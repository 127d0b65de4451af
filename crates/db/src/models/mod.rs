pub mod department;
pub mod employee;
pub mod sync_log;
pub mod visit;
