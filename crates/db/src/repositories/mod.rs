pub mod department_repo;
pub mod employee_repo;
pub mod sync_log_repo;
pub mod visit_repo;

pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use sync_log_repo::SyncLogRepo;
pub use visit_repo::{TransitionOutcome, VisitRepo};
