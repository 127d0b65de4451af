//! Repository for the `departments` table.

use sqlx::PgPool;

use crate::models::department::Department;

/// Column list for `departments` queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides persistence operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Fetch a department by name, creating it if absent.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the row on both
    /// paths, so concurrent callers converge on the same department.
    pub async fn find_or_create(pool: &PgPool, name: &str) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List all departments ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY name");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }
}
