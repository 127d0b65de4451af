//! Repository for the `employees` table.

use frontdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{default_avatar_url, CreateEmployee, Employee, SyncedFields};

/// Column list for `employees` queries.
const COLUMNS: &str = "id, name, email, slack_user_id, department_id, is_active, \
                       visible_to_visitors, external_id, avatar_url, created_at, updated_at";

/// Provides persistence operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Fetch an employee by id.
    pub async fn find(pool: &PgPool, employee_id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch an employee by its external directory id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE external_id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Create an employee.
    ///
    /// Email is normalized to lowercase. `visible_to_visitors` is not a
    /// parameter on purpose: new employees stay hidden until an
    /// operator opts them in.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let email = input.email.as_deref().map(|e| e.trim().to_lowercase());
        let query = format!(
            "INSERT INTO employees \
             (name, email, slack_user_id, department_id, is_active, external_id, avatar_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.name)
            .bind(email)
            .bind(&input.slack_user_id)
            .bind(input.department_id)
            .bind(input.is_active)
            .bind(&input.external_id)
            .bind(default_avatar_url(&input.name))
            .fetch_one(pool)
            .await
    }

    /// Overwrite the directory-sourced fields of an employee.
    ///
    /// `visible_to_visitors` and `slack_user_id` are never part of this
    /// update; they are operator-owned once set.
    pub async fn update_synced_fields(
        pool: &PgPool,
        employee_id: DbId,
        fields: &SyncedFields,
    ) -> Result<Employee, sqlx::Error> {
        let email = fields.email.as_deref().map(|e| e.trim().to_lowercase());
        let query = format!(
            "UPDATE employees \
             SET name = $2, email = $3, department_id = $4, is_active = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(employee_id)
            .bind(&fields.name)
            .bind(email)
            .bind(fields.department_id)
            .bind(fields.is_active)
            .fetch_one(pool)
            .await
    }

    /// Deactivate every active, directory-synced employee whose external
    /// id is not in `seen_external_ids`, returning the affected rows.
    ///
    /// Employees without an external id (manually managed) are never
    /// touched.
    pub async fn deactivate_missing(
        pool: &PgPool,
        seen_external_ids: &[String],
    ) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees \
             SET is_active = FALSE, updated_at = NOW() \
             WHERE external_id IS NOT NULL \
               AND is_active = TRUE \
               AND external_id <> ALL($1) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(seen_external_ids)
            .fetch_all(pool)
            .await
    }

    /// List active employees visible to visitors, ordered by name.
    pub async fn list_visible(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employees \
             WHERE is_active = TRUE AND visible_to_visitors = TRUE \
             ORDER BY name"
        );
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }
}
