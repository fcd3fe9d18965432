//! User repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use ss_core::traits::Id;
use ss_models::user::normalize_email;
use ss_models::{User, UserType};

use crate::repository::{ProjectRemoval, RepositoryError, RepositoryResult, UserStore};

const USER_COLUMNS: &str = "id, email, first_name, last_name, date_of_birth, phone_number, \
     country, user_type, is_active, is_staff, is_superuser, password_hash, date_joined, updated_at";

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub user_type: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub password_hash: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type: UserType = row.user_type.parse().map_err(RepositoryError::Decode)?;
        Ok(User {
            id: Some(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            phone_number: row.phone_number,
            country: row.country,
            user_type,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            password_hash: row.password_hash,
            date_joined: Some(row.date_joined),
            updated_at: Some(row.updated_at),
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> RepositoryResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

/// Insert a user through any executor, so seeding can share a transaction
pub async fn insert_user<'e, E: PgExecutor<'e>>(executor: E, user: &User) -> RepositoryResult<User> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (
            email, first_name, last_name, date_of_birth, phone_number, country,
            user_type, is_active, is_staff, is_superuser, password_hash, date_joined, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()
        )
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.date_of_birth)
    .bind(&user.phone_number)
    .bind(&user.country)
    .bind(user.user_type.as_str())
    .bind(user.is_active)
    .bind(user.is_staff)
    .bind(user.is_superuser)
    .bind(&user.password_hash)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

pub async fn existing_emails<'e, E: PgExecutor<'e>>(executor: E) -> RepositoryResult<Vec<String>> {
    let emails = sqlx::query_scalar::<_, String>("SELECT email FROM users")
        .fetch_all(executor)
        .await?;
    Ok(emails)
}

/// Users of the given type, ordered by id
pub async fn ids_by_type<'e, E: PgExecutor<'e>>(
    executor: E,
    user_type: UserType,
) -> RepositoryResult<Vec<Id>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM users WHERE user_type = $1 AND is_active ORDER BY id",
    )
    .bind(user_type.as_str())
    .fetch_all(executor)
    .await?;
    Ok(ids)
}

pub async fn superuser_exists<'e, E: PgExecutor<'e>>(executor: E) -> RepositoryResult<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE is_superuser)")
            .fetch_one(executor)
            .await?;
    Ok(exists)
}

pub async fn id_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> RepositoryResult<Option<Id>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
        .bind(normalize_email(email))
        .fetch_optional(executor)
        .await?;
    Ok(id)
}

/// Writes every column of a saved user; a missing password hash keeps the stored one
pub async fn update_user<'e, E: PgExecutor<'e>>(executor: E, user: &User) -> RepositoryResult<User> {
    let id = user
        .id
        .ok_or_else(|| RepositoryError::Conflict("user has not been saved yet".into()))?;

    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users SET
            email = $1,
            first_name = $2,
            last_name = $3,
            date_of_birth = $4,
            phone_number = $5,
            country = $6,
            user_type = $7,
            is_active = $8,
            is_staff = $9,
            is_superuser = $10,
            password_hash = COALESCE($11, password_hash),
            updated_at = NOW()
        WHERE id = $12
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.date_of_birth)
    .bind(&user.phone_number)
    .bind(&user.country)
    .bind(user.user_type.as_str())
    .bind(user.is_active)
    .bind(user.is_staff)
    .bind(user.is_superuser)
    .bind(&user.password_hash)
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepositoryError::not_found("User", id))?;

    row.try_into()
}

pub async fn set_user_type<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Id,
    user_type: UserType,
) -> RepositoryResult<()> {
    let result = sqlx::query("UPDATE users SET user_type = $1, updated_at = NOW() WHERE id = $2")
        .bind(user_type.as_str())
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::not_found("User", id));
    }
    Ok(())
}

/// User repository implementation
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY email ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }

    async fn find_many(&self, ids: &[Id]) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY email ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        into_users(rows)
    }

    async fn email_taken(&self, email: &str, exclude: Option<Id>) -> RepositoryResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert(&self, user: &User) -> RepositoryResult<User> {
        insert_user(&self.pool, user).await
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        update_user(&self.pool, user).await
    }

    async fn update_and_remove(&self, user: &User, removal: ProjectRemoval) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;
        let updated = update_user(&mut *tx, user).await?;
        let id = user.id.unwrap_or_default();

        sqlx::query("DELETE FROM project_managers WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if removal == ProjectRemoval::AllProjects {
            sqlx::query("DELETE FROM project_members WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_type: &str) -> UserRow {
        UserRow {
            id: 3,
            email: "anna@codepoets.it".into(),
            first_name: "Anna".into(),
            last_name: "Nowak".into(),
            date_of_birth: None,
            phone_number: None,
            country: None,
            user_type: user_type.into(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            password_hash: Some("hash".into()),
            date_joined: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let user = User::try_from(row("MANAGER")).unwrap();
        assert_eq!(user.id, Some(3));
        assert_eq!(user.user_type, UserType::Manager);
        assert_eq!(user.password_hash.as_deref(), Some("hash"));
    }

    #[test]
    fn test_unknown_user_type_is_a_decode_error() {
        assert!(matches!(
            User::try_from(row("GUEST")),
            Err(RepositoryError::Decode(_))
        ));
    }
}
