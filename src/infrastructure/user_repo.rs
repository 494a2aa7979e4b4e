use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn insert(&self, input: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;
        // The unique index on email backs up the service-level duplicate
        // check; a violation surfaces as a conflict either way.
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow::from_input(Uuid::new_v4(), input))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;
        Ok(User::from(row))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(User::from))
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::created_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let affected = diesel::delete(users::table.find(id)).execute(&mut conn)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_support::setup_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "secret1".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_email_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        let created = repo.insert(new_user("jean@example.com")).expect("insert");
        let found = repo
            .find_by_email("jean@example.com")
            .expect("find")
            .expect("present");

        assert_eq!(found.id, created.id);
        assert_eq!(found.password, "secret1");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        repo.insert(new_user("jean@example.com")).expect("first insert");
        assert!(matches!(
            repo.insert(new_user("jean@example.com")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);
        assert!(repo.find_by_email("nobody@example.com").expect("find").is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);
        let created = repo.insert(new_user("jean@example.com")).expect("insert");

        repo.delete(created.id).expect("delete");

        assert!(repo.find_by_email("jean@example.com").expect("find").is_none());
        assert!(matches!(repo.delete(created.id), Err(DomainError::NotFound)));
    }
}
