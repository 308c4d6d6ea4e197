//! SeaORM-backed [`UserStore`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use tracing::debug;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::repos::users::{User, UserFilter, UserStore};

#[derive(Debug, Clone)]
pub struct SeaUserStore {
    db: DatabaseConnection,
}

impl SeaUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn select(filter: UserFilter) -> Select<users::Entity> {
    let query = users::Entity::find();
    match filter {
        UserFilter::Id(id) => query.filter(users::Column::Id.eq(id)),
        UserFilter::Username(username) => query.filter(users::Column::Username.eq(username)),
        UserFilter::Email(email) => query.filter(users::Column::Email.eq(email)),
        UserFilter::All => query,
    }
}

#[async_trait]
impl UserStore for SeaUserStore {
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, DomainError> {
        let found = select(filter).one(&self.db).await.map_err(map_db_err)?;
        Ok(found.map(User::from))
    }

    async fn insert_one(&self, user: &User) -> Result<(), DomainError> {
        let active = users::ActiveModel {
            id: Set(user.id.clone()),
            username: Set(user.username.clone()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        active.insert(&self.db).await.map_err(map_db_err)?;
        debug!(user_id = %user.id, "user inserted");
        Ok(())
    }

    async fn find_many(&self, filter: UserFilter) -> Result<Vec<User>, DomainError> {
        let rows = select(filter)
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let backend = self.db.get_database_backend();
        self.db
            .execute(sea_orm::Statement::from_string(backend, "SELECT 1"))
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            email: model.email,
            password_hash: model.password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
