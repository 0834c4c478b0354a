//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it runs on a `DatabaseConnection` or
//! inside a transaction. Token uniqueness comes from the unique index created by
//! the migrations; a violating insert is reported as
//! [`InsertError::DuplicateToken`].
//!
//! Case folding happens here, not in SQL: SQLite's `LOWER` only folds ASCII, so
//! every write also stores `name_lower` and search compares folded text on
//! both sides.

use anyhow::Context;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::contract::model::{NewUser, User};
use crate::domain::repo::{InsertError, UsersRepository};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

const LIKE_ESCAPE: char = '\\';

fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_all_by_token(&self, token: &str) -> anyhow::Result<Vec<User>> {
        // Two rows are enough to tell "unique" from "corrupt".
        let rows = UserEntity::find()
            .filter(Column::TokenIdentifier.eq(token))
            .order_by_asc(Column::CreatedAt)
            .limit(2u64)
            .all(&self.conn)
            .await
            .context("find_all_by_token failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, new_user: NewUser) -> Result<Uuid, InsertError> {
        let m = UserAM {
            id: Set(Uuid::new_v4()),
            name_lower: Set(fold_case(&new_user.name)),
            name: Set(new_user.name),
            token_identifier: Set(new_user.token_identifier),
            email: Set(new_user.email),
            image_url: Set(new_user.image_url),
            created_at: Set(Utc::now()),
        };

        match m.insert(&self.conn).await {
            Ok(model) => Ok(model.id),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(InsertError::DuplicateToken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert failed").into()),
        }
    }

    async fn patch_name(&self, id: Uuid, name: &str) -> anyhow::Result<()> {
        let res = UserEntity::update_many()
            .col_expr(Column::Name, Expr::value(name))
            .col_expr(Column::NameLower, Expr::value(fold_case(name)))
            .filter(Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("patch_name failed")?;

        if res.rows_affected == 0 {
            anyhow::bail!("user {id} not found for rename");
        }
        Ok(())
    }

    async fn search_by_name(&self, text: &str, limit: u64) -> anyhow::Result<Vec<User>> {
        let terms: Vec<String> = text
            .split_whitespace()
            .map(|t| format!("%{}%", escape_like(&fold_case(t))))
            .collect();
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        // Every term must occur in the folded name.
        let mut select = UserEntity::find();
        for pattern in terms {
            select = select.filter(
                Expr::col(Column::NameLower).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }

        let rows = select
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("search_by_name failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
