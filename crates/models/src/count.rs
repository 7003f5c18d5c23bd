use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, Query, SimpleExpr};
use sea_orm::{ConnectionTrait, QueryOrder, Set, Statement, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "count")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub value: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// All rows, most recently touched first.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, StorageError> {
    let rows = Entity::find()
        .order_by_desc(Column::UpdatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, StorageError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, value: i32) -> Result<Model, StorageError> {
    let am = ActiveModel {
        value: Set(value),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Replace `value`; `None` when no row has this id.
pub async fn update<C: ConnectionTrait>(db: &C, id: i32, value: i32) -> Result<Option<Model>, StorageError> {
    let query = Query::update()
        .table(Entity)
        .value(Column::Value, value)
        .value(Column::UpdatedAt, touched_at())
        .and_where(Column::Id.eq(id))
        .returning_all()
        .to_owned();
    let stmt = db.get_database_backend().build(&query);
    returning_one(db, stmt).await
}

/// Add `delta` in the database, not in application code.
pub async fn increment_or_decrement<C: ConnectionTrait>(
    db: &C,
    id: i32,
    delta: i32,
) -> Result<Option<Model>, StorageError> {
    let query = Query::update()
        .table(Entity)
        .value(Column::Value, Expr::col(Column::Value).add(delta))
        .value(Column::UpdatedAt, touched_at())
        .and_where(Column::Id.eq(id))
        .returning_all()
        .to_owned();
    let stmt = db.get_database_backend().build(&query);
    returning_one(db, stmt).await
}

/// Remove the row and hand back its last state.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, StorageError> {
    let query = Query::delete()
        .from_table(Entity)
        .and_where(Column::Id.eq(id))
        .returning_all()
        .to_owned();
    let stmt = db.get_database_backend().build(&query);
    returning_one(db, stmt).await
}

/// Wipe the table and insert `values` in order, all in one transaction.
pub async fn reset(db: &DatabaseConnection, values: &[i32]) -> Result<Vec<Model>, StorageError> {
    let txn = db.begin().await?;
    let cleared = Entity::delete_many().exec(&txn).await?;
    tracing::debug!(rows = cleared.rows_affected, "cleared count table");
    let mut created = Vec::with_capacity(values.len());
    for &value in values {
        created.push(create(&txn, value).await?);
    }
    txn.commit().await?;
    Ok(created)
}

// Evaluated against the locked row, so a writer that read the clock earlier but
// committed later cannot move updated_at backwards.
fn touched_at() -> SimpleExpr {
    Func::greatest([Expr::col(Column::UpdatedAt).into(), Expr::value(Utc::now())]).into()
}

async fn returning_one<C: ConnectionTrait>(db: &C, stmt: Statement) -> Result<Option<Model>, StorageError> {
    Ok(Entity::find().from_raw_sql(stmt).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::DbBackend;

    #[test]
    fn serializes_camel_case_with_utc_timestamp() {
        let m = Model {
            id: 7,
            value: -3,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["value"], -3);
        assert_eq!(json["updatedAt"], "2024-01-02T03:04:05Z");
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn conditional_delete_is_a_single_returning_statement() {
        let query = Query::delete()
            .from_table(Entity)
            .and_where(Column::Id.eq(5))
            .returning_all()
            .to_owned();
        let sql = DbBackend::Postgres.build(&query).to_string();
        assert!(sql.starts_with(r#"DELETE FROM "count""#), "{sql}");
        assert!(sql.contains(r#""id" = 5"#), "{sql}");
        assert!(sql.ends_with("RETURNING *"), "{sql}");
    }

    #[test]
    fn increment_adds_in_sql() {
        let query = Query::update()
            .table(Entity)
            .value(Column::Value, Expr::col(Column::Value).add(1))
            .and_where(Column::Id.eq(9))
            .returning_all()
            .to_owned();
        let sql = DbBackend::Postgres.build(&query).to_string();
        assert!(sql.contains(r#""value" = "value" + 1"#), "{sql}");
        assert!(sql.ends_with("RETURNING *"), "{sql}");
    }

    #[test]
    fn touched_at_never_moves_backwards() {
        let query = Query::update()
            .table(Entity)
            .value(Column::UpdatedAt, touched_at())
            .and_where(Column::Id.eq(9))
            .to_owned();
        let sql = DbBackend::Postgres.build(&query).to_string();
        assert!(sql.contains(r#""updated_at" = GREATEST("updated_at", "#), "{sql}");
    }
}
