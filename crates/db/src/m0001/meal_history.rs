use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::MealHistory;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealHistory::Table)
        .col(
            ColumnDef::new(MealHistory::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(MealHistory::Date).string().not_null())
        .col(ColumnDef::new(MealHistory::SlotName).string().not_null())
        .col(ColumnDef::new(MealHistory::Time).string().not_null().default(""))
        .col(ColumnDef::new(MealHistory::Item1).string().not_null().default(""))
        .col(ColumnDef::new(MealHistory::Item2).string().not_null().default(""))
        .col(ColumnDef::new(MealHistory::Item3).string().not_null().default(""))
        .col(ColumnDef::new(MealHistory::Item4).string().not_null().default(""))
        .col(ColumnDef::new(MealHistory::Status).string().not_null())
        .col(ColumnDef::new(MealHistory::ArchivedAt).string().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealHistory::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
