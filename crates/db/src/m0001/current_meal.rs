use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::CurrentMeal;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(CurrentMeal::Table)
        .col(
            ColumnDef::new(CurrentMeal::Position)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(CurrentMeal::Date).string().not_null())
        .col(ColumnDef::new(CurrentMeal::SlotName).string().not_null())
        .col(ColumnDef::new(CurrentMeal::Time).string().not_null().default(""))
        .col(ColumnDef::new(CurrentMeal::Item1).string().not_null().default(""))
        .col(ColumnDef::new(CurrentMeal::Item2).string().not_null().default(""))
        .col(ColumnDef::new(CurrentMeal::Item3).string().not_null().default(""))
        .col(ColumnDef::new(CurrentMeal::Item4).string().not_null().default(""))
        .col(ColumnDef::new(CurrentMeal::Status).string().null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(CurrentMeal::Table).to_owned()
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
