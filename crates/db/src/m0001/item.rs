use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Item;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Item::Table)
        .col(
            ColumnDef::new(Item::Name)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Item::Carb).string().not_null().default(""))
        .col(ColumnDef::new(Item::Protein).string().not_null().default(""))
        .col(ColumnDef::new(Item::Fruit).string().not_null().default(""))
        .col(ColumnDef::new(Item::Veggie).string().not_null().default(""))
        .col(ColumnDef::new(Item::LastUsed).string().not_null().default(""))
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Item::Table).to_owned()
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
