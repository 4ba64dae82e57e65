use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::ScheduleSlot;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ScheduleSlot::Table)
        .col(
            ColumnDef::new(ScheduleSlot::Position)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(ScheduleSlot::Name)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(ScheduleSlot::Time).string().not_null().default(""))
        .col(ColumnDef::new(ScheduleSlot::Carb).string().not_null().default(""))
        .col(ColumnDef::new(ScheduleSlot::Protein).string().not_null().default(""))
        .col(ColumnDef::new(ScheduleSlot::Fruit).string().not_null().default(""))
        .col(ColumnDef::new(ScheduleSlot::Veggie).string().not_null().default(""))
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ScheduleSlot::Table).to_owned()
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
