use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Recipe;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Recipe::Table)
        .col(ColumnDef::new(Recipe::Id).string().not_null().primary_key())
        .col(ColumnDef::new(Recipe::Title).string().not_null())
        .col(
            ColumnDef::new(Recipe::Description)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Recipe::SourceDomain)
                .string()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(Recipe::Url).string().not_null().default(""))
        .col(ColumnDef::new(Recipe::Ingredients).json_binary().not_null())
        .col(ColumnDef::new(Recipe::Instructions).json_binary().not_null())
        .col(ColumnDef::new(Recipe::Tags).json_binary().not_null())
        .col(
            ColumnDef::new(Recipe::StepCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Recipe::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Recipe::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
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

pub struct CreateSourceDomainIdx;

fn create_source_domain_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_recipe_source_domain")
        .table(Recipe::Table)
        .col(Recipe::SourceDomain)
        .to_owned()
}

fn drop_source_domain_idx() -> IndexDropStatement {
    Index::drop()
        .name("idx_recipe_source_domain")
        .table(Recipe::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateSourceDomainIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_source_domain_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_source_domain_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
