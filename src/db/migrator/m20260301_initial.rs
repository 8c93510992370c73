use crate::entities::prelude::*;
use crate::entities::reviews;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Built by hand instead of from the entity: movie_id stays a bare
        // integer with no FOREIGN KEY clause, so a review may reference a
        // movie id that was never inserted.
        manager
            .create_table(
                Table::create()
                    .table(Reviews)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(reviews::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(reviews::Column::MovieId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(reviews::Column::Review).text().not_null())
                    .col(ColumnDef::new(reviews::Column::Rating).float().not_null())
                    .col(ColumnDef::new(reviews::Column::Date).text().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
