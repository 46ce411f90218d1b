use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
    Name,
    Address,
    Phone,
    ContactEmail,
    Code,
    DirectorId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // director_id is a weak reference into principals; no FK constraint,
        // since principals itself references schools.
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schools::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Schools::Address).string_len(300).null())
                    .col(ColumnDef::new(Schools::Phone).string_len(20).null())
                    .col(ColumnDef::new(Schools::ContactEmail).string_len(100).null())
                    .col(
                        ColumnDef::new(Schools::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schools::DirectorId).integer().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await
    }
}
