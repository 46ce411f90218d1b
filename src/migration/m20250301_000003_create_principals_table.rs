use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Principals {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    SchoolId,
    ClassGroupId,
    GuardianId,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ClassGroups {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Principals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Principals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Principals::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Principals::Email)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Principals::PasswordHash)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Principals::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Principals::SchoolId).integer().null())
                    .col(ColumnDef::new(Principals::ClassGroupId).integer().null())
                    .col(ColumnDef::new(Principals::GuardianId).integer().null())
                    .col(
                        ColumnDef::new(Principals::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Principals::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_principals_school_id")
                            .from(Principals::Table, Principals::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_principals_class_group_id")
                            .from(Principals::Table, Principals::ClassGroupId)
                            .to(ClassGroups::Table, ClassGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_principals_guardian_id")
                            .from(Principals::Table, Principals::GuardianId)
                            .to(Principals::Table, Principals::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_principals_role")
                    .table(Principals::Table)
                    .col(Principals::Role)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_principals_school")
                    .table(Principals::Table)
                    .col(Principals::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Principals::Table).to_owned())
            .await
    }
}
