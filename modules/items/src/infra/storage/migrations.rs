use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000002_create_items::Migration)]
    }

    // Each module tracks its own applied migrations; sharing the default
    // `seaql_migrations` table makes the second module's migrator reject the
    // first module's recorded versions as unknown.
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_items").into_iden()
    }
}

mod m20250101_000002_create_items {
    use super::*;

    pub struct Migration;

    // DeriveMigrationName uses the source file stem ("migrations"), which
    // collides across modules; name the migration after its module instead.
    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_items"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Items::Title).string_len(255).not_null())
                        .col(ColumnDef::new(Items::Description).string_len(255).null())
                        .col(ColumnDef::new(Items::OwnerId).uuid().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_owner_id_users")
                                .from(Items::Table, Items::OwnerId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Title,
    Description,
    OwnerId,
}

// Referenced table owned by the users module; only the identifiers are
// needed to express the FK.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
