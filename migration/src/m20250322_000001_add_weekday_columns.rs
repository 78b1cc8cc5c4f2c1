use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Per-weekday availability flags. Existing methods stay available every day;
// operators opt days out afterwards.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for col in [
            ShippingMethods::AvailableMonday,
            ShippingMethods::AvailableTuesday,
            ShippingMethods::AvailableWednesday,
            ShippingMethods::AvailableThursday,
            ShippingMethods::AvailableFriday,
            ShippingMethods::AvailableSaturday,
            ShippingMethods::AvailableSunday,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(ShippingMethods::Table)
                        .add_column(
                            ColumnDef::new(col).boolean().not_null().default(true),
                        )
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for col in [
            ShippingMethods::AvailableMonday,
            ShippingMethods::AvailableTuesday,
            ShippingMethods::AvailableWednesday,
            ShippingMethods::AvailableThursday,
            ShippingMethods::AvailableFriday,
            ShippingMethods::AvailableSaturday,
            ShippingMethods::AvailableSunday,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(ShippingMethods::Table)
                        .drop_column(col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ShippingMethods {
    Table,
    AvailableMonday,
    AvailableTuesday,
    AvailableWednesday,
    AvailableThursday,
    AvailableFriday,
    AvailableSaturday,
    AvailableSunday,
}
