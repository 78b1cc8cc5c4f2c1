use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShippingZones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShippingZones::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShippingZones::MinKm).double().not_null())
                    .col(ColumnDef::new(ShippingZones::MaxKm).double().not_null())
                    .col(ColumnDef::new(ShippingZones::PriceClp).integer().not_null())
                    .col(
                        ColumnDef::new(ShippingZones::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ShippingZones::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ShippingZones::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShippingMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShippingMethods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShippingMethods::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingMethods::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ShippingMethods::Description).text())
                    .col(
                        ColumnDef::new(ShippingMethods::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ShippingMethods::StartTime).time().not_null())
                    .col(ColumnDef::new(ShippingMethods::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(ShippingMethods::MaxKm)
                            .double()
                            .not_null()
                            .default(7.0),
                    )
                    .col(
                        ColumnDef::new(ShippingMethods::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ShippingMethods::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShippingQuotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShippingQuotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShippingQuotes::SessionId).string_len(100))
                    .col(ColumnDef::new(ShippingQuotes::OriginAddress).text())
                    .col(
                        ColumnDef::new(ShippingQuotes::DestinationAddress)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShippingQuotes::OriginLat).double())
                    .col(ColumnDef::new(ShippingQuotes::OriginLng).double())
                    .col(ColumnDef::new(ShippingQuotes::DestinationLat).double())
                    .col(ColumnDef::new(ShippingQuotes::DestinationLng).double())
                    .col(
                        ColumnDef::new(ShippingQuotes::DistanceKm)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShippingQuotes::DurationMinutes).integer())
                    .col(ColumnDef::new(ShippingQuotes::ShippingMethodId).integer())
                    .col(ColumnDef::new(ShippingQuotes::ZoneId).integer())
                    .col(
                        ColumnDef::new(ShippingQuotes::PriceClp)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingQuotes::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ShippingQuotes::RouterResponse).text())
                    .col(
                        ColumnDef::new(ShippingQuotes::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipping_quotes_method")
                            .from(ShippingQuotes::Table, ShippingQuotes::ShippingMethodId)
                            .to(ShippingMethods::Table, ShippingMethods::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipping_quotes_zone")
                            .from(ShippingQuotes::Table, ShippingQuotes::ZoneId)
                            .to(ShippingZones::Table, ShippingZones::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShippingQuotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShippingMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShippingZones::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShippingZones {
    Table,
    Id,
    MinKm,
    MaxKm,
    PriceClp,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ShippingMethods {
    Table,
    Id,
    Name,
    Code,
    Description,
    IsActive,
    StartTime,
    EndTime,
    MaxKm,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ShippingQuotes {
    Table,
    Id,
    SessionId,
    OriginAddress,
    DestinationAddress,
    OriginLat,
    OriginLng,
    DestinationLat,
    DestinationLng,
    DistanceKm,
    DurationMinutes,
    ShippingMethodId,
    ZoneId,
    PriceClp,
    IsAvailable,
    RouterResponse,
    CreatedAt,
}
