//! Initial schema migration.
//!
//! - `users`: account and vehicle/display preferences
//! - `journeys`: one row per logged trip, derived fields stored alongside inputs
//! - `log_book`: write-only diagnostic events submitted by clients

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    DateCreated,
    TankVolume,
    DefFuelCost,
    Gallon,
    FuelType,
    UserFont,
    Currency,
}

#[derive(Iden)]
enum Journeys {
    Table,
    Id,
    User,
    Description,
    DateTime,
    Distance,
    Mpg,
    TimeDriven,
    Temp,
    Condition,
    CostPl,
    AvgSpeed,
    TotalCost,
    CostPerMile,
    FuelUsedL,
    PercOfTank,
}

#[derive(Iden)]
enum LogBook {
    Table,
    Id,
    Timestamp,
    App,
    Version,
    SessionId,
    Username,
    Source,
    Func,
    Notes,
    Error,
    ReceivedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::DateCreated).timestamp().not_null())
                    .col(ColumnDef::new(Users::TankVolume).double())
                    .col(ColumnDef::new(Users::DefFuelCost).double())
                    .col(ColumnDef::new(Users::Gallon).string())
                    .col(ColumnDef::new(Users::FuelType).string())
                    .col(ColumnDef::new(Users::UserFont).string())
                    .col(ColumnDef::new(Users::Currency).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Journeys
        // ───────────────────────────────────────────────────────────────────
        // `user` is the owner's username, deliberately not a foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Journeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Journeys::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Journeys::User).string().not_null())
                    .col(
                        ColumnDef::new(Journeys::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Journeys::DateTime).timestamp().not_null())
                    .col(ColumnDef::new(Journeys::Distance).double().not_null())
                    .col(ColumnDef::new(Journeys::Mpg).double().not_null())
                    .col(ColumnDef::new(Journeys::TimeDriven).double().not_null())
                    .col(ColumnDef::new(Journeys::Temp).double())
                    .col(ColumnDef::new(Journeys::Condition).string())
                    .col(ColumnDef::new(Journeys::CostPl).double().not_null())
                    .col(ColumnDef::new(Journeys::AvgSpeed).double().not_null())
                    .col(ColumnDef::new(Journeys::TotalCost).double().not_null())
                    .col(ColumnDef::new(Journeys::CostPerMile).double().not_null())
                    .col(ColumnDef::new(Journeys::FuelUsedL).double().not_null())
                    .col(ColumnDef::new(Journeys::PercOfTank).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journeys-user-date_time")
                    .table(Journeys::Table)
                    .col(Journeys::User)
                    .col(Journeys::DateTime)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Log book
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LogBook::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LogBook::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LogBook::Timestamp).string())
                    .col(ColumnDef::new(LogBook::App).string())
                    .col(ColumnDef::new(LogBook::Version).string())
                    .col(ColumnDef::new(LogBook::SessionId).string())
                    .col(ColumnDef::new(LogBook::Username).string())
                    .col(ColumnDef::new(LogBook::Source).string())
                    .col(ColumnDef::new(LogBook::Func).string())
                    .col(ColumnDef::new(LogBook::Notes).text())
                    .col(
                        ColumnDef::new(LogBook::Error)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LogBook::ReceivedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LogBook::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Journeys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
