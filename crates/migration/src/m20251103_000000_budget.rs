//! Budget preferences on `users`.
//!
//! Columns are nullable: rows created before this migration read back with
//! budgeting disabled.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    BudgetEnabled,
    BudgetRange,
    BudgetAmount,
    ResetDay,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite accepts a single column per ALTER TABLE statement.
        for column in [
            ColumnDef::new(Users::BudgetEnabled).boolean().to_owned(),
            ColumnDef::new(Users::BudgetRange).string().to_owned(),
            ColumnDef::new(Users::BudgetAmount).double().to_owned(),
            ColumnDef::new(Users::ResetDay).integer().to_owned(),
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .add_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Users::ResetDay,
            Users::BudgetAmount,
            Users::BudgetRange,
            Users::BudgetEnabled,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
