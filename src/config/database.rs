//! Database configuration module.
//!
//! Handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL.

use crate::entities::{AnnualProject, BudgetCeiling, Justification, Product, Requisition};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/ceiling_ledger.sqlite".to_string())
}

/// Establishes a connection to the database using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all ledger tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Referenced tables first; requisitions carry foreign keys to both.
    let ceiling_table = schema.create_table_from_entity(BudgetCeiling);
    let product_table = schema.create_table_from_entity(Product);
    let annual_project_table = schema.create_table_from_entity(AnnualProject);
    let requisition_table = schema.create_table_from_entity(Requisition);
    let justification_table = schema.create_table_from_entity(Justification);

    db.execute(builder.build(&ceiling_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&annual_project_table)).await?;
    db.execute(builder.build(&requisition_table)).await?;
    db.execute(builder.build(&justification_table)).await?;

    Ok(())
}
