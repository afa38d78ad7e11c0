//! Database adapters (SeaORM); one module per table.

pub mod users_sea;
