//! Persistence layer for intake logs, condition logs, and AI reports.
//!
//! [`store::WaterStore`] is the single access point: one SeaORM connection,
//! schema managed by `sea-orm-migration`, and every method scoped by an
//! explicit account id so the same store serves any number of accounts.

pub mod entities;
pub mod store;


pub use store::WaterStore;
