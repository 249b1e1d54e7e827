// Tariffs module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{select_active, Tariff};
pub use repositories::{MySqlTariffRepository, TariffRepository};
pub use services::{TariffService, TariffTemplate};
