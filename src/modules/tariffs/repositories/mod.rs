mod tariff_repository;

pub use tariff_repository::{MySqlTariffRepository, TariffRepository};
