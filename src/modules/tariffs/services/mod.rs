mod tariff_service;

pub use tariff_service::{TariffService, TariffTemplate};
