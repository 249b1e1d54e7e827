mod tariff;

pub use tariff::{select_active, Tariff};
