//! Visitor form helpers: region catalog and phone checks.

mod catalog;
mod phone;

pub use catalog::{cities_for, states_for, COUNTRIES, DEFAULT_COUNTRY};
pub use phone::{check_phone, phone_digits, PhoneCheck};
