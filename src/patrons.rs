use rust_decimal::Decimal;
use crate::core::domain::Identifiable;
use crate::core::library::PatronGroup;

pub mod command;
pub mod controller;
pub mod domain;
pub mod dto;
pub mod factory;
pub mod repository;

pub(crate) trait Patron: Identifiable {
    fn group(&self) -> PatronGroup;
    fn is_blocked(&self) -> bool;
    fn balance(&self) -> Decimal;
}
