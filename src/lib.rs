pub mod core;
pub mod utils;
pub mod gateway;
pub mod rules;
pub mod items;
pub mod patrons;
pub mod loans;
pub mod holds;
pub mod fines;
pub mod circulation;
