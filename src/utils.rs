pub mod date;
pub mod ddb;
pub mod memory;
#[cfg(test)]
pub mod testing;
