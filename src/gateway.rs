use crate::utils::memory::MemoryDatabase;

pub mod ddb;
pub mod events;
pub mod memory;
pub mod sns;
pub mod factory;

#[derive(Debug, Clone)]
pub(crate) enum GatewayPublisherVia {
    Sns,
    LocalDynamoDB,
    Memory(MemoryDatabase),
}
