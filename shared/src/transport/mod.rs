pub mod memory;
pub mod redis_pubsub;
pub mod traits;

pub use memory::{MemoryBroker, MemoryConnection, MemoryMessageStream};
pub use redis_pubsub::{RedisConnection, RedisConnector, RedisMessageStream};
pub use traits::{ChannelConnection, MessageStream, TransportConnector};
