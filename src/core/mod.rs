pub mod consumer;
mod error;
pub mod hub;
pub mod lifecycle;
pub mod registry;
pub mod source;

pub use consumer::{Consumer, ConsumerId, ConsumerSink};
pub use error::{LifecycleError, ProduceError, RegistryError, SendError};
pub use hub::{FanOut, Hub};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use registry::{ConsumerRegistry, Evicted};
pub use source::{MessageSource, RecordProducer, TimestampProducer};
