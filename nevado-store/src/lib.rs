pub mod app_config;
pub mod file_store;
pub mod http_gateway;
pub mod transport;

pub use app_config::{Config, StorageConfig};
pub use file_store::FileStore;
pub use http_gateway::HttpBookingGateway;
pub use transport::{ApiRequest, ApiResponse, Idempotency, RetryPolicy, RetryingTransport, TransportError};
