pub mod rate_limit;
pub mod trace_id;

pub use rate_limit::{client_key, rate_limit_middleware};
pub use trace_id::{trace_id_middleware, TraceId, TraceIdGenerator};
