pub mod http;
pub mod live;

pub use http::HttpPollApi;
pub use live::{subscribe, LiveSubscription};
