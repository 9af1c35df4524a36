mod http_fetcher;
mod relay_fetcher;

pub use http_fetcher::*;
pub use relay_fetcher::*;
