mod conditions_searcher;
mod suggestion_fetcher;

pub use conditions_searcher::*;
pub use suggestion_fetcher::*;
