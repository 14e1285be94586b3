mod condition_level;
mod query;
mod slope_record;
mod suggestion_list;

pub use condition_level::*;
pub use query::*;
pub use slope_record::*;
pub use suggestion_list::*;
