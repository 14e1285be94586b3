mod search_conditions;
mod suggest_cities;

pub use search_conditions::*;
pub use suggest_cities::*;
