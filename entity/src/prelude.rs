pub use super::command::Entity as Command;
pub use super::rate_limit_counter::Entity as RateLimitCounter;
