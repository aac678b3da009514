// Account registration, login, and the bearer-token extractor that guards
// every other /api route.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
