mod credentials;
mod memory_store;
mod password;
mod redis_service;
mod store;
mod token;

pub use credentials::CredentialStore;
pub use memory_store::MemoryStore;
pub use password::PasswordService;
pub use redis_service::RedisStore;
pub use store::UserStore;
pub use token::TokenService;

#[cfg(test)]
pub(crate) use password::fast_password_service;
