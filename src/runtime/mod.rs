//! Runtime abstraction for process-level lookups.
//!
//! Configuration loading goes through this trait instead of `std::env`
//! directly, so tests can inject environments with `MockRuntime`.

mod env;

use std::env as std_env;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    /// Look up an environment variable.
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }
}
