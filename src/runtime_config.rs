//! # Runtime Configuration Module
//!
//! Environment-driven settings for the coroutine runtime and the HTTP
//! transport.
//!
//! ## Environment Variables
//!
//! ### `SEGTRIE_STACK_SIZE`
//!
//! Stack size for every `may` coroutine, request handlers included. Accepts
//! decimal (`16384`) or hexadecimal (`0x4000`). Default: `0x4000` (16 KB).
//!
//! Handlers run on this stack, and so does the recursive trie walk; very deep
//! route trees or heavy handlers need more. Memory use is roughly
//! `stack_size × concurrent requests`.
//!
//! ### `SEGTRIE_MAX_BODY_BYTES`
//!
//! Largest accepted request body, in bytes (decimal or `0x` hex). Larger
//! bodies are answered with `413 Payload Too Large` before decoding.
//! Default: `1048576` (1 MiB).
//!
//! Unparsable values fall back to the default.
//!
//! ## Usage
//!
//! ```rust
//! use segtrie::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```
//!
//! ```bash
//! export SEGTRIE_STACK_SIZE=0x8000
//! export SEGTRIE_MAX_BODY_BYTES=65536
//! ```

use std::env;

pub const STACK_SIZE_VAR: &str = "SEGTRIE_STACK_SIZE";
pub const MAX_BODY_BYTES_VAR: &str = "SEGTRIE_MAX_BODY_BYTES";

pub const DEFAULT_STACK_SIZE: usize = 0x4000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes (default: 16 KB / 0x4000)
    pub stack_size: usize,
    /// Largest accepted request body in bytes (default: 1 MiB)
    pub max_body_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: usize| {
            lookup(key)
                .and_then(|val| parse_size(&val))
                .unwrap_or(default)
        };
        Self {
            stack_size: read(STACK_SIZE_VAR, DEFAULT_STACK_SIZE),
            max_body_bytes: read(MAX_BODY_BYTES_VAR, DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Configure the global `may` runtime with these settings.
    ///
    /// Must run before the first coroutine is spawned.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

/// Parse a size given in decimal or `0x`-prefixed hexadecimal.
fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_hex_and_decimal() {
        let config = config_from(&[(STACK_SIZE_VAR, "0x8000"), (MAX_BODY_BYTES_VAR, "65536")]);
        assert_eq!(config.stack_size, 0x8000);
        assert_eq!(config.max_body_bytes, 65536);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[(STACK_SIZE_VAR, "0xZZ"), (MAX_BODY_BYTES_VAR, "lots")]);
        assert_eq!(config, RuntimeConfig::default());
    }
}
