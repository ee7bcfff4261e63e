//! API key retrieval from environment variables and `.env` files.
//!
//! Resolution checks the primary environment variable first and then the
//! Google-tooling fallback. A missing key is not an error here; callers
//! surface the absence to the user on the first model call instead.

use std::env;

use anyhow::Result;

use super::constants::env_vars;

/// Load environment variables from a `.env` file in the current directory.
///
/// Missing files are fine; anything else is logged and ignored so a broken
/// `.env` never blocks startup.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("loaded environment variables from {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::warn!("failed to load .env file: {e}");
            Ok(())
        }
    }
}

/// Resolve the Gemini API key, preferring `GEMINI_API_KEY` over
/// `GOOGLE_API_KEY`. Empty values count as unset.
pub fn resolve_api_key() -> Option<String> {
    resolve_from(&[env_vars::GEMINI_API_KEY, env_vars::GOOGLE_API_KEY])
}

fn resolve_from(vars: &[&str]) -> Option<String> {
    for var in vars {
        if let Ok(key) = env::var(var) {
            if !key.is_empty() {
                return Some(key);
            }
        }
    }
    None
}
