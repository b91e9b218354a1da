//! Password input. `LOFS_PASSWORD` wins over the interactive prompt so the
//! CLI can run unattended.

use anyhow::{Context, Result};
use secrecy::SecretString;

pub const PASSWORD_ENV: &str = "LOFS_PASSWORD";

pub fn read_password() -> Result<SecretString> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        tracing::debug!("using password from {}", PASSWORD_ENV);
        return Ok(SecretString::from(pw));
    }
    let pw = rpassword::prompt_password("Password: ").context("read password")?;
    Ok(SecretString::from(pw))
}
