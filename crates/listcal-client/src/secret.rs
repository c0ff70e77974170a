//! Secret references in configuration values.
//!
//! The SharePoint access token in `config.toml` may point at a secret kept
//! outside the file:
//!
//! - `pass::path/in/store` - first line of `pass show path/in/store`
//! - `env::VAR_NAME` - the value of `$VAR_NAME`
//! - anything else - used as-is

use std::process::Command;

use crate::error::{ClientError, ClientResult};

const PASS_PREFIX: &str = "pass::";
const ENV_PREFIX: &str = "env::";

/// A parsed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    /// Entry in the `pass` password store.
    Pass(&'a str),
    /// Environment variable.
    Env(&'a str),
    /// Literal value.
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    /// Splits off a reference prefix, if any.
    pub fn parse(value: &'a str) -> Self {
        if let Some(path) = value.strip_prefix(PASS_PREFIX) {
            Self::Pass(path)
        } else if let Some(var) = value.strip_prefix(ENV_PREFIX) {
            Self::Env(var)
        } else {
            Self::Plain(value)
        }
    }

    /// Returns true unless the value is a literal.
    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::Plain(_))
    }

    /// Produces the secret value.
    pub fn resolve(&self) -> ClientResult<String> {
        match *self {
            Self::Pass(path) => resolve_pass(path),
            Self::Env(var) => std::env::var(var).map_err(|_| {
                ClientError::config(format!("environment variable `{}` is not set", var))
            }),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> ClientResult<String> {
    SecretRef::parse(value).resolve()
}

fn resolve_pass(path: &str) -> ClientResult<String> {
    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| ClientError::config(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClientError::config(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ClientError::config(format!("`pass show {}` produced no output", path)))
}
