use std::env;
use std::error::Error;
use std::str::FromStr;

pub trait FromEnv: Sized {
    fn from_env(env_var: &str) -> anyhow::Result<Self>;

    /// Like [`FromEnv::from_env`] but falls back to `default` when the
    /// variable is unset. A set but unparsable value is still an error.
    fn from_env_or(env_var: &str, default: Self) -> anyhow::Result<Self>;

    fn from_env_opt(env_var: &str) -> anyhow::Result<Option<Self>>;
}

impl<T: FromStr> FromEnv for T
where
    <T as FromStr>::Err: 'static + Error + Send + Sync,
{
    fn from_env(env_var: &str) -> anyhow::Result<Self> {
        let value = env::var(env_var)?;
        Ok(T::from_str(&value)?)
    }

    fn from_env_or(env_var: &str, default: Self) -> anyhow::Result<Self> {
        Ok(Self::from_env_opt(env_var)?.unwrap_or(default))
    }

    fn from_env_opt(env_var: &str) -> anyhow::Result<Option<Self>> {
        match env::var(env_var) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(T::from_str(value.trim())?)),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
