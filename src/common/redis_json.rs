use redis::{RedisWrite, ToRedisArgs};
use serde::Serialize;

/// A value already encoded as JSON, ready to be passed as a Redis argument.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Json(String);

impl Json {
    pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_string(value).map(Self)
    }
}

impl ToRedisArgs for Json {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        self.0.write_redis_args(out);
    }
}
