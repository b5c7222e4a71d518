//! Serde adapters that persist `Option<T>` as a plain integer, using a
//! reserved value for `None`.

use serde::{Deserialize, Deserializer, Serializer};

/// `None` is written as `u32::MAX`.
pub mod max_u32 {
    use super::*;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Copy + Into<u32>,
        S: Serializer,
    {
        serializer.serialize_u32(value.map_or(u32::MAX, Into::into))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<u32>,
        D: Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Ok((raw != u32::MAX).then(|| T::from(raw)))
    }
}

/// `None` is written as `0`.
pub mod zero_u32 {
    use super::*;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Copy + Into<u32>,
        S: Serializer,
    {
        serializer.serialize_u32(value.map_or(0, Into::into))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<u32>,
        D: Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Ok((raw != 0).then(|| T::from(raw)))
    }
}
