//! # 选项值数据模型
//!
//! 作业配置中各参数字典的统一表示。`OptionMap` 保持键的插入顺序，
//! 脚本生成时按该顺序输出关键字参数。
//!
//! ## 依赖关系
//! - 被 `models/theory.rs`, `models/calculation.rs` 使用
//! - 被 `composer/` 校验与脚本生成使用

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// 带类型的选项值
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<OptionValue>),
    Dict(OptionMap),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// 保序的选项字典
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(String, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换（替换时保留原位置）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 链式插入
    #[cfg(test)]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 去掉某个键后的副本
    pub fn without(&self, key: &str) -> OptionMap {
        OptionMap {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// serde 实现
// ─────────────────────────────────────────────────────────────

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Int(i) => serializer.serialize_i64(*i),
            OptionValue::Float(f) => serializer.serialize_f64(*f),
            OptionValue::Str(s) => serializer.serialize_str(s),
            OptionValue::List(items) => serializer.collect_seq(items),
            OptionValue::Dict(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for OptionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OptionValueVisitor;

impl<'de> Visitor<'de> for OptionValueVisitor {
    type Value = OptionValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, number, string, list or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<OptionValue, E> {
        Ok(OptionValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<OptionValue, E> {
        Ok(OptionValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<OptionValue, E> {
        i64::try_from(v)
            .map(OptionValue::Int)
            .map_err(|_| E::custom(format!("integer {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<OptionValue, E> {
        Ok(OptionValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<OptionValue, E> {
        Ok(OptionValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<OptionValue, E> {
        Ok(OptionValue::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<OptionValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(OptionValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<OptionValue, A::Error> {
        OptionMapVisitor.visit_map(map).map(OptionValue::Dict)
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(OptionValueVisitor)
    }
}

struct OptionMapVisitor;

impl<'de> Visitor<'de> for OptionMapVisitor {
    type Value = OptionMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of option names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<OptionMap, A::Error> {
        let mut map = OptionMap::new();
        while let Some((key, value)) = access.next_entry::<String, OptionValue>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for OptionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OptionMapVisitor)
    }
}
