// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// 谓词中使用的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// 空值（未设置）
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    /// 集合值，用于多对多字段
    List(Vec<Value>),
}

impl Value {
    /// 值是否被“设置”：非空且不是空集合
    pub fn is_set(&self) -> bool {
        match self {
            Value::Null => false,
            Value::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    fn as_slice(&self) -> &[Value] {
        match self {
            Value::Null => &[],
            Value::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// 比较两个标量值，类型不兼容或存在空值时返回 `None`
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.equals(y)))
            }
            _ => self.partial_compare(other) == Some(Ordering::Equal),
        }
    }

    fn contains(&self, needle: &Value) -> bool {
        self.as_slice().iter().any(|item| item.equals(needle))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<&[Uuid]> for Value {
    fn from(v: &[Uuid]) -> Self {
        Value::List(v.iter().copied().map(Value::Uuid).collect())
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// 标量属于集合，集合字段与集合有交集
    In,
    NotIn,
    IsSet,
    IsNotSet,
    /// 集合字段与给定集合有交集
    Intersects,
    /// 集合字段是给定集合的子集
    SubsetOf,
}

/// 比较的右操作数：字面值或同一记录的另一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<F> {
    Value(Value),
    Field(F),
}

/// 单个比较项 `(field, operator, operand)`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<F> {
    pub field: F,
    pub op: Operator,
    pub operand: Operand<F>,
}

/// 可以被谓词求值的记录
pub trait Record<F> {
    /// 返回字段的当前值
    fn value(&self, field: &F) -> Value;
}

/// 类型化谓词
///
/// 由比较、合取、析取和取反组成的标签联合，
/// 取代字符串形式的前缀表达式。
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
    /// 恒真
    True,
    Compare(Comparison<F>),
    And(Vec<Predicate<F>>),
    Or(Vec<Predicate<F>>),
    Not(Box<Predicate<F>>),
}

impl<F> Predicate<F> {
    pub fn compare(field: F, op: Operator, value: impl Into<Value>) -> Self {
        Predicate::Compare(Comparison {
            field,
            op,
            operand: Operand::Value(value.into()),
        })
    }

    /// 两个字段之间的比较
    pub fn compare_fields(field: F, op: Operator, other: F) -> Self {
        Predicate::Compare(Comparison {
            field,
            op,
            operand: Operand::Field(other),
        })
    }

    pub fn eq(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    pub fn ne(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Ne, value)
    }

    pub fn lt(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Lt, value)
    }

    pub fn le(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Le, value)
    }

    pub fn gt(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Gt, value)
    }

    pub fn ge(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Ge, value)
    }

    pub fn is_in(field: F, values: impl Into<Value>) -> Self {
        Self::compare(field, Operator::In, values)
    }

    pub fn not_in(field: F, values: impl Into<Value>) -> Self {
        Self::compare(field, Operator::NotIn, values)
    }

    pub fn is_set(field: F) -> Self {
        Self::compare(field, Operator::IsSet, Value::Null)
    }

    pub fn is_not_set(field: F) -> Self {
        Self::compare(field, Operator::IsNotSet, Value::Null)
    }

    pub fn intersects(field: F, values: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Intersects, values)
    }

    pub fn subset_of(field: F, values: impl Into<Value>) -> Self {
        Self::compare(field, Operator::SubsetOf, values)
    }

    /// 所有子谓词同时成立
    pub fn all(parts: impl IntoIterator<Item = Predicate<F>>) -> Self {
        Predicate::And(parts.into_iter().collect())
    }

    /// 任一子谓词成立
    pub fn any(parts: impl IntoIterator<Item = Predicate<F>>) -> Self {
        Predicate::Or(parts.into_iter().collect())
    }

    /// 合取，平铺嵌套的 `And`
    pub fn and(self, other: Predicate<F>) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut a), Predicate::And(b)) => {
                a.extend(b);
                Predicate::And(a)
            }
            (Predicate::And(mut a), p) => {
                a.push(p);
                Predicate::And(a)
            }
            (p, Predicate::And(mut b)) => {
                b.insert(0, p);
                Predicate::And(b)
            }
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    /// 析取，平铺嵌套的 `Or`
    pub fn or(self, other: Predicate<F>) -> Self {
        match (self, other) {
            (Predicate::Or(mut a), Predicate::Or(b)) => {
                a.extend(b);
                Predicate::Or(a)
            }
            (Predicate::Or(mut a), p) => {
                a.push(p);
                Predicate::Or(a)
            }
            (a, b) => Predicate::Or(vec![a, b]),
        }
    }

    /// 取反，`Not(Not(p))` 化简为 `p`
    pub fn negate(self) -> Self {
        match self {
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }

    /// 对记录求值
    pub fn evaluate<R: Record<F>>(&self, record: &R) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Compare(cmp) => cmp.evaluate(record),
            Predicate::And(parts) => parts.iter().all(|p| p.evaluate(record)),
            Predicate::Or(parts) => parts.iter().any(|p| p.evaluate(record)),
            Predicate::Not(inner) => !inner.evaluate(record),
        }
    }

    /// 过滤出满足谓词的记录
    pub fn filter<R: Record<F>>(&self, records: Vec<R>) -> Vec<R> {
        records.into_iter().filter(|r| self.evaluate(r)).collect()
    }
}

impl<F> std::ops::Not for Predicate<F> {
    type Output = Predicate<F>;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl<F> Comparison<F> {
    pub fn evaluate<R: Record<F>>(&self, record: &R) -> bool {
        let left = record.value(&self.field);
        let right = match &self.operand {
            Operand::Value(v) => v.clone(),
            Operand::Field(other) => record.value(other),
        };

        match self.op {
            Operator::IsSet => left.is_set(),
            Operator::IsNotSet => !left.is_set(),
            Operator::Eq => left.equals(&right),
            Operator::Ne => !left.equals(&right),
            Operator::Lt => left.partial_compare(&right) == Some(Ordering::Less),
            Operator::Le => matches!(
                left.partial_compare(&right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Gt => left.partial_compare(&right) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                left.partial_compare(&right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::In | Operator::Intersects => {
                left.as_slice().iter().any(|item| right.contains(item))
            }
            Operator::NotIn => !left.as_slice().iter().any(|item| right.contains(item)),
            Operator::SubsetOf => left.as_slice().iter().all(|item| right.contains(item)),
        }
    }
}
