// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 谓词到 SQL 条件的翻译
//!
//! 翻译是“预过滤”：生成的条件选出的行集合总是谓词真实结果的超集，
//! 仓库在取回记录后再用 [`Predicate::filter`] 在内存中精确求值。
//! JSON 列（标签、客户列表）上的集合运算无法翻译，在 `And` 中被放宽为恒真。

use crate::domain::models::sla::{SlaPolicyField, SlaStatusField};
use crate::domain::models::ticket::TicketField;
use crate::domain::query::{Comparison, Operand, Operator, Predicate, Value};
use crate::infrastructure::database::entities::{sla, sla_status, ticket};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, Value as SqlValue};

/// 可以映射到数据库列的谓词字段
pub trait SqlField {
    type Column: ColumnTrait;

    /// 标量列返回 `Some`，JSON 集合列返回 `None`
    fn column(&self) -> Option<Self::Column>;
}

impl SqlField for TicketField {
    type Column = ticket::Column;

    fn column(&self) -> Option<Self::Column> {
        Some(match self {
            TicketField::Id => ticket::Column::Id,
            TicketField::TeamId => ticket::Column::TeamId,
            TicketField::UserId => ticket::Column::UserId,
            TicketField::PartnerId => ticket::Column::PartnerId,
            TicketField::TicketTypeId => ticket::Column::TicketTypeId,
            TicketField::TagIds => return None,
            TicketField::Priority => ticket::Column::Priority,
            TicketField::StageId => ticket::Column::StageId,
            TicketField::KanbanState => ticket::Column::KanbanState,
            TicketField::SlaDeadline => ticket::Column::SlaDeadline,
            TicketField::SlaReachedLate => ticket::Column::SlaReachedLate,
            TicketField::CloseDate => ticket::Column::CloseDate,
            TicketField::CreatedAt => ticket::Column::CreatedAt,
            TicketField::Active => ticket::Column::Active,
        })
    }
}

impl SqlField for SlaPolicyField {
    type Column = sla::Column;

    fn column(&self) -> Option<Self::Column> {
        Some(match self {
            SlaPolicyField::Id => sla::Column::Id,
            SlaPolicyField::TeamId => sla::Column::TeamId,
            SlaPolicyField::Priority => sla::Column::Priority,
            SlaPolicyField::TicketTypeId => sla::Column::TicketTypeId,
            SlaPolicyField::StageId => sla::Column::StageId,
            SlaPolicyField::StageSequence => sla::Column::StageSequence,
            SlaPolicyField::Active => sla::Column::Active,
            SlaPolicyField::TagIds | SlaPolicyField::PartnerIds => return None,
        })
    }
}

impl SqlField for SlaStatusField {
    type Column = sla_status::Column;

    fn column(&self) -> Option<Self::Column> {
        Some(match self {
            SlaStatusField::Id => sla_status::Column::Id,
            SlaStatusField::TicketId => sla_status::Column::TicketId,
            SlaStatusField::SlaId => sla_status::Column::SlaId,
            SlaStatusField::SlaStageId => sla_status::Column::SlaStageId,
            SlaStatusField::Deadline => sla_status::Column::Deadline,
            SlaStatusField::ReachedDatetime => sla_status::Column::ReachedDatetime,
        })
    }
}

/// 将谓词翻译为 SQL 预过滤条件
///
/// 返回 `None` 表示不需要任何 SQL 过滤（恒真或完全无法翻译）。
pub fn to_condition<F: SqlField>(predicate: &Predicate<F>) -> Option<Condition> {
    translate(predicate).condition
}

/// 翻译结果：`condition` 为 `None` 时代表恒真；
/// `exact` 表示条件与谓词完全等价，而不仅是超集
struct Translated {
    condition: Option<Condition>,
    exact: bool,
}

impl Translated {
    fn relaxed() -> Self {
        Self {
            condition: None,
            exact: false,
        }
    }
}

fn translate<F: SqlField>(predicate: &Predicate<F>) -> Translated {
    match predicate {
        Predicate::True => Translated {
            condition: None,
            exact: true,
        },
        Predicate::Compare(cmp) => match comparison(cmp) {
            Some(condition) => Translated {
                condition: Some(condition),
                exact: true,
            },
            None => Translated::relaxed(),
        },
        Predicate::And(parts) => {
            let mut condition = Condition::all();
            let mut restricted = false;
            let mut exact = true;
            for part in parts {
                let t = translate(part);
                exact &= t.exact;
                if let Some(c) = t.condition {
                    condition = condition.add(c);
                    restricted = true;
                }
            }
            Translated {
                condition: restricted.then_some(condition),
                exact,
            }
        }
        Predicate::Or(parts) => {
            if parts.is_empty() {
                // 空析取恒假，放宽处理
                return Translated::relaxed();
            }
            let mut condition = Condition::any();
            let mut exact = true;
            for part in parts {
                let t = translate(part);
                exact &= t.exact;
                match t.condition {
                    Some(c) => condition = condition.add(c),
                    None => return Translated { condition: None, exact },
                }
            }
            Translated {
                condition: Some(condition),
                exact,
            }
        }
        Predicate::Not(inner) => {
            let t = translate(inner);
            match t.condition {
                Some(c) if t.exact => Translated {
                    condition: Some(c.not()),
                    exact: true,
                },
                _ => Translated::relaxed(),
            }
        }
    }
}

/// 单个比较的二值翻译
///
/// 每个生成的条件对空值都给出确定的真假，这样外层 `NOT` 才与内存求值一致。
fn comparison<F: SqlField>(cmp: &Comparison<F>) -> Option<Condition> {
    let column = cmp.field.column()?;

    match &cmp.operand {
        Operand::Field(other) => {
            let other = other.column()?;
            let both_set = || {
                Condition::all()
                    .add(Expr::col(column).is_not_null())
                    .add(Expr::col(other).is_not_null())
            };
            let ordered = |expr: SimpleExpr| Some(both_set().add(expr));
            match cmp.op {
                Operator::Lt => ordered(Expr::col(column).lt(Expr::col(other))),
                Operator::Le => ordered(Expr::col(column).lte(Expr::col(other))),
                Operator::Gt => ordered(Expr::col(column).gt(Expr::col(other))),
                Operator::Ge => ordered(Expr::col(column).gte(Expr::col(other))),
                Operator::Eq | Operator::Ne => {
                    let eq = Condition::any()
                        .add(
                            Condition::all()
                                .add(Expr::col(column).is_null())
                                .add(Expr::col(other).is_null()),
                        )
                        .add(both_set().add(Expr::col(column).eq(Expr::col(other))));
                    Some(if cmp.op == Operator::Eq { eq } else { eq.not() })
                }
                _ => None,
            }
        }
        Operand::Value(value) => value_comparison(column, cmp.op, value),
    }
}

fn value_comparison<C: ColumnTrait>(column: C, op: Operator, value: &Value) -> Option<Condition> {
    let set = |expr: SimpleExpr| Some(Condition::all().add(column.is_not_null()).add(expr));

    match op {
        Operator::IsSet => Some(Condition::all().add(column.is_not_null())),
        Operator::IsNotSet => Some(Condition::all().add(column.is_null())),
        Operator::Eq => match value {
            Value::Null => Some(Condition::all().add(column.is_null())),
            v => set(column.eq(sql_value(v)?)),
        },
        Operator::Ne => match value {
            Value::Null => Some(Condition::all().add(column.is_not_null())),
            v => Some(
                Condition::any()
                    .add(column.is_null())
                    .add(column.ne(sql_value(v)?)),
            ),
        },
        Operator::Lt => set(column.lt(sql_value(value)?)),
        Operator::Le => set(column.lte(sql_value(value)?)),
        Operator::Gt => set(column.gt(sql_value(value)?)),
        Operator::Ge => set(column.gte(sql_value(value)?)),
        Operator::In | Operator::Intersects => set(column.is_in(sql_list(value)?)),
        Operator::NotIn => Some(
            Condition::any()
                .add(column.is_null())
                .add(column.is_not_in(sql_list(value)?)),
        ),
        Operator::SubsetOf => Some(
            Condition::any()
                .add(column.is_null())
                .add(column.is_in(sql_list(value)?)),
        ),
    }
}

/// 标量值到 SQL 绑定值；时间统一以 UTC 偏移绑定，保证与存储格式一致
fn sql_value(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Null | Value::List(_) => None,
        Value::Bool(b) => Some((*b).into()),
        Value::Int(i) => Some((*i).into()),
        Value::Float(f) => Some((*f).into()),
        Value::Text(s) => Some(s.clone().into()),
        Value::Uuid(id) => Some((*id).into()),
        Value::DateTime(dt) => Some(dt.fixed_offset().into()),
    }
}

fn sql_list(value: &Value) -> Option<Vec<SqlValue>> {
    match value {
        Value::List(items) => items
            .iter()
            .filter(|item| !matches!(item, Value::Null))
            .map(sql_value)
            .collect(),
        Value::Null => Some(Vec::new()),
        scalar => sql_value(scalar).map(|v| vec![v]),
    }
}
