// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 查询谓词模块
///
/// 提供类型化的谓词组合器（比较、与、或、非），
/// 既可以在内存中对领域对象求值，也可以由基础设施层翻译为 SQL 条件。
pub mod predicate;

pub use predicate::{Comparison, Operand, Operator, Predicate, Record, Value};
