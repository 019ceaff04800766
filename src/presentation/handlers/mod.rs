// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod admin_handler;
pub mod portal_handler;
pub mod sla_handler;
pub mod taxonomy_handler;
pub mod ticket_handler;
