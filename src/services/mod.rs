// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

pub mod assistant;
pub mod dispatcher;
pub mod evaluation;
pub mod inference;
pub mod intent;
pub mod llm;
pub mod patterns;
pub mod risk;
