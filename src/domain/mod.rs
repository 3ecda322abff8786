// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

mod assessment;
mod intent;
mod pattern;
mod reference;

pub use assessment::*;
pub use intent::*;
pub use pattern::*;
pub use reference::*;
