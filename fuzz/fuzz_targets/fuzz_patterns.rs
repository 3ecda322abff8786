// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![no_main]

use libfuzzer_sys::fuzz_target;
use riskdesk::domain::PatternCategory;
use riskdesk::services::patterns::find_matches;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for category in PatternCategory::ALL {
            for found in find_matches(*category, text) {
                assert!(text.contains(&found));
            }
        }
    }
});
