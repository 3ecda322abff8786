// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![no_main]

use libfuzzer_sys::fuzz_target;
use riskdesk::config::IntentConfig;
use riskdesk::services::dispatcher::ServiceDispatcher;
use riskdesk::services::intent::IntentExtractor;

fuzz_target!(|data: &[u8]| {
    if let Ok(prompt) = std::str::from_utf8(data) {
        let extractor = IntentExtractor::from_config(&IntentConfig::default());
        if let Ok(intent) = extractor.extract(prompt) {
            let dispatcher = ServiceDispatcher::new(extractor.reference().clone());
            let _ = dispatcher.dispatch(&intent);
        }
    }
});
