// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mobile detection.
//!
//! User-agent matching is approximate; false positives and negatives are accepted.

use regex::Regex;
use std::sync::LazyLock;

static MOBILE_USER_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)android|webos|iphone|ipad|ipod|blackberry|iemobile|opera mini")
        .expect("mobile user-agent pattern is valid")
});

/// Returns `true` if the user agent names a phone or tablet platform.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_USER_AGENT.is_match(user_agent)
}

/// Uses the user agent when one is known, otherwise the build target.
pub fn detect_mobile(user_agent: Option<&str>) -> bool {
    match user_agent {
        Some(ua) => is_mobile_user_agent(ua),
        None => cfg!(any(target_os = "android", target_os = "ios")),
    }
}
