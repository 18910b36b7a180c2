use serde::Serialize;

/// Browser, OS, and device class derived from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// Browser family, or `"Unknown"`.
    pub browser: &'static str,
    /// Operating system, or `"Unknown"`.
    pub os: &'static str,
    /// `"Mobile"`, `"Desktop"`, or `"Unknown"` when no UA was sent.
    pub device: &'static str,
}

impl ClientInfo {
    /// Classification of a request with no user-agent header at all.
    pub const UNKNOWN: Self = Self {
        browser: "Unknown",
        os: "Unknown",
        device: "Unknown",
    };
}

/// Classifies a user-agent string by case-insensitive substring matching.
///
/// The precedence order is a compatibility contract and must not change:
/// browser checks `chrome`, `safari`, `firefox`, `edge` in that order
/// (first match wins — Chrome UAs also contain "Safari", so Chrome must be
/// checked first); OS checks `android`, `iphone`/`ipad`, `windows`, `mac`;
/// device is `Mobile` when the UA contains `mobile`, otherwise `Desktop`.
/// A missing UA classifies as all-`Unknown`.
pub fn classify_user_agent(user_agent: Option<&str>) -> ClientInfo {
    let Some(ua) = user_agent else {
        return ClientInfo::UNKNOWN;
    };
    let ua = ua.to_ascii_lowercase();

    let browser = if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("edge") {
        "Edge"
    } else {
        "Unknown"
    };

    let os = if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") {
        "iOS"
    } else if ua.contains("windows") {
        "Windows"
    } else if ua.contains("mac") {
        "MacOS"
    } else {
        "Unknown"
    };

    let device = if ua.contains("mobile") {
        "Mobile"
    } else {
        "Desktop"
    };

    ClientInfo {
        browser,
        os,
        device,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const FIREFOX_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) \
         Gecko/20100101 Firefox/121.0";

    #[test]
    fn missing_ua_is_all_unknown() {
        assert_eq!(classify_user_agent(None), ClientInfo::UNKNOWN);
    }

    #[test]
    fn chrome_wins_over_safari_token() {
        // Chrome UAs contain "Safari/537.36"; priority order keeps this Chrome
        let info = classify_user_agent(Some(CHROME_WIN));
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.os, "Windows");
        assert_eq!(info.device, "Desktop");
    }

    #[test]
    fn iphone_safari_is_mobile_ios() {
        let info = classify_user_agent(Some(SAFARI_IPHONE));
        assert_eq!(info.browser, "Safari");
        assert_eq!(info.os, "iOS");
        assert_eq!(info.device, "Mobile");
    }

    #[test]
    fn firefox_on_mac() {
        let info = classify_user_agent(Some(FIREFOX_MAC));
        assert_eq!(info.browser, "Firefox");
        assert_eq!(info.os, "MacOS");
        assert_eq!(info.device, "Desktop");
    }

    #[test]
    fn android_before_other_os_tokens() {
        let info = classify_user_agent(Some(
            "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
        ));
        assert_eq!(info.os, "Android");
        assert_eq!(info.device, "Mobile");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let info = classify_user_agent(Some("SOMETHING CHROME ON WINDOWS"));
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.os, "Windows");
    }

    #[test]
    fn unmatched_ua_defaults_to_desktop() {
        let info = classify_user_agent(Some("curl/8.4.0"));
        assert_eq!(info.browser, "Unknown");
        assert_eq!(info.os, "Unknown");
        assert_eq!(info.device, "Desktop");
    }

    #[test]
    fn ipad_is_ios() {
        let info = classify_user_agent(Some("Mozilla/5.0 (iPad; CPU OS 17_0)"));
        assert_eq!(info.os, "iOS");
    }
}
