use serde::{Deserialize, Serialize};

/// Client platform as reported by the app, also used by the auth and
/// directory services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Unknown,
    Ios,
    Android,
    Web,
}

impl Platform {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ios" | "iphone os" => Platform::Ios,
            "android" => Platform::Android,
            "web" => Platform::Web,
            _ => Platform::Unknown,
        }
    }
}

/// Device metadata sent by clients alongside each request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHeaders {
    pub device_id: String,
    pub platform: Platform,
    pub app_version: String,
    pub device_model: String,
}

impl DeviceHeaders {
    /// Platform reported to the auth service. Anything that is not a mobile
    /// app, including a missing header set, is treated as web.
    pub fn auth_platform(headers: Option<&DeviceHeaders>) -> Platform {
        match headers.map(|h| h.platform) {
            Some(Platform::Ios) => Platform::Ios,
            Some(Platform::Android) => Platform::Android,
            _ => Platform::Web,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_platform_defaults_to_web() {
        assert_eq!(DeviceHeaders::auth_platform(None), Platform::Web);

        let unknown = DeviceHeaders::default();
        assert_eq!(DeviceHeaders::auth_platform(Some(&unknown)), Platform::Web);

        let ios = DeviceHeaders {
            platform: Platform::parse("iOS"),
            ..Default::default()
        };
        assert_eq!(DeviceHeaders::auth_platform(Some(&ios)), Platform::Ios);
    }
}
