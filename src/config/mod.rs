use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::dispatch::DispatchMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub web: WebConfig,
    pub services: ServicesConfig,
    pub access: AccessConfig,
    pub dispatch: DispatchConfig,
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Deadline applied to each inbound request, carried into downstream calls
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Base URL used when building deep links, e.g. https://app.example.com
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub auth_url: String,
    pub directory_url: String,
    pub threading_url: String,
    pub excomms_url: String,
    pub layout_url: String,
    pub care_url: String,
    pub media_url: String,
    pub payments_url: String,
    pub patientsync_url: String,
    pub timeout_ms: u64,
}

impl ServicesConfig {
    pub fn urls(&self) -> [(&'static str, &str); 9] {
        [
            ("auth", &self.auth_url),
            ("directory", &self.directory_url),
            ("threading", &self.threading_url),
            ("excomms", &self.excomms_url),
            ("layout", &self.layout_url),
            ("care", &self.care_url),
            ("media", &self.media_url),
            ("payments", &self.payments_url),
            ("patientsync", &self.patientsync_url),
        ]
    }
}

/// Lifetime of the resource -> organization map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceMapScope {
    /// One map shared by every request in the process
    Process,
    /// A fresh map per inbound request
    Request,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub resource_map_scope: ResourceMapScope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub mode: DispatchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Organizations whose providers get video calling
    pub video_calling_org_ids: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{service} service URL '{url}' is invalid: {reason}")]
    InvalidServiceUrl {
        service: &'static str,
        url: String,
        reason: String,
    },
    #[error("web domain '{0}' must be an absolute http(s) URL")]
    InvalidWebDomain(String),
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("GATEWAY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_REQUEST_TIMEOUT_MS") {
            self.server.request_timeout_ms = v.parse().unwrap_or(self.server.request_timeout_ms);
        }

        // Web overrides
        if let Ok(v) = env::var("WEB_DOMAIN") {
            self.web.domain = v.trim_end_matches('/').to_string();
        }

        // Downstream service overrides
        let urls: [(&str, &mut String); 9] = [
            ("AUTH_SERVICE_URL", &mut self.services.auth_url),
            ("DIRECTORY_SERVICE_URL", &mut self.services.directory_url),
            ("THREADING_SERVICE_URL", &mut self.services.threading_url),
            ("EXCOMMS_SERVICE_URL", &mut self.services.excomms_url),
            ("LAYOUT_SERVICE_URL", &mut self.services.layout_url),
            ("CARE_SERVICE_URL", &mut self.services.care_url),
            ("MEDIA_SERVICE_URL", &mut self.services.media_url),
            ("PAYMENTS_SERVICE_URL", &mut self.services.payments_url),
            ("PATIENTSYNC_SERVICE_URL", &mut self.services.patientsync_url),
        ];
        for (key, target) in urls {
            if let Ok(v) = env::var(key) {
                *target = v;
            }
        }
        if let Ok(v) = env::var("SERVICES_TIMEOUT_MS") {
            self.services.timeout_ms = v.parse().unwrap_or(self.services.timeout_ms);
        }

        // Access overrides
        if let Ok(v) = env::var("ACCESS_RESOURCE_MAP_SCOPE") {
            match v.as_str() {
                "process" => self.access.resource_map_scope = ResourceMapScope::Process,
                "request" => self.access.resource_map_scope = ResourceMapScope::Request,
                other => tracing::warn!("Ignoring unknown ACCESS_RESOURCE_MAP_SCOPE '{}'", other),
            }
        }

        // Dispatch overrides
        if let Ok(v) = env::var("DISPATCH_MODE") {
            match v.as_str() {
                "background" => self.dispatch.mode = DispatchMode::Background,
                "inline" => self.dispatch.mode = DispatchMode::Inline,
                other => tracing::warn!("Ignoring unknown DISPATCH_MODE '{}'", other),
            }
        }

        // Feature overrides
        if let Ok(v) = env::var("FEATURE_VIDEO_CALLING_ORGS") {
            self.features.video_calling_org_ids = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Reject configurations the gateway cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.web.domain.starts_with("http://") || self.web.domain.starts_with("https://")) {
            return Err(ConfigError::InvalidWebDomain(self.web.domain.clone()));
        }
        for (service, url) in self.services.urls() {
            url::Url::parse(url).map_err(|e| ConfigError::InvalidServiceUrl {
                service,
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        }
        if self.services.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("SERVICES_TIMEOUT_MS"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("SERVER_REQUEST_TIMEOUT_MS"));
        }
        Ok(())
    }

    fn local_services() -> ServicesConfig {
        ServicesConfig {
            auth_url: "http://localhost:50051/auth/".to_string(),
            directory_url: "http://localhost:50052/directory/".to_string(),
            threading_url: "http://localhost:50053/threading/".to_string(),
            excomms_url: "http://localhost:50054/excomms/".to_string(),
            layout_url: "http://localhost:50055/layout/".to_string(),
            care_url: "http://localhost:50056/care/".to_string(),
            media_url: "http://localhost:50057/media/".to_string(),
            payments_url: "http://localhost:50058/payments/".to_string(),
            patientsync_url: "http://localhost:50059/patientsync/".to_string(),
            timeout_ms: 10_000,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                request_timeout_ms: 30_000,
            },
            web: WebConfig {
                domain: "http://localhost:8443".to_string(),
            },
            services: Self::local_services(),
            access: AccessConfig {
                resource_map_scope: ResourceMapScope::Request,
            },
            dispatch: DispatchConfig {
                mode: DispatchMode::Background,
            },
            features: FeatureConfig {
                video_calling_org_ids: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8080,
                request_timeout_ms: 15_000,
            },
            web: WebConfig {
                domain: "https://staging.example.com".to_string(),
            },
            services: ServicesConfig {
                timeout_ms: 5_000,
                ..Self::local_services()
            },
            access: AccessConfig {
                resource_map_scope: ResourceMapScope::Process,
            },
            dispatch: DispatchConfig {
                mode: DispatchMode::Background,
            },
            features: FeatureConfig {
                video_calling_org_ids: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8080,
                request_timeout_ms: 10_000,
            },
            web: WebConfig {
                domain: "https://app.example.com".to_string(),
            },
            services: ServicesConfig {
                timeout_ms: 3_000,
                ..Self::local_services()
            },
            access: AccessConfig {
                resource_map_scope: ResourceMapScope::Process,
            },
            dispatch: DispatchConfig {
                mode: DispatchMode::Background,
            },
            features: FeatureConfig {
                video_calling_org_ids: Vec::new(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        $crate::config::CONFIG.environment.is_production()
    };
}
