use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with TNL_ prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub swagger: SwaggerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub geographies: GeographiesConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub qr: QrConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin.
    /// Accepts either an array or comma-separated string.
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize origins from comma-separated string or array, filtering empty values.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwaggerConfig {
    /// Enable Swagger UI at /swagger-ui.
    /// Enable in development via `TNL_SWAGGER__ENABLED=true`
    #[serde(default)]
    pub enabled: bool,
}

/// Settings for the shared outbound HTTP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds. Unset means the client default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent sent upstream. Nominatim rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Which geocoding provider answers address lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderBackend {
    /// US Census Bureau `onelineaddress` endpoint.
    #[default]
    Census,
    /// OpenStreetMap Nominatim search.
    Nominatim,
    /// OpenCage forward geocoding (requires an API key).
    OpenCage,
    /// Offline simulation returning fixed coordinates.
    Demo,
}

impl GeocoderBackend {
    /// Public endpoint used when `geocoder.base_url` is not set.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Census => "https://geocoding.geo.census.gov",
            Self::Nominatim => "https://nominatim.openstreetmap.org",
            Self::OpenCage => "https://api.opencagedata.com",
            Self::Demo => "",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    /// Provider used for address lookups.
    #[serde(default)]
    pub backend: GeocoderBackend,

    /// Override for the provider's base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Census address benchmark.
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    /// OpenCage API key (required when backend is `opencage`).
    #[serde(default)]
    pub api_key: String,

    /// CORS relay prefix prepended to the full request URL.
    #[serde(default)]
    pub relay: Option<String>,

    /// Latitude returned by the demo backend.
    #[serde(default = "default_demo_latitude")]
    pub demo_latitude: f64,

    /// Longitude returned by the demo backend.
    #[serde(default = "default_demo_longitude")]
    pub demo_longitude: f64,
}

impl GeocoderConfig {
    /// Base URL after applying the per-backend default.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: GeocoderBackend::default(),
            base_url: None,
            benchmark: default_benchmark(),
            api_key: String::new(),
            relay: None,
            demo_latitude: default_demo_latitude(),
            demo_longitude: default_demo_longitude(),
        }
    }
}

/// Census geographies endpoint used to turn a point into districts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeographiesConfig {
    /// Resolve districts after geocoding. Ignored by the demo backend.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_census_url")]
    pub base_url: String,

    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    #[serde(default = "default_vintage")]
    pub vintage: String,

    /// CORS relay prefix prepended to the full request URL.
    #[serde(default)]
    pub relay: Option<String>,
}

impl Default for GeographiesConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_census_url(),
            benchmark: default_benchmark(),
            vintage: default_vintage(),
            relay: None,
        }
    }
}

/// Tennessee General Assembly legislator directory pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_senate_url")]
    pub senate_url: String,

    #[serde(default = "default_house_url")]
    pub house_url: String,

    /// Site root joined to relative legislator photo paths.
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,

    /// CORS relay prefix prepended to each directory URL.
    #[serde(default)]
    pub relay: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            senate_url: default_senate_url(),
            house_url: default_house_url(),
            site_base_url: default_site_base_url(),
            relay: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Pick a random legislator when no district matches.
    /// Default: false. Results produced this way are placeholders, not
    /// tied to the address; only enable for demos.
    #[serde(default)]
    pub demo_random_fallback: bool,
}

/// External QR rendering endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QrConfig {
    #[serde(default = "default_qr_url")]
    pub base_url: String,

    /// Square image edge in pixels.
    #[serde(default = "default_qr_size")]
    pub size: u32,

    #[serde(default = "default_qr_margin")]
    pub margin: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            base_url: default_qr_url(),
            size: default_qr_size(),
            margin: default_qr_margin(),
        }
    }
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    vec![]
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("tnlegis-api/{}", env!("CARGO_PKG_VERSION"))
}

fn default_census_url() -> String {
    GeocoderBackend::Census.default_base_url().to_string()
}

fn default_benchmark() -> String {
    "Public_AR_Current".to_string()
}

fn default_vintage() -> String {
    "Current_Current".to_string()
}

// Tennessee State Capitol
#[allow(clippy::missing_const_for_fn)]
fn default_demo_latitude() -> f64 {
    36.1658
}

#[allow(clippy::missing_const_for_fn)]
fn default_demo_longitude() -> f64 {
    -86.7844
}

fn default_senate_url() -> String {
    "https://wapp.capitol.tn.gov/apps/LegislatorInfo/directory.aspx?chamber=S".to_string()
}

fn default_house_url() -> String {
    "https://wapp.capitol.tn.gov/apps/LegislatorInfo/directory.aspx?chamber=H".to_string()
}

fn default_site_base_url() -> String {
    "https://wapp.capitol.tn.gov".to_string()
}

fn default_qr_url() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_qr_size() -> u32 {
    200
}

#[allow(clippy::missing_const_for_fn)]
fn default_qr_margin() -> u32 {
    10
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn require_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must start with http:// or https://, got: '{value}'"
        )))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with TNL_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("TNL_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        for origin in &self.cors.allowed_origins {
            if origin != "*" && !is_http_url(origin) {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. \
                     Must be '*' or start with http:// or https://"
                )));
            }
        }

        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs cannot be 0 (leave unset for no timeout)".into(),
            ));
        }

        if self.geocoder.backend != GeocoderBackend::Demo {
            require_http_url("geocoder.base_url", self.geocoder.effective_base_url())?;
        }

        if self.geocoder.backend == GeocoderBackend::OpenCage && self.geocoder.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "geocoder.api_key is required for the opencage backend. \
                 Set TNL_GEOCODER__API_KEY or configure in config.yaml."
                    .into(),
            ));
        }

        if self.geographies.enabled {
            require_http_url("geographies.base_url", &self.geographies.base_url)?;
        }

        require_http_url("directory.senate_url", &self.directory.senate_url)?;
        require_http_url("directory.house_url", &self.directory.house_url)?;
        require_http_url("directory.site_base_url", &self.directory.site_base_url)?;
        require_http_url("qr.base_url", &self.qr.base_url)?;

        if self.qr.size == 0 {
            return Err(ConfigError::Validation("qr.size cannot be 0".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.geocoder.backend, GeocoderBackend::Census);
        assert_eq!(
            config.geocoder.effective_base_url(),
            "https://geocoding.geo.census.gov"
        );
        assert_eq!(config.geocoder.benchmark, "Public_AR_Current");
        assert_eq!(config.geographies.vintage, "Current_Current");
        assert!(config.geographies.enabled);
        assert!(!config.matching.demo_random_fallback);
        assert_eq!(config.qr.size, 200);
        assert_eq!(config.qr.margin, 10);
        assert!(config.http.timeout_secs.is_none());
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_base_url_override_wins() {
        let mut config = Config::default();
        config.geocoder.base_url = Some("http://localhost:9000".into());
        assert_eq!(
            config.geocoder.effective_base_url(),
            "http://localhost:9000"
        );
    }

    #[test]
    fn test_opencage_requires_api_key() {
        let mut config = Config::default();
        config.geocoder.backend = GeocoderBackend::OpenCage;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("geocoder.api_key"));

        config.geocoder.api_key = "key".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_backend_needs_no_base_url() {
        let mut config = Config::default();
        config.geocoder.backend = GeocoderBackend::Demo;
        assert_eq!(config.geocoder.effective_base_url(), "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_directory_url() {
        let mut config = Config::default();
        config.directory.house_url = "wapp.capitol.tn.gov".into();
        let result = config.validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("directory.house_url"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.http.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_deserializes_lowercase() {
        let json = r#"{"backend": "opencage", "api_key": "k"}"#;
        let config: GeocoderConfig = serde_json::from_str(json).expect("should parse");
        assert_eq!(config.backend, GeocoderBackend::OpenCage);
        assert_eq!(config.benchmark, "Public_AR_Current");
    }

    #[test]
    fn test_cors_deserialize_comma_separated_string() {
        let json = r#"{"allowed_origins": "http://localhost:5173,https://app.example.com"}"#;
        let config: CorsConfig = serde_json::from_str(json).expect("should parse");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_cors_deserialize_empty_string() {
        let json = r#"{"allowed_origins": ""}"#;
        let config: CorsConfig = serde_json::from_str(json).expect("should parse");
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
geocoder:
  backend: nominatim
matching:
  demo_random_fallback: true
",
            )?;
            jail.set_env("TNL_SERVER__PORT", "9090");
            jail.set_env("TNL_GEOCODER__BACKEND", "demo");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.geocoder.backend, GeocoderBackend::Demo);
            assert!(config.matching.demo_random_fallback);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TNL_QR__SIZE", "0");
            let result = Config::load();
            assert!(result.unwrap_err().to_string().contains("qr.size"));
            Ok(())
        });
    }

    #[test]
    fn port_boundaries() {
        let cases = [
            (0u16, false, "zero port"),
            (1, true, "minimum valid port"),
            (8080, true, "default port"),
            (65535, true, "maximum port"),
        ];

        for (port, should_pass, desc) in cases {
            let mut config = Config::default();
            config.server.port = port;
            let result = config.validate();
            assert_eq!(result.is_ok(), should_pass, "case '{}': {:?}", desc, result);
        }
    }

    #[test]
    fn cors_origin_boundaries() {
        let cases = [
            (vec!["*"], true, "wildcard"),
            (vec!["http://localhost"], true, "http localhost"),
            (vec!["https://example.com"], true, "https domain"),
            (vec![], true, "empty list"),
            (vec!["ftp://files.com"], false, "ftp scheme"),
            (vec!["localhost"], false, "no scheme"),
        ];

        for (origins, should_pass, desc) in cases {
            let mut config = Config::default();
            config.cors.allowed_origins = origins.into_iter().map(String::from).collect();
            let result = config.validate();
            assert_eq!(result.is_ok(), should_pass, "case '{}': {:?}", desc, result);
        }
    }
}
