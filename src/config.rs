use crate::constants::*;
use crate::models::{GeoPoint, RoutingProfile};
use std::env;
use std::fmt;
use std::str::FromStr;

/// How many interior waypoints a generated polygon gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    /// Uniform in `min..=max`
    Random { min: usize, max: usize },
    Fixed(usize),
}

impl Default for PointCount {
    fn default() -> Self {
        PointCount::Random {
            min: MIN_RANDOM_POINT_COUNT,
            max: MAX_RANDOM_POINT_COUNT,
        }
    }
}

impl PointCount {
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            PointCount::Random { min, max } => (min, max),
            PointCount::Fixed(n) => (n, n),
        }
    }
}

impl FromStr for PointCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("random") {
            return Ok(PointCount::default());
        }
        let n: usize = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid point count: {}. Use 'random' or a number", s))?;
        if n < MIN_POINT_COUNT {
            return Err(format!(
                "Point count must be at least {}, got {}",
                MIN_POINT_COUNT, n
            ));
        }
        // The closed polygon adds the center twice
        if n > MAX_WAYPOINTS - 2 {
            return Err(format!(
                "Point count must be at most {}, got {}",
                MAX_WAYPOINTS - 2,
                n
            ));
        }
        Ok(PointCount::Fixed(n))
    }
}

impl fmt::Display for PointCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointCount::Random { min, max } => write!(f, "random({}..={})", min, max),
            PointCount::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// What to do with the rest of a batch after one attempt fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Keep the loops already added and skip the remaining attempts
    #[default]
    AbortRemaining,
    /// Keep going with fresh polygons
    ContinueRemaining,
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(BatchPolicy::AbortRemaining),
            "continue" => Ok(BatchPolicy::ContinueRemaining),
            _ => Err(format!(
                "Invalid batch policy: {}. Use 'abort' or 'continue'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub nominatim_base_url: String,
    pub osrm_base_url: String,
    pub routing_profile: RoutingProfile,
    pub user_agent: String,
    /// No timeout when unset
    pub http_timeout_secs: Option<u64>,
    pub geocode_cache_ttl: u64,
    pub map_center: GeoPoint,
    pub map_zoom: u8,
    pub loop_generator: LoopGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct LoopGeneratorConfig {
    /// Polygon perimeter as a fraction of the requested distance
    pub circumference_factor: f64,

    pub point_count: PointCount,

    /// Loops per batch when a request does not specify a count
    pub batch_size: usize,

    /// Length of the recent-loops list
    pub recent_limit: usize,

    pub batch_policy: BatchPolicy,
}

impl Default for LoopGeneratorConfig {
    fn default() -> Self {
        Self {
            circumference_factor: DEFAULT_CIRCUMFERENCE_FACTOR,
            point_count: PointCount::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            recent_limit: DEFAULT_RECENT_LIMIT,
            batch_policy: BatchPolicy::default(),
        }
    }
}

impl LoopGeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let circumference_factor: f64 = env::var("LOOP_CIRCUMFERENCE_FACTOR")
            .unwrap_or_else(|_| defaults.circumference_factor.to_string())
            .parse()
            .map_err(|_| "Invalid LOOP_CIRCUMFERENCE_FACTOR")?;

        if !(circumference_factor > 0.0 && circumference_factor <= 2.0) {
            return Err("LOOP_CIRCUMFERENCE_FACTOR must be in (0, 2]".to_string());
        }

        let batch_size: usize = env::var("LOOP_BATCH_SIZE")
            .unwrap_or_else(|_| defaults.batch_size.to_string())
            .parse()
            .map_err(|_| "Invalid LOOP_BATCH_SIZE")?;

        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(format!(
                "LOOP_BATCH_SIZE must be between 1 and {}",
                MAX_BATCH_SIZE
            ));
        }

        Ok(Self {
            circumference_factor,
            point_count: match env::var("LOOP_POINT_COUNT") {
                Ok(value) => value
                    .parse()
                    .map_err(|e| format!("Invalid LOOP_POINT_COUNT: {}", e))?,
                Err(_) => defaults.point_count,
            },
            batch_size,
            recent_limit: env::var("LOOP_RECENT_LIMIT")
                .unwrap_or_else(|_| defaults.recent_limit.to_string())
                .parse()
                .map_err(|_| "Invalid LOOP_RECENT_LIMIT")?,
            batch_policy: env::var("LOOP_BATCH_POLICY")
                .unwrap_or_else(|_| "abort".to_string())
                .parse()?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let map_lat: f64 = env::var("MAP_DEFAULT_LAT")
            .unwrap_or_else(|_| DEFAULT_MAP_CENTER_LAT.to_string())
            .parse()
            .map_err(|_| "Invalid MAP_DEFAULT_LAT")?;
        let map_lng: f64 = env::var("MAP_DEFAULT_LNG")
            .unwrap_or_else(|_| DEFAULT_MAP_CENTER_LNG.to_string())
            .parse()
            .map_err(|_| "Invalid MAP_DEFAULT_LNG")?;
        let map_center = GeoPoint::new(map_lat, map_lng)
            .map_err(|e| format!("Invalid default map center: {}", e))?;

        let http_timeout_secs: Option<u64> = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => Some(value.parse().map_err(|_| "Invalid HTTP_TIMEOUT_SECS")?),
            Err(_) => None,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            nominatim_base_url: env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_BASE_URL.to_string()),
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OSRM_BASE_URL.to_string()),
            routing_profile: env::var("ROUTING_PROFILE")
                .unwrap_or_else(|_| "pedestrian".to_string())
                .parse()?,
            user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
            http_timeout_secs,
            geocode_cache_ttl: env::var("GEOCODE_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_TTL")?,
            map_center,
            map_zoom: env::var("MAP_DEFAULT_ZOOM")
                .unwrap_or_else(|_| DEFAULT_MAP_ZOOM.to_string())
                .parse()
                .map_err(|_| "Invalid MAP_DEFAULT_ZOOM")?,
            loop_generator: LoopGeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Nominatim's usage policy requires an identifying User-Agent.
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const LOOP_VARS: [&str; 5] = [
        "LOOP_CIRCUMFERENCE_FACTOR",
        "LOOP_POINT_COUNT",
        "LOOP_BATCH_SIZE",
        "LOOP_RECENT_LIMIT",
        "LOOP_BATCH_POLICY",
    ];

    fn clear_loop_vars() {
        for var in LOOP_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_point_count_parsing() {
        assert_eq!("random".parse::<PointCount>().unwrap(), PointCount::default());
        assert_eq!("RANDOM".parse::<PointCount>().unwrap(), PointCount::default());
        assert_eq!("6".parse::<PointCount>().unwrap(), PointCount::Fixed(6));
        assert!("2".parse::<PointCount>().is_err());
        assert_eq!("23".parse::<PointCount>().unwrap(), PointCount::Fixed(23));
        assert!("24".parse::<PointCount>().is_err());
        assert!("30".parse::<PointCount>().is_err());
        assert!("many".parse::<PointCount>().is_err());
        assert_eq!(PointCount::default().bounds(), (5, 9));
        assert_eq!(PointCount::Fixed(6).bounds(), (6, 6));
    }

    #[test]
    fn test_batch_policy_parsing() {
        assert_eq!(
            "abort".parse::<BatchPolicy>().unwrap(),
            BatchPolicy::AbortRemaining
        );
        assert_eq!(
            "Continue".parse::<BatchPolicy>().unwrap(),
            BatchPolicy::ContinueRemaining
        );
        assert!("retry".parse::<BatchPolicy>().is_err());
    }

    #[test]
    #[serial]
    fn test_loop_config_defaults() {
        clear_loop_vars();
        let config = LoopGeneratorConfig::from_env().unwrap();

        assert_eq!(config.circumference_factor, 0.5);
        assert_eq!(config.point_count, PointCount::Random { min: 5, max: 9 });
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.recent_limit, 6);
        assert_eq!(config.batch_policy, BatchPolicy::AbortRemaining);
    }

    #[test]
    #[serial]
    fn test_loop_config_overrides() {
        clear_loop_vars();
        env::set_var("LOOP_POINT_COUNT", "6");
        env::set_var("LOOP_BATCH_SIZE", "5");
        env::set_var("LOOP_BATCH_POLICY", "continue");

        let config = LoopGeneratorConfig::from_env().unwrap();
        assert_eq!(config.point_count, PointCount::Fixed(6));
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.batch_policy, BatchPolicy::ContinueRemaining);

        clear_loop_vars();
    }

    #[test]
    #[serial]
    fn test_loop_config_rejects_invalid_values() {
        clear_loop_vars();
        env::set_var("LOOP_BATCH_SIZE", "0");
        assert!(LoopGeneratorConfig::from_env().is_err());

        clear_loop_vars();
        env::set_var("LOOP_CIRCUMFERENCE_FACTOR", "-1");
        assert!(LoopGeneratorConfig::from_env().is_err());

        clear_loop_vars();
        env::set_var("LOOP_POINT_COUNT", "1");
        let err = LoopGeneratorConfig::from_env().unwrap_err();
        assert!(err.contains("LOOP_POINT_COUNT"));

        clear_loop_vars();
    }

    #[test]
    fn test_default_user_agent() {
        assert!(default_user_agent().starts_with("easyloop/"));
    }
}
