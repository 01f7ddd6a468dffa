use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub window_pos_x: Option<f32>,
    #[serde(default)]
    pub window_pos_y: Option<f32>,
    /// Base URL page images are served from when the manifest does not
    /// carry resolved URLs. Empty means "next to the manifest".
    #[serde(default = "crate::config::defaults::default_media_base_url")]
    pub media_base_url: String,
    /// Ordered candidate sources for the page-flip engine.
    #[serde(default = "crate::config::defaults::default_engine_sources")]
    pub engine_sources: Vec<String>,
    #[serde(default = "crate::config::defaults::default_engine_load_timeout_secs")]
    pub engine_load_timeout_secs: f32,
    #[serde(default = "crate::config::defaults::default_engine_settle_delay_ms")]
    pub engine_settle_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_nav_hide_delay_secs")]
    pub nav_hide_delay_secs: f32,
    #[serde(default = "crate::config::defaults::default_magnifier_zoom")]
    pub magnifier_zoom: f32,
    #[serde(default = "crate::config::defaults::default_lens_diameter")]
    pub lens_diameter: f32,
    #[serde(default = "crate::config::defaults::default_flip_duration_ms")]
    pub flip_duration_ms: u64,
    #[serde(default = "crate::config::defaults::default_max_shadow_opacity")]
    pub max_shadow_opacity: f32,
    #[serde(default = "crate::config::defaults::default_show_cover")]
    pub show_cover: bool,
    #[serde(default = "crate::config::defaults::default_swipe_distance")]
    pub swipe_distance: f32,
    #[serde(default = "crate::config::defaults::default_pointer_flip")]
    pub pointer_flip: bool,
    #[serde(default = "crate::config::defaults::default_prefetch_radius")]
    pub prefetch_radius: usize,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Day,
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            window_pos_x: None,
            window_pos_y: None,
            media_base_url: crate::config::defaults::default_media_base_url(),
            engine_sources: crate::config::defaults::default_engine_sources(),
            engine_load_timeout_secs: crate::config::defaults::default_engine_load_timeout_secs(),
            engine_settle_delay_ms: crate::config::defaults::default_engine_settle_delay_ms(),
            nav_hide_delay_secs: crate::config::defaults::default_nav_hide_delay_secs(),
            magnifier_zoom: crate::config::defaults::default_magnifier_zoom(),
            lens_diameter: crate::config::defaults::default_lens_diameter(),
            flip_duration_ms: crate::config::defaults::default_flip_duration_ms(),
            max_shadow_opacity: crate::config::defaults::default_max_shadow_opacity(),
            show_cover: crate::config::defaults::default_show_cover(),
            swipe_distance: crate::config::defaults::default_swipe_distance(),
            pointer_flip: crate::config::defaults::default_pointer_flip(),
            prefetch_radius: crate::config::defaults::default_prefetch_radius(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    Night,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Day
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
