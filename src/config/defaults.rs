pub(crate) fn default_window_width() -> f32 {
    1280.0
}

pub(crate) fn default_window_height() -> f32 {
    900.0
}

pub(crate) fn default_media_base_url() -> String {
    String::new()
}

pub(crate) fn default_engine_sources() -> Vec<String> {
    vec!["builtin".to_string()]
}

pub(crate) fn default_engine_load_timeout_secs() -> f32 {
    8.0
}

pub(crate) fn default_engine_settle_delay_ms() -> u64 {
    150
}

pub(crate) fn default_nav_hide_delay_secs() -> f32 {
    3.0
}

pub(crate) fn default_magnifier_zoom() -> f32 {
    2.0
}

pub(crate) fn default_lens_diameter() -> f32 {
    180.0
}

pub(crate) fn default_flip_duration_ms() -> u64 {
    1000
}

pub(crate) fn default_max_shadow_opacity() -> f32 {
    0.5
}

pub(crate) fn default_show_cover() -> bool {
    true
}

pub(crate) fn default_swipe_distance() -> f32 {
    30.0
}

pub(crate) fn default_pointer_flip() -> bool {
    true
}

pub(crate) fn default_prefetch_radius() -> usize {
    2
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
