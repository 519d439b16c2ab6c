//! Configuration: the injected [`ConfigSource`] seam and the typed
//! [`HeaderConfig`] the header reads from it.
//!
//! Every lookup goes through one source passed in at construction. Missing or
//! malformed values never reach the caller: [`HeaderConfig::load`] falls back
//! to the documented default and logs what happened.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Keys the header reads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    CollapsedHeight,
    ExpandedHeight,
    ClockCollapsedSize,
    ClockExpandedSize,
    AvatarCollapsedSize,
    AvatarExpandedSize,
    MultiUserWidthCollapsed,
    MultiUserWidthExpanded,
    MultiUserMarginCollapsed,
    MultiUserMarginExpanded,
    ClockMarginBottomCollapsed,
    ClockMarginBottomExpanded,
    ShowWeather,
    ShowWeatherHeader,
    ShowTaskManager,
    BatteryStyle,
    ShowBatteryPercent,
    CrossFadeMs,
    RevealMs,
    WeatherRefreshDelayMs,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 20] = [
        ConfigKey::CollapsedHeight,
        ConfigKey::ExpandedHeight,
        ConfigKey::ClockCollapsedSize,
        ConfigKey::ClockExpandedSize,
        ConfigKey::AvatarCollapsedSize,
        ConfigKey::AvatarExpandedSize,
        ConfigKey::MultiUserWidthCollapsed,
        ConfigKey::MultiUserWidthExpanded,
        ConfigKey::MultiUserMarginCollapsed,
        ConfigKey::MultiUserMarginExpanded,
        ConfigKey::ClockMarginBottomCollapsed,
        ConfigKey::ClockMarginBottomExpanded,
        ConfigKey::ShowWeather,
        ConfigKey::ShowWeatherHeader,
        ConfigKey::ShowTaskManager,
        ConfigKey::BatteryStyle,
        ConfigKey::ShowBatteryPercent,
        ConfigKey::CrossFadeMs,
        ConfigKey::RevealMs,
        ConfigKey::WeatherRefreshDelayMs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::CollapsedHeight => "header_height_collapsed",
            ConfigKey::ExpandedHeight => "header_height_expanded",
            ConfigKey::ClockCollapsedSize => "clock_size_collapsed",
            ConfigKey::ClockExpandedSize => "clock_size_expanded",
            ConfigKey::AvatarCollapsedSize => "avatar_size_collapsed",
            ConfigKey::AvatarExpandedSize => "avatar_size_expanded",
            ConfigKey::MultiUserWidthCollapsed => "multi_user_width_collapsed",
            ConfigKey::MultiUserWidthExpanded => "multi_user_width_expanded",
            ConfigKey::MultiUserMarginCollapsed => "multi_user_margin_collapsed",
            ConfigKey::MultiUserMarginExpanded => "multi_user_margin_expanded",
            ConfigKey::ClockMarginBottomCollapsed => "clock_margin_bottom_collapsed",
            ConfigKey::ClockMarginBottomExpanded => "clock_margin_bottom_expanded",
            ConfigKey::ShowWeather => "show_weather",
            ConfigKey::ShowWeatherHeader => "show_weather_header",
            ConfigKey::ShowTaskManager => "enable_task_manager",
            ConfigKey::BatteryStyle => "battery_style",
            ConfigKey::ShowBatteryPercent => "show_battery_percent",
            ConfigKey::CrossFadeMs => "overlay_cross_fade_ms",
            ConfigKey::RevealMs => "weather_reveal_ms",
            ConfigKey::WeatherRefreshDelayMs => "weather_refresh_delay_ms",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw value held by a [`ConfigSource`]
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(value.into())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no value for `{0}`")]
    Missing(ConfigKey),
    #[error("`{key}` holds {found:?}, expected {expected}")]
    TypeMismatch {
        key: ConfigKey,
        expected: &'static str,
        found: ConfigValue,
    },
    #[error("`{key}` holds unparsable text {text:?}")]
    Parse { key: ConfigKey, text: String },
}

/// Conversion from a raw [`ConfigValue`]
pub trait FromConfigValue: Sized {
    const EXPECTED: &'static str;

    fn from_config_value(key: ConfigKey, value: ConfigValue) -> Result<Self, ConfigError>;
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "a boolean";

    // Integer flags follow the settings-store convention: 1 is on.
    fn from_config_value(key: ConfigKey, value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Bool(b) => Ok(b),
            ConfigValue::Int(i) => Ok(i == 1),
            ConfigValue::Text(text) => match text.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::Parse { key, text }),
            },
            found => Err(ConfigError::TypeMismatch {
                key,
                expected: Self::EXPECTED,
                found,
            }),
        }
    }
}

impl FromConfigValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_config_value(key: ConfigKey, value: ConfigValue) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Int(i) => Ok(i),
            ConfigValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse { key, text }),
            found => Err(ConfigError::TypeMismatch {
                key,
                expected: Self::EXPECTED,
                found,
            }),
        }
    }
}

impl FromConfigValue for f32 {
    const EXPECTED: &'static str = "a number";

    fn from_config_value(key: ConfigKey, value: ConfigValue) -> Result<Self, ConfigError> {
        let parsed = match value {
            ConfigValue::Float(f) => f as f32,
            ConfigValue::Int(i) => i as f32,
            ConfigValue::Text(ref text) => text
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse {
                    key,
                    text: text.clone(),
                })?,
            found => {
                return Err(ConfigError::TypeMismatch {
                    key,
                    expected: Self::EXPECTED,
                    found,
                })
            }
        };
        if parsed.is_finite() {
            Ok(parsed)
        } else {
            Err(ConfigError::Parse {
                key,
                text: parsed.to_string(),
            })
        }
    }
}

/// Key-value store the header reads its configuration from.
///
/// Change notification is polled: the header drains `take_changes` once per
/// tick and reloads when anything changed.
pub trait ConfigSource {
    fn value(&self, key: ConfigKey) -> Option<ConfigValue>;

    /// Keys changed since the last call
    fn take_changes(&mut self) -> Vec<ConfigKey> {
        Vec::new()
    }

    fn get_bool(&self, key: ConfigKey, default: bool) -> bool {
        get_or(self, key, default)
    }

    fn get_int(&self, key: ConfigKey, default: i64) -> i64 {
        get_or(self, key, default)
    }

    fn get_float(&self, key: ConfigKey, default: f32) -> f32 {
        get_or(self, key, default)
    }
}

/// Typed lookup that reports why a value could not be used
pub fn try_get<T, S>(source: &S, key: ConfigKey) -> Result<T, ConfigError>
where
    T: FromConfigValue,
    S: ConfigSource + ?Sized,
{
    let value = source.value(key).ok_or(ConfigError::Missing(key))?;
    T::from_config_value(key, value)
}

/// Typed lookup falling back to `default` on any error
pub fn get_or<T, S>(source: &S, key: ConfigKey, default: T) -> T
where
    T: FromConfigValue,
    S: ConfigSource + ?Sized,
{
    match try_get(source, key) {
        Ok(value) => value,
        Err(err @ ConfigError::Missing(_)) => {
            log::debug!("{}; using default", err);
            default
        }
        Err(err) => {
            log::warn!("{}; using default", err);
            default
        }
    }
}

/// In-memory [`ConfigSource`] that records which keys were written
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<ConfigKey, ConfigValue>,
    changed: Vec<ConfigKey>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert that does not count as a change
    pub fn with(mut self, key: ConfigKey, value: impl Into<ConfigValue>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Write a value and queue a change notification
    pub fn set(&mut self, key: ConfigKey, value: impl Into<ConfigValue>) {
        self.values.insert(key, value.into());
        if !self.changed.contains(&key) {
            self.changed.push(key);
        }
    }

    pub fn remove(&mut self, key: ConfigKey) {
        if self.values.remove(&key).is_some() && !self.changed.contains(&key) {
            self.changed.push(key);
        }
    }
}

impl ConfigSource for MemoryConfig {
    fn value(&self, key: ConfigKey) -> Option<ConfigValue> {
        self.values.get(&key).cloned()
    }

    fn take_changes(&mut self) -> Vec<ConfigKey> {
        std::mem::take(&mut self.changed)
    }
}

/// Battery meter styles that already show the level as text
const BATTERY_STYLE_HIDDEN: i64 = 4;
const BATTERY_STYLE_TEXT: i64 = 6;

/// Typed header configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderConfig {
    pub collapsed_height: f32,
    pub expanded_height: f32,
    pub clock_collapsed_size: f32,
    pub clock_expanded_size: f32,
    pub avatar_collapsed_size: f32,
    pub avatar_expanded_size: f32,
    pub multi_user_width_collapsed: f32,
    pub multi_user_width_expanded: f32,
    pub multi_user_margin_collapsed: f32,
    pub multi_user_margin_expanded: f32,
    pub clock_margin_bottom_collapsed: f32,
    pub clock_margin_bottom_expanded: f32,
    /// Weather row in the expanded header
    pub show_weather: bool,
    /// Weather image and its detail panel
    pub show_weather_header: bool,
    pub show_task_manager: bool,
    /// Force the battery percentage text while expanded
    pub battery_text_expanded: bool,
    pub cross_fade_ms: f32,
    pub reveal_ms: f32,
    pub weather_refresh_delay_ms: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            collapsed_height: 200.0,
            expanded_height: 500.0,
            clock_collapsed_size: 42.0,
            clock_expanded_size: 70.0,
            avatar_collapsed_size: 36.0,
            avatar_expanded_size: 48.0,
            multi_user_width_collapsed: 48.0,
            multi_user_width_expanded: 64.0,
            multi_user_margin_collapsed: 8.0,
            multi_user_margin_expanded: 4.0,
            clock_margin_bottom_collapsed: 12.0,
            clock_margin_bottom_expanded: 20.0,
            show_weather: true,
            show_weather_header: false,
            show_task_manager: false,
            battery_text_expanded: true,
            cross_fade_ms: 300.0,
            reveal_ms: 300.0,
            weather_refresh_delay_ms: 2000.0,
        }
    }
}

impl HeaderConfig {
    /// Read every field from `source`, falling back to [`HeaderConfig::default`]
    pub fn load<S: ConfigSource + ?Sized>(source: &S) -> Self {
        let d = Self::default();

        let battery_style = source.get_int(ConfigKey::BatteryStyle, 0);
        let percent_elsewhere = source.get_int(ConfigKey::ShowBatteryPercent, 0) != 0;
        let battery_text_expanded = !percent_elsewhere
            && battery_style != BATTERY_STYLE_HIDDEN
            && battery_style != BATTERY_STYLE_TEXT;

        let config = Self {
            collapsed_height: non_negative(
                source.get_float(ConfigKey::CollapsedHeight, d.collapsed_height),
                d.collapsed_height,
            ),
            expanded_height: non_negative(
                source.get_float(ConfigKey::ExpandedHeight, d.expanded_height),
                d.expanded_height,
            ),
            clock_collapsed_size: source.get_float(ConfigKey::ClockCollapsedSize, d.clock_collapsed_size),
            clock_expanded_size: source.get_float(ConfigKey::ClockExpandedSize, d.clock_expanded_size),
            avatar_collapsed_size: source.get_float(ConfigKey::AvatarCollapsedSize, d.avatar_collapsed_size),
            avatar_expanded_size: source.get_float(ConfigKey::AvatarExpandedSize, d.avatar_expanded_size),
            multi_user_width_collapsed: source
                .get_float(ConfigKey::MultiUserWidthCollapsed, d.multi_user_width_collapsed),
            multi_user_width_expanded: source
                .get_float(ConfigKey::MultiUserWidthExpanded, d.multi_user_width_expanded),
            multi_user_margin_collapsed: source
                .get_float(ConfigKey::MultiUserMarginCollapsed, d.multi_user_margin_collapsed),
            multi_user_margin_expanded: source
                .get_float(ConfigKey::MultiUserMarginExpanded, d.multi_user_margin_expanded),
            clock_margin_bottom_collapsed: source
                .get_float(ConfigKey::ClockMarginBottomCollapsed, d.clock_margin_bottom_collapsed),
            clock_margin_bottom_expanded: source
                .get_float(ConfigKey::ClockMarginBottomExpanded, d.clock_margin_bottom_expanded),
            show_weather: source.get_bool(ConfigKey::ShowWeather, d.show_weather),
            show_weather_header: source.get_bool(ConfigKey::ShowWeatherHeader, d.show_weather_header),
            show_task_manager: source.get_bool(ConfigKey::ShowTaskManager, d.show_task_manager),
            battery_text_expanded,
            cross_fade_ms: non_negative(
                source.get_float(ConfigKey::CrossFadeMs, d.cross_fade_ms),
                d.cross_fade_ms,
            ),
            reveal_ms: non_negative(source.get_float(ConfigKey::RevealMs, d.reveal_ms), d.reveal_ms),
            weather_refresh_delay_ms: non_negative(
                source.get_float(ConfigKey::WeatherRefreshDelayMs, d.weather_refresh_delay_ms),
                d.weather_refresh_delay_ms,
            ),
        };

        if config.expanded_height < config.collapsed_height {
            log::warn!(
                "expanded height {} below collapsed height {}",
                config.expanded_height,
                config.collapsed_height
            );
        }
        config
    }

    pub fn show_weather_header(mut self, show: bool) -> Self {
        self.show_weather_header = show;
        self
    }

    pub fn show_task_manager(mut self, show: bool) -> Self {
        self.show_task_manager = show;
        self
    }

    /// Scale of the time text while collapsed, relative to its expanded size
    pub fn clock_collapsed_scale(&self) -> f32 {
        ratio_or_one(self.clock_collapsed_size, self.clock_expanded_size)
    }

    /// Scale of the avatar while collapsed, relative to its expanded size
    pub fn avatar_collapsed_scale(&self) -> f32 {
        ratio_or_one(self.avatar_collapsed_size, self.avatar_expanded_size)
    }
}

fn non_negative(value: f32, default: f32) -> f32 {
    if value >= 0.0 {
        value
    } else {
        log::warn!("negative config value {}; using default {}", value, default);
        default
    }
}

fn ratio_or_one(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 && numerator >= 0.0 {
        numerator / denominator
    } else {
        1.0
    }
}
