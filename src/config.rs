use std::time::Duration;

use crate::engine::Color;

/// Which move picker the computer side uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStrategy {
    /// Prefer valuable captures, then safe moves.
    Capture,
    /// Any legal move.
    Random,
}

impl AiStrategy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capture" => Some(AiStrategy::Capture),
            "random" => Some(AiStrategy::Random),
            _ => None,
        }
    }
}

/// Front-end configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Whether the computer plays one side.
    pub ai_enabled: bool,
    /// Side the computer plays.
    pub ai_color: Color,
    pub ai_strategy: AiStrategy,
    /// Pause before the computer answers a human move.
    pub ai_delay_ms: u64,
    /// Seed for reproducible games. Entropy-seeded when absent.
    pub ai_seed: Option<u64>,
    /// Unicode glyphs instead of ASCII letters.
    pub unicode: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Values that fail
    /// to parse fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            ai_enabled: lookup("CHESS_AI_ENABLED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.ai_enabled),
            ai_color: lookup("CHESS_AI_COLOR")
                .and_then(|v| parse_color(&v))
                .unwrap_or(defaults.ai_color),
            ai_strategy: lookup("CHESS_AI_STRATEGY")
                .and_then(|v| AiStrategy::parse(&v))
                .unwrap_or(defaults.ai_strategy),
            ai_delay_ms: lookup("CHESS_AI_DELAY_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.ai_delay_ms),
            ai_seed: lookup("CHESS_AI_SEED").and_then(|v| v.trim().parse().ok()),
            unicode: lookup("CHESS_UNICODE")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.unicode),
        }
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            ai_enabled: true,
            ai_color: Color::Black,
            ai_strategy: AiStrategy::Capture,
            ai_delay_ms: 500,
            ai_seed: None,
            unicode: true,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_color(s: &str) -> Option<Color> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Some(Color::White),
        "black" | "b" => Some(Color::Black),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert!(config.ai_enabled);
        assert_eq!(config.ai_color, Color::Black);
        assert_eq!(config.ai_strategy, AiStrategy::Capture);
        assert_eq!(config.ai_delay(), Duration::from_millis(500));
        assert_eq!(config.ai_seed, None);
        assert!(config.unicode);
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = config_from(&[]);
        assert!(config.ai_enabled);
        assert_eq!(config.ai_color, Color::Black);
        assert_eq!(config.ai_delay_ms, 500);
    }

    #[test]
    fn values_are_read() {
        let config = config_from(&[
            ("CHESS_AI_ENABLED", "false"),
            ("CHESS_AI_COLOR", "White"),
            ("CHESS_AI_STRATEGY", "random"),
            ("CHESS_AI_DELAY_MS", "0"),
            ("CHESS_AI_SEED", "42"),
            ("CHESS_UNICODE", "0"),
        ]);
        assert!(!config.ai_enabled);
        assert_eq!(config.ai_color, Color::White);
        assert_eq!(config.ai_strategy, AiStrategy::Random);
        assert_eq!(config.ai_delay_ms, 0);
        assert_eq!(config.ai_seed, Some(42));
        assert!(!config.unicode);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = config_from(&[
            ("CHESS_AI_ENABLED", "maybe"),
            ("CHESS_AI_COLOR", "green"),
            ("CHESS_AI_STRATEGY", "minimax"),
            ("CHESS_AI_DELAY_MS", "-5"),
            ("CHESS_AI_SEED", "seed"),
        ]);
        assert!(config.ai_enabled);
        assert_eq!(config.ai_color, Color::Black);
        assert_eq!(config.ai_strategy, AiStrategy::Capture);
        assert_eq!(config.ai_delay_ms, 500);
        assert_eq!(config.ai_seed, None);
    }
}
