use tracing::warn;

pub const DEFAULT_TITLE: &str = "MIRROR SCENE";
pub const DEFAULT_BACKGROUND_COUNT: usize = 1000;
/// Background objects are scattered uniformly within +-spread/2 on each axis
pub const DEFAULT_SPREAD: f32 = 100.0;
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

/// Per-frame animation policy. Steps are per frame, not per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub camera_dolly_step: f32,
    pub camera_dolly_stop_z: f32,
    pub mirror_sweep_step: f32,
    pub mirror_lower_bound: f32,
    pub mirror_upper_bound: f32,
    pub background_drift_step: f32,
    pub even_spin_rate: f32,
    pub odd_spin_rate: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            camera_dolly_step: 0.01,
            camera_dolly_stop_z: 5.0,
            mirror_sweep_step: 0.0001,
            mirror_lower_bound: -1.0,
            mirror_upper_bound: 0.0,
            background_drift_step: 0.003,
            even_spin_rate: 0.4,
            odd_spin_rate: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub title: String,
    pub background_count: usize,
    pub spread: f32,
    pub seed: u64,
    pub debug: bool,
    pub animation: AnimationConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            background_count: DEFAULT_BACKGROUND_COUNT,
            spread: DEFAULT_SPREAD,
            seed: DEFAULT_SEED,
            debug: false,
            animation: AnimationConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Native configuration: SCENE_DEBUG, SCENE_SEED, SCENE_TITLE, SCENE_BACKGROUND_COUNT
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(v) = lookup("SCENE_DEBUG") {
            config.debug = is_truthy(&v);
        }
        if let Some(v) = lookup("SCENE_SEED") {
            config.seed = parse_or("SCENE_SEED", &v, config.seed);
        }
        if let Some(v) = lookup("SCENE_TITLE") {
            config.title = v;
        }
        if let Some(v) = lookup("SCENE_BACKGROUND_COUNT") {
            config.background_count = parse_or("SCENE_BACKGROUND_COUNT", &v, config.background_count);
        }
        config
    }

    /// Browser configuration: `debug` anywhere in the href shows the panel,
    /// `seed=<u64>` in the query picks the population seed
    pub fn from_url(href: &str) -> Self {
        let mut config = Self::default();
        config.debug = href.contains("debug");
        if let Some((_, query)) = href.split_once('?') {
            let query = query.split('#').next().unwrap_or_default();
            for pair in query.split('&') {
                if let Some(("seed", v)) = pair.split_once('=') {
                    config.seed = parse_or("seed", v, config.seed);
                }
            }
        }
        config
    }
}

fn is_truthy(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
}

fn parse_or<T: std::str::FromStr + std::fmt::Debug>(key: &str, value: &str, fallback: T) -> T {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(key, value, ?fallback, "ignoring malformed config value");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_animation_policy() {
        let anim = AnimationConfig::default();
        assert_eq!(anim.camera_dolly_step, 0.01);
        assert_eq!(anim.camera_dolly_stop_z, 5.0);
        assert_eq!(anim.mirror_sweep_step, 0.0001);
        assert_eq!(anim.background_drift_step, 0.003);
        assert_eq!(anim.even_spin_rate, 0.4);
        assert_eq!(anim.odd_spin_rate, 0.3);
        assert_eq!(SceneConfig::default().background_count, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let config = SceneConfig::from_lookup(lookup(&[
            ("SCENE_DEBUG", "1"),
            ("SCENE_SEED", "42"),
            ("SCENE_TITLE", "HI"),
            ("SCENE_BACKGROUND_COUNT", "10"),
        ]));
        assert!(config.debug);
        assert_eq!(config.seed, 42);
        assert_eq!(config.title, "HI");
        assert_eq!(config.background_count, 10);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = SceneConfig::from_lookup(lookup(&[("SCENE_SEED", "nope"), ("SCENE_DEBUG", "false")]));
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(!config.debug);
    }

    #[test]
    fn test_url_flags() {
        assert!(!SceneConfig::from_url("http://localhost:5173/").debug);
        assert!(SceneConfig::from_url("http://localhost:5173/#debug").debug);

        let config = SceneConfig::from_url("http://localhost/?debug&seed=7#top");
        assert!(config.debug);
        assert_eq!(config.seed, 7);
    }
}
