//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// GateMode
// ---------------------------------------------------------------------------

/// Selects how narration turns into slide ideas.
///
/// | Variant   | Behaviour                                                |
/// |-----------|----------------------------------------------------------|
/// | Gated     | Segments accumulate; the gate service decides per buffer |
/// | Streaming | Each long-enough final segment is an idea immediately    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateMode {
    /// Accumulate finalized segments and ask the gate when the buffer has
    /// grown past the threshold.
    Gated,
    /// Skip accumulation; a sufficiently long final segment goes straight to
    /// the gate on its own.
    Streaming,
}

impl Default for GateMode {
    fn default() -> Self {
        Self::Gated
    }
}

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Settings for gate-triggering policy.
///
/// The character thresholds live here — not in the gate engine — because
/// *whether to ask at all* is caller-side policy: very short fragments are
/// rarely slide-worthy and checking them wastes a network round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub mode: GateMode,
    /// Minimum transcript length (chars) before the first slide of a session
    /// triggers an evaluation.
    pub first_slide_min_chars: usize,
    /// Minimum transcript length (chars) for every slide after the first.
    pub next_slide_min_chars: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            mode: GateMode::default(),
            first_slide_min_chars: 20,
            next_slide_min_chars: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SchedulerConfig
// ---------------------------------------------------------------------------

/// Settings for the exploratory trigger scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum milliseconds between exploratory dispatches. Triggers arriving
    /// inside this window coalesce into a single deferred dispatch.
    pub debounce_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { debounce_ms: 20_000 }
    }
}

// ---------------------------------------------------------------------------
// ChannelConfig
// ---------------------------------------------------------------------------

/// Settings for the slide channel store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Maximum slides held in the exploratory channel; the oldest entry is
    /// evicted beyond this bound so suggestions stay fresh.
    pub exploratory_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            exploratory_capacity: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// OnEmpty
// ---------------------------------------------------------------------------

/// What to do when the follow-up service returns zero usable slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnEmpty {
    /// Synthesize a generic slide locally so a dispatch is never silently a
    /// no-op from the presenter's perspective.
    Synthesize,
    /// Treat the empty response as a failure; the batch is rolled back and
    /// retried on the next trigger.
    Surface,
}

impl Default for OnEmpty {
    fn default() -> Self {
        Self::Synthesize
    }
}

// ---------------------------------------------------------------------------
// GenerateConfig
// ---------------------------------------------------------------------------

/// Settings for the generation pipeline adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Accepted-slide entries summarized into each follow-up request.
    pub history_context: usize,
    /// Audience-question entries summarized into each follow-up request.
    pub audience_context: usize,
    /// Behaviour when the follow-up service returns no usable content.
    pub on_empty: OnEmpty,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            history_context: 3,
            audience_context: 3,
            on_empty: OnEmpty::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Connection settings shared by the gate / generation / follow-up services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the slide service API.
    pub base_url: String,
    /// Opaque per-session token — `None` for unauthenticated deployments.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a service response before timing out.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use slidecast::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gate-triggering policy.
    pub gate: GateConfig,
    /// Exploratory trigger scheduler settings.
    pub scheduler: SchedulerConfig,
    /// Slide channel store settings.
    pub channels: ChannelConfig,
    /// Generation pipeline adapter settings.
    pub generate: GenerateConfig,
    /// Slide service connection settings.
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.gate.mode, loaded.gate.mode);
        assert_eq!(
            original.gate.first_slide_min_chars,
            loaded.gate.first_slide_min_chars
        );
        assert_eq!(
            original.gate.next_slide_min_chars,
            loaded.gate.next_slide_min_chars
        );
        assert_eq!(original.scheduler.debounce_ms, loaded.scheduler.debounce_ms);
        assert_eq!(
            original.channels.exploratory_capacity,
            loaded.channels.exploratory_capacity
        );
        assert_eq!(original.generate.on_empty, loaded.generate.on_empty);
        assert_eq!(original.service.base_url, loaded.service.base_url);
        assert_eq!(original.service.api_key, loaded.service.api_key);
        assert_eq!(original.service.timeout_secs, loaded.service.timeout_secs);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.gate.mode, default.gate.mode);
        assert_eq!(config.scheduler.debounce_ms, default.scheduler.debounce_ms);
        assert_eq!(config.service.base_url, default.service.base_url);
    }

    /// Verify the documented default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.gate.mode, GateMode::Gated);
        assert_eq!(cfg.gate.first_slide_min_chars, 20);
        assert_eq!(cfg.gate.next_slide_min_chars, 30);
        assert_eq!(cfg.scheduler.debounce_ms, 20_000);
        assert_eq!(cfg.channels.exploratory_capacity, 10);
        assert_eq!(cfg.generate.history_context, 3);
        assert_eq!(cfg.generate.audience_context, 3);
        assert_eq!(cfg.generate.on_empty, OnEmpty::Synthesize);
        assert!(cfg.service.api_key.is_none());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.gate.mode = GateMode::Streaming;
        cfg.gate.next_slide_min_chars = 50;
        cfg.scheduler.debounce_ms = 5_000;
        cfg.channels.exploratory_capacity = 4;
        cfg.generate.on_empty = OnEmpty::Surface;
        cfg.service.base_url = "https://slides.example.com".into();
        cfg.service.api_key = Some("tok-test".into());

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.gate.mode, GateMode::Streaming);
        assert_eq!(loaded.gate.next_slide_min_chars, 50);
        assert_eq!(loaded.scheduler.debounce_ms, 5_000);
        assert_eq!(loaded.channels.exploratory_capacity, 4);
        assert_eq!(loaded.generate.on_empty, OnEmpty::Surface);
        assert_eq!(loaded.service.base_url, "https://slides.example.com");
        assert_eq!(loaded.service.api_key, Some("tok-test".into()));
    }
}
