//! Default values for every configuration section.

use crate::schema::*;
use fwatch_common::bilibili::DEFAULT_USER_AGENT;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            monitor: MonitorConfig::default(),
            journal: JournalConfig::default(),
            export: ExportConfig::default(),
            chart: ChartConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bilibili.com".to_string(),
            space_base_url: "https://space.bilibili.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            identity_timeout_secs: 10,
            stats_timeout_secs: 15,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            uid: None,
            interval_secs: 60,
            run_duration_secs: None,
            keep_awake: true,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            title: "Follower trend".to_string(),
            x_label: "Time".to_string(),
            y_label: "Followers".to_string(),
            line_color: "#1f77b4".to_string(),
            background_color: "#ffffff".to_string(),
            show_grid: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: None,
        }
    }
}

impl ApiConfig {
    /// Builds the HTTP client configuration from these settings.
    pub fn to_client_config(&self) -> fwatch_common::BiliConfig {
        fwatch_common::BiliConfig::new(self.base_url.clone())
            .with_space_base(self.space_base_url.clone())
            .with_user_agent(self.user_agent.clone())
            .with_timeouts(self.identity_timeout_secs, self.stats_timeout_secs)
    }
}
