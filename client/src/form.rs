//! User-editable scan parameters.

use cfping_common::config::ClientConfig;
use cfping_common::network::target;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Invalid port '{0}'")]
    InvalidPort(String),
    #[error("Invalid max latency '{0}'")]
    InvalidMaxLatency(String),
}

/// Raw form contents, kept as typed so editing never loses input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanForm {
    /// One target per line.
    pub targets: String,
    pub port: String,
    pub download_url: String,
    pub max_latency: String,
}

impl ScanForm {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            targets: String::new(),
            port: cfg.port.to_string(),
            download_url: cfg.download_url.clone(),
            max_latency: cfg.max_latency.to_string(),
        }
    }

    pub fn with_targets(mut self, targets: impl Into<String>) -> Self {
        self.targets = targets.into();
        self
    }

    pub fn targets(&self) -> Vec<String> {
        target::normalize_lines(&self.targets)
    }

    pub fn port(&self) -> Result<u16, FormError> {
        let raw = self.port.trim();
        raw.parse::<u16>()
            .map_err(|_| FormError::InvalidPort(raw.to_string()))
    }

    /// Empty means no latency filter.
    pub fn max_latency(&self) -> Result<u64, FormError> {
        let raw = self.max_latency.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse::<u64>()
            .map_err(|_| FormError::InvalidMaxLatency(raw.to_string()))
    }

    pub fn download_url(&self) -> String {
        self.download_url.trim().to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use cfping_common::config::DEFAULT_MAX_LATENCY;

    #[test]
    fn defaults_come_from_config() {
        let form = ScanForm::from_config(&ClientConfig::default());
        assert_eq!(form.port(), Ok(443));
        assert_eq!(form.max_latency(), Ok(DEFAULT_MAX_LATENCY));
        assert!(form.targets().is_empty());
    }

    #[test]
    fn numeric_fields_are_checked() {
        let mut form = ScanForm::default();
        form.port = " 8443 ".into();
        assert_eq!(form.port(), Ok(8443));

        form.port = "https".into();
        assert_eq!(form.port(), Err(FormError::InvalidPort("https".into())));

        form.port = "70000".into();
        assert!(form.port().is_err());

        form.max_latency = "".into();
        assert_eq!(form.max_latency(), Ok(0));
        form.max_latency = "-5".into();
        assert!(form.max_latency().is_err());
    }

    #[test]
    fn targets_are_normalized() {
        let form = ScanForm::default().with_targets("1.1.1.1\n 1.1.1.1 \n\n104.16.0.0/24\n");
        assert_eq!(form.targets(), vec!["1.1.1.1", "104.16.0.0/24"]);
    }
}
