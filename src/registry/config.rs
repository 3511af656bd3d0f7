//! Registry configuration

/// Default capacity of the membership event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Membership registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Whether membership events are published to subscribers
    pub events_enabled: bool,

    /// Capacity of the event channel; lagging subscribers skip older events
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            events_enabled: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Set the event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        // tokio's broadcast channel rejects a zero capacity
        self.event_capacity = capacity.max(1);
        self
    }

    /// Disable membership events
    pub fn disable_events(mut self) -> Self {
        self.events_enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert!(config.events_enabled);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_builder_event_capacity() {
        let config = RegistryConfig::default().event_capacity(16);

        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn test_builder_event_capacity_clamped() {
        let config = RegistryConfig::default().event_capacity(0);

        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .event_capacity(8)
            .disable_events();

        assert_eq!(config.event_capacity, 8);
        assert!(!config.events_enabled);
    }
}
