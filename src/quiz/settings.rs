use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    pub narration_delay: Duration,
    pub completion_delay: Duration,
    pub fallback_duration: Duration,
    pub tick_interval: Duration,
    pub narrate_analysis: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            narration_delay: Duration::from_millis(300),
            completion_delay: Duration::from_millis(500),
            fallback_duration: Duration::from_secs(3),
            tick_interval: Duration::from_millis(100),
            narrate_analysis: true,
        }
    }
}
