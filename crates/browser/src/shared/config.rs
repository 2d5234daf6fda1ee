#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub headless: bool,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
    /// Needed when running as root inside containers.
    pub no_sandbox: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: Some(1920),
            viewport_height: Some(1080),
            no_sandbox: false,
        }
    }
}

impl LaunchConfig {
    pub fn headful(mut self) -> Self {
        self.headless = false;
        self
    }
}
