// EC2 and RDS inventory records, normalized from the describe APIs

/// Placeholder for missing names, addresses and metric values.
pub const NOT_AVAILABLE: &str = "NA";

const RUNNING: &str = "RUNNING";
const AVAILABLE: &str = "AVAILABLE";

/// OS family as far as metric names are concerned. Only the exact EC2 value "windows" is Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    pub fn classify(platform: Option<&str>) -> Self {
        match platform {
            Some("windows") => Platform::Windows,
            _ => Platform::Linux,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeResource {
    pub id: String,
    pub display_name: String,
    /// Upper-cased lifecycle state, e.g. "RUNNING", "STOPPED".
    pub lifecycle_state: String,
    pub platform: Platform,
    pub public_address: String,
    pub private_address: String,
}

impl ComputeResource {
    pub fn new(
        id: impl Into<String>,
        display_name: Option<&str>,
        lifecycle_state: &str,
        platform: Platform,
        public_address: Option<&str>,
        private_address: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: or_not_available(display_name),
            lifecycle_state: lifecycle_state.to_uppercase(),
            platform,
            public_address: or_not_available(public_address),
            private_address: or_not_available(private_address),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle_state.eq_ignore_ascii_case(RUNNING)
    }
}

/// RDS instance. Engine, class and endpoint are passed through as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseResource {
    pub id: String,
    /// Upper-cased status, e.g. "AVAILABLE", "STOPPED".
    pub status: String,
    pub engine: Option<String>,
    pub instance_class: Option<String>,
    pub endpoint: Option<String>,
}

impl DatabaseResource {
    pub fn new(id: impl Into<String>, status: &str) -> Self {
        Self {
            id: id.into(),
            status: status.to_uppercase(),
            engine: None,
            instance_class: None,
            endpoint: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.eq_ignore_ascii_case(AVAILABLE)
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
