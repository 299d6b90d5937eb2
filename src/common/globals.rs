use std::time::Duration;

// Application metadata
pub const APP_NAME: &str = "lanwatch";

// Capture settings
pub const SNAPLEN: i32 = 1600;
pub const CAPTURE_READ_TIMEOUT_MS: i32 = 500; // lets the capture thread notice shutdown
pub const CHANNEL_SIZE: usize = 1024; // packet metadata channel depth

// Discovery settings
pub const DEFAULT_SCAN_PORTS: &[u16] = &[80, 443, 22]; // HTTP, HTTPS, SSH
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(300);
pub const UNKNOWN_HOSTNAME: &str = "unknown";

// Dashboard settings
pub const DEFAULT_REFRESH_SECS: u64 = 1;

/// Convert bytes to human readable format
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }
}
