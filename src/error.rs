use thiserror::Error;

/// Transient failure of the landmark detector for a single frame.
///
/// Never fatal: the gesture pipeline logs it and treats the frame as having
/// no hands.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectionError {
    #[error("detector backend failed: {0}")]
    Backend(String),

    #[error("no frame available from the capture device")]
    NoFrame,
}

/// Failure to acquire an input device; disables that channel for the session
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    #[error("{device} permission denied")]
    PermissionDenied { device: &'static str },

    #[error("{device} unavailable: {reason}")]
    Unavailable { device: &'static str, reason: String },
}

/// Renderer setup failure
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface not supported by adapter")]
    UnsupportedSurface,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let denied = DeviceError::PermissionDenied { device: "camera" };
        assert_eq!(denied.to_string(), "camera permission denied");

        let missing = DeviceError::Unavailable {
            device: "microphone",
            reason: "no input device".into(),
        };
        assert_eq!(missing.to_string(), "microphone unavailable: no input device");

        let backend = DetectionError::Backend("model crashed".into());
        assert_eq!(backend.to_string(), "detector backend failed: model crashed");
    }
}
