//! Camera capture as a scoped resource
//!
//! Opening a camera yields a stream that must be released on every exit
//! path. `CameraSession` owns the stream and releases it on drop, so a
//! successful capture, an error, or a cancel all turn the device off.

use std::path::PathBuf;
use std::process::Command;

use scentvalue_types::{CaptureError, EncodedImage, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::image_source::encode_for_transmission;

/// Cameras are always asked for the rear lens, pointed at the scale or document
pub const FACING: &str = "environment";

/// Preferred capture settings; devices may deliver something else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

/// Something that can be opened for live capture
pub trait CameraDevice {
    fn open(&self, constraints: &CameraConstraints) -> std::result::Result<Box<dyn CameraStream>, CaptureError>;
}

/// An open capture stream
pub trait CameraStream {
    /// Grab one still frame as encoded image bytes
    fn capture_still(&mut self) -> std::result::Result<Vec<u8>, CaptureError>;

    /// Stop all underlying tracks. Must be safe to call more than once.
    fn release(&mut self);
}

/// Owns an open stream and releases it when dropped
pub struct CameraSession {
    stream: Box<dyn CameraStream>,
}

impl CameraSession {
    pub fn open(
        device: &dyn CameraDevice,
        constraints: &CameraConstraints,
    ) -> std::result::Result<Self, CaptureError> {
        let stream = device.open(constraints)?;
        info!(facing = FACING, width = constraints.ideal_width, height = constraints.ideal_height, "camera opened");
        Ok(Self { stream })
    }

    pub fn capture_still(&mut self) -> std::result::Result<Vec<u8>, CaptureError> {
        self.stream.capture_still()
    }

    /// Release now instead of waiting for drop
    pub fn close(self) {}
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stream.release();
        info!("camera released");
    }
}

/// Open the camera, take one still, release the camera, and encode the still
pub fn capture_still(device: &dyn CameraDevice, constraints: &CameraConstraints) -> Result<EncodedImage> {
    let frame = {
        let mut session = CameraSession::open(device, constraints)?;
        session.capture_still()?
    };
    encode_for_transmission(&frame)
}

/// Camera driven by an external still-capture program.
///
/// The command line may contain `{output}`, `{width}`, `{height}` and
/// `{facing}` placeholders, e.g.
/// `fswebcam -r {width}x{height} --no-banner {output}`. Without an
/// `{output}` placeholder the output path is appended as the last argument.
pub struct CommandCamera {
    command: String,
}

impl CommandCamera {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl CameraDevice for CommandCamera {
    fn open(&self, constraints: &CameraConstraints) -> std::result::Result<Box<dyn CameraStream>, CaptureError> {
        let parts = match shell_words::split(&self.command) {
            Ok(parts) if !parts.is_empty() => parts,
            _ => {
                return Err(CaptureError::DeviceUnavailable(format!(
                    "camera command is invalid: {}",
                    self.command
                )))
            }
        };

        let output_path = std::env::temp_dir().join(format!(
            "scentvalue_still_{}_{}.jpg",
            std::process::id(),
            Uuid::new_v4().simple()
        ));

        Ok(Box::new(CommandStream {
            parts,
            constraints: constraints.clone(),
            output_path,
            released: false,
        }))
    }
}

struct CommandStream {
    parts: Vec<String>,
    constraints: CameraConstraints,
    output_path: PathBuf,
    released: bool,
}

impl CommandStream {
    fn build_command(&self) -> Command {
        let output = self.output_path.display().to_string();
        let substitute = |arg: &str| {
            arg.replace("{output}", &output)
                .replace("{width}", &self.constraints.ideal_width.to_string())
                .replace("{height}", &self.constraints.ideal_height.to_string())
                .replace("{facing}", FACING)
        };

        let mut cmd = Command::new(&self.parts[0]);
        cmd.args(self.parts[1..].iter().map(|a| substitute(a)));
        if !self.parts.iter().any(|p| p.contains("{output}")) {
            cmd.arg(&self.output_path);
        }
        cmd
    }
}

impl CameraStream for CommandStream {
    fn capture_still(&mut self) -> std::result::Result<Vec<u8>, CaptureError> {
        if self.released {
            return Err(CaptureError::Released);
        }

        let mut cmd = self.build_command();
        debug!(command = ?cmd, "running camera command");

        let output = cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied(e.to_string()),
            _ => CaptureError::DeviceUnavailable(format!("{}: {}", self.parts[0], e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let lowered = stderr.to_lowercase();
            return Err(
                if lowered.contains("permission") || lowered.contains("denied") || lowered.contains("not permitted") {
                    CaptureError::PermissionDenied(stderr)
                } else {
                    CaptureError::CaptureFailed(format!("camera command exited with {}: {}", output.status, stderr))
                },
            );
        }

        let frame = std::fs::read(&self.output_path).map_err(|e| {
            CaptureError::CaptureFailed(format!(
                "no still written to {}: {}",
                self.output_path.display(),
                e
            ))
        })?;
        let _ = std::fs::remove_file(&self.output_path);
        Ok(frame)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        if self.output_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.output_path) {
                warn!(error = %e, "could not remove camera still");
            }
        }
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeCamera {
        releases: Arc<AtomicUsize>,
        frame: Option<Vec<u8>>,
        deny: bool,
    }

    struct FakeStream {
        releases: Arc<AtomicUsize>,
        frame: Option<Vec<u8>>,
    }

    impl CameraDevice for FakeCamera {
        fn open(&self, _constraints: &CameraConstraints) -> std::result::Result<Box<dyn CameraStream>, CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied("user said no".to_string()));
            }
            Ok(Box::new(FakeStream {
                releases: Arc::clone(&self.releases),
                frame: self.frame.clone(),
            }))
        }
    }

    impl CameraStream for FakeStream {
        fn capture_still(&mut self) -> std::result::Result<Vec<u8>, CaptureError> {
            self.frame
                .clone()
                .ok_or_else(|| CaptureError::CaptureFailed("dark frame".to_string()))
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn png_frame() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_capture_releases_after_success() {
        let releases = Arc::new(AtomicUsize::new(0));
        let camera = FakeCamera {
            releases: Arc::clone(&releases),
            frame: Some(png_frame()),
            deny: false,
        };
        let still = capture_still(&camera, &CameraConstraints::default()).unwrap();
        assert_eq!(still.mime_type, "image/jpeg");
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_capture_releases_after_failure() {
        let releases = Arc::new(AtomicUsize::new(0));
        let camera = FakeCamera {
            releases: Arc::clone(&releases),
            frame: None,
            deny: false,
        };
        let err = capture_still(&camera, &CameraConstraints::default()).unwrap_err();
        assert!(matches!(err, scentvalue_types::Error::Capture(CaptureError::CaptureFailed(_))));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_releases() {
        let releases = Arc::new(AtomicUsize::new(0));
        let camera = FakeCamera {
            releases: Arc::clone(&releases),
            frame: Some(png_frame()),
            deny: false,
        };
        let session = CameraSession::open(&camera, &CameraConstraints::default()).unwrap();
        session.close();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_permission_denied_surfaces() {
        let camera = FakeCamera {
            releases: Arc::new(AtomicUsize::new(0)),
            frame: None,
            deny: true,
        };
        let err = capture_still(&camera, &CameraConstraints::default()).unwrap_err();
        assert!(matches!(err, scentvalue_types::Error::Capture(CaptureError::PermissionDenied(_))));
    }

    #[test]
    fn test_invalid_command_is_unavailable() {
        let camera = CommandCamera::new("   ");
        assert!(matches!(
            camera.open(&CameraConstraints::default()),
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_placeholders_are_substituted() {
        let stream = CommandStream {
            parts: shell_words::split("snap --facing {facing} -s {width}x{height}").unwrap(),
            constraints: CameraConstraints::default(),
            output_path: PathBuf::from("/tmp/still.jpg"),
            released: false,
        };
        let cmd = stream.build_command();
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(cmd.get_program(), "snap");
        assert_eq!(args, ["--facing", "environment", "-s", "1920x1080", "/tmp/still.jpg"]);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let camera = CommandCamera::new("scentvalue-no-such-camera-binary {output}");
        let mut stream = camera.open(&CameraConstraints::default()).unwrap();
        assert!(matches!(stream.capture_still(), Err(CaptureError::DeviceUnavailable(_))));
        stream.release();
        assert!(matches!(stream.capture_still(), Err(CaptureError::Released)));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_camera_reads_written_still() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("frame.png");
        std::fs::write(&source, png_frame()).unwrap();

        let camera = CommandCamera::new(format!("cp {} {{output}}", source.display()));
        let still = capture_still(&camera, &CameraConstraints::default()).unwrap();
        assert_eq!(still.mime_type, "image/jpeg");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_camera_permission_message() {
        let camera = CommandCamera::new("sh -c 'echo Permission denied >&2; exit 1'");
        let mut stream = camera.open(&CameraConstraints::default()).unwrap();
        assert!(matches!(stream.capture_still(), Err(CaptureError::PermissionDenied(_))));
    }
}
