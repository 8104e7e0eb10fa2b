//! Device adapters: camera stills, uploaded images and the clipboard

pub mod camera;
pub mod clipboard;
pub mod image_source;

pub use camera::{capture_still, CameraConstraints, CameraDevice, CameraSession, CameraStream, CommandCamera, FACING};
pub use clipboard::{Clipboard, CommandClipboard};
pub use image_source::{encode_for_transmission, is_supported_image, load_data_url, load_upload};
