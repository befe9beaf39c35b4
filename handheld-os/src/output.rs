//! The display backend chosen at startup

#[cfg(all(feature = "hardware", target_os = "linux"))]
use handheld_hal_linux::Panel;
use handheld_display::{DisplayBackend, DisplayError, FrameBuffer};

#[cfg(feature = "simulator")]
use crate::preview::Preview;

#[cfg(not(any(feature = "simulator", all(feature = "hardware", target_os = "linux"))))]
compile_error!("enable `simulator`, or `hardware` on Linux, to get a display backend");

pub enum Output {
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    Panel(Panel),
    #[cfg(feature = "simulator")]
    Preview(Preview),
}

impl Output {
    /// Blank the panel and switch the backlight off
    pub fn shutdown(&mut self) {
        match self {
            #[cfg(all(feature = "hardware", target_os = "linux"))]
            Output::Panel(panel) => {
                if let Err(e) = panel.shutdown() {
                    tracing::warn!(error = %e, "panel shutdown failed");
                }
            }
            #[cfg(feature = "simulator")]
            Output::Preview(_) => {}
        }
    }

    #[cfg(feature = "simulator")]
    pub fn preview_mut(&mut self) -> Option<&mut Preview> {
        match self {
            Output::Preview(preview) => Some(preview),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl DisplayBackend for Output {
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        match self {
            #[cfg(all(feature = "hardware", target_os = "linux"))]
            Output::Panel(panel) => panel.flush(frame),
            #[cfg(feature = "simulator")]
            Output::Preview(preview) => preview.flush(frame),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            #[cfg(all(feature = "hardware", target_os = "linux"))]
            Output::Panel(panel) => panel.name(),
            #[cfg(feature = "simulator")]
            Output::Preview(preview) => preview.name(),
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            #[cfg(all(feature = "hardware", target_os = "linux"))]
            Output::Panel(panel) => panel.is_ready(),
            #[cfg(feature = "simulator")]
            Output::Preview(preview) => preview.is_ready(),
        }
    }
}
