use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub is_mobile: bool,
}

impl Viewport {
    pub fn desktop(width: f32) -> Self {
        Self {
            width,
            is_mobile: false,
        }
    }

    pub fn mobile(width: f32) -> Self {
        Self {
            width,
            is_mobile: true,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::desktop(1920.0)
    }
}

/// Source of viewport size and device class.
pub trait DeviceService {
    fn viewport(&self) -> Viewport;
}

/// Device that always reports the same viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDevice {
    viewport: Viewport,
}

impl FixedDevice {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

impl DeviceService for FixedDevice {
    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Device whose viewport is updated by the host (e.g. once per frame).
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    current: Rc<Cell<Viewport>>,
}

impl SharedViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: Rc::new(Cell::new(viewport)),
        }
    }

    pub fn set(&self, viewport: Viewport) {
        self.current.set(viewport);
    }
}

impl DeviceService for SharedViewport {
    fn viewport(&self) -> Viewport {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_viewport_clones_observe_updates() {
        let host = SharedViewport::new(Viewport::desktop(1200.0));
        let device: Box<dyn DeviceService> = Box::new(host.clone());

        host.set(Viewport::mobile(400.0));
        assert_eq!(device.viewport(), Viewport::mobile(400.0));
    }
}
