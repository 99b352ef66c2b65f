pub mod device;
pub mod layout;
pub mod manager;
pub mod registry;
pub mod thread;
pub mod transport;
pub mod view;
pub mod window;

pub use device::{DeviceService, FixedDevice, SharedViewport, Viewport};
pub use layout::{compute_layout, LayoutMode, LayoutResult, WindowSlot};
pub use manager::{ChatWindowManager, ManagerError, RenderFrame, WindowFrame};
pub use registry::{InMemoryThreadRegistry, RegistryError, ThreadRegistry};
pub use thread::{Attachment, FoldState, ThreadKind, ThreadMessage, ThreadRef, ThreadViewState};
pub use transport::{InboundTransport, NoInbound};
pub use window::ChatWindow;
