//! System-facing facades consumed by the Restora reconciliation engine.
//!
//! Every OS service the engine touches is modelled as a trait here so the
//! engine stays testable: the window system (enumerate, query, move,
//! minimize, maximize, monitor geometry), application activation, the
//! installed-application inventory, the browser PWA helpers, and the local
//! request channel. In-memory implementations suitable for tests and
//! headless operation live alongside the traits.

pub mod app_activation;
pub mod app_inventory;
pub mod channel;
pub mod pwa;
pub mod window_system;

pub use app_activation::{
    ActivationCall, ActivationError, AppActivator, FakeActivator, NativeActivator, ShellVerb,
};
pub use app_inventory::{
    AppData, AppInventory, CachedAppInventory, FileAppInventory, InventoryError,
    StaticAppInventory,
};
pub use channel::{send_request, ChannelError, RequestChannel};
pub use pwa::{PwaHelper, TablePwaHelper};
pub use window_system::{
    fake::{FakeWindow, FakeWindowSystem},
    WindowSystem, WindowSystemError,
};
