//! In-memory window system.
//!
//! A scriptable [`WindowSystem`] implementation used by the engine tests
//! and by headless deployments without a platform adapter. Windows can be
//! added and mutated at any time (including while a reconciliation is in
//! flight), individual operations can be made to fail, and every mutation
//! the engine performs is recorded for inspection.

use super::{WindowSystem, WindowSystemError};
use restora_core::types::{Monitor, Rect, ShowState, WindowHandle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// One scripted window inside a [`FakeWindowSystem`].
#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub handle: WindowHandle,
    pub process_path: Option<PathBuf>,
    pub app_user_model_id: Option<String>,
    pub rect: Rect,
    pub show_state: ShowState,
    pub popup: bool,
}

impl FakeWindow {
    /// A normal window with no process information at the origin.
    pub fn new(handle: u64) -> Self {
        FakeWindow {
            handle: WindowHandle::new(handle),
            process_path: None,
            app_user_model_id: None,
            rect: Rect::new(0, 0, 800, 600),
            show_state: ShowState::Normal,
            popup: false,
        }
    }

    pub fn with_process_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.process_path = Some(path.into());
        self
    }

    pub fn with_app_user_model_id(mut self, aumid: impl Into<String>) -> Self {
        self.app_user_model_id = Some(aumid.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_show_state(mut self, state: ShowState) -> Self {
        self.show_state = state;
        self
    }

    pub fn as_popup(mut self) -> Self {
        self.popup = true;
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    windows: Vec<FakeWindow>,
    monitors: Vec<Monitor>,
    fail_move: HashSet<WindowHandle>,
    fail_minimize: HashSet<WindowHandle>,
    moved: Vec<(WindowHandle, Rect)>,
    minimized: Vec<WindowHandle>,
    maximized: Vec<WindowHandle>,
    shown: Vec<WindowHandle>,
}

/// An in-memory [`WindowSystem`].
#[derive(Debug)]
pub struct FakeWindowSystem {
    state: Mutex<FakeState>,
}

impl Default for FakeWindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWindowSystem {
    /// An empty desktop with a single primary monitor whose work area
    /// equals its bounds.
    pub fn new() -> Self {
        FakeWindowSystem {
            state: Mutex::new(FakeState {
                monitors: vec![Monitor {
                    bounds: Rect::new(0, 0, 1920, 1080),
                    work_area: Rect::new(0, 0, 1920, 1080),
                    is_primary: true,
                }],
                ..FakeState::default()
            }),
        }
    }

    /// Adds a window; it appears at the end of the enumeration order.
    pub fn add_window(&self, window: FakeWindow) {
        self.state.lock().unwrap().windows.push(window);
    }

    /// Replaces the monitor set.
    pub fn set_monitors(&self, monitors: Vec<Monitor>) {
        self.state.lock().unwrap().monitors = monitors;
    }

    /// Makes `move_resize` fail for the given window.
    pub fn fail_move_for(&self, window: WindowHandle) {
        self.state.lock().unwrap().fail_move.insert(window);
    }

    /// Makes `force_minimize` fail for the given window.
    pub fn fail_minimize_for(&self, window: WindowHandle) {
        self.state.lock().unwrap().fail_minimize.insert(window);
    }

    /// Every `move_resize` performed, in order.
    pub fn moved(&self) -> Vec<(WindowHandle, Rect)> {
        self.state.lock().unwrap().moved.clone()
    }

    /// Every successful `force_minimize`, in order.
    pub fn minimized(&self) -> Vec<WindowHandle> {
        self.state.lock().unwrap().minimized.clone()
    }

    /// Every `maximize`, in order.
    pub fn maximized(&self) -> Vec<WindowHandle> {
        self.state.lock().unwrap().maximized.clone()
    }

    /// Every `show_no_activate`, in order.
    pub fn shown(&self) -> Vec<WindowHandle> {
        self.state.lock().unwrap().shown.clone()
    }

    /// Snapshot of a window's scripted state.
    pub fn window(&self, handle: WindowHandle) -> Option<FakeWindow> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == handle)
            .cloned()
    }
}

impl WindowSystem for FakeWindowSystem {
    fn enumerate_windows(&self) -> Vec<WindowHandle> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .map(|w| w.handle)
            .collect()
    }

    fn is_system_popup(&self, window: WindowHandle) -> bool {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == window)
            .map(|w| w.popup)
            .unwrap_or(false)
    }

    fn process_path(&self, window: WindowHandle) -> Option<PathBuf> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == window)
            .and_then(|w| w.process_path.clone())
    }

    fn app_user_model_id(&self, window: WindowHandle) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == window)
            .and_then(|w| w.app_user_model_id.clone())
    }

    fn show_state(&self, window: WindowHandle) -> Option<ShowState> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == window)
            .map(|w| w.show_state)
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        self.state
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.handle == window)
            .map(|w| w.rect)
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.state.lock().unwrap().monitors.clone()
    }

    fn move_resize(&self, window: WindowHandle, rect: &Rect) -> Result<(), WindowSystemError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_move.contains(&window) {
            return Err(WindowSystemError::OsFailure {
                operation: "move_resize",
                window,
                code: 5,
            });
        }
        match state.windows.iter_mut().find(|w| w.handle == window) {
            Some(w) => {
                w.rect = *rect;
                state.moved.push((window, *rect));
                Ok(())
            }
            None => Err(WindowSystemError::WindowGone(window)),
        }
    }

    fn show_no_activate(&self, window: WindowHandle) -> Result<(), WindowSystemError> {
        let mut state = self.state.lock().unwrap();
        match state.windows.iter_mut().find(|w| w.handle == window) {
            Some(w) => {
                if w.show_state == ShowState::Minimized {
                    w.show_state = ShowState::Normal;
                }
                state.shown.push(window);
                Ok(())
            }
            None => Err(WindowSystemError::WindowGone(window)),
        }
    }

    fn force_minimize(&self, window: WindowHandle) -> Result<(), WindowSystemError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_minimize.contains(&window) {
            return Err(WindowSystemError::OsFailure {
                operation: "force_minimize",
                window,
                code: 5,
            });
        }
        match state.windows.iter_mut().find(|w| w.handle == window) {
            Some(w) => {
                w.show_state = ShowState::Minimized;
                state.minimized.push(window);
                Ok(())
            }
            None => Err(WindowSystemError::WindowGone(window)),
        }
    }

    fn maximize(&self, window: WindowHandle) -> Result<(), WindowSystemError> {
        let mut state = self.state.lock().unwrap();
        match state.windows.iter_mut().find(|w| w.handle == window) {
            Some(w) => {
                w.show_state = ShowState::Maximized;
                state.maximized.push(window);
                Ok(())
            }
            None => Err(WindowSystemError::WindowGone(window)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(FakeWindowSystem: Send, Sync);

    fn handle(raw: u64) -> WindowHandle {
        WindowHandle::new(raw)
    }

    #[test]
    fn enumeration_preserves_insertion_order() {
        let ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(3));
        ws.add_window(FakeWindow::new(1));
        ws.add_window(FakeWindow::new(2));
        assert_eq!(
            ws.enumerate_windows(),
            vec![handle(3), handle(1), handle(2)]
        );
    }

    #[test]
    fn queries_reflect_scripted_properties() {
        let ws = FakeWindowSystem::new();
        ws.add_window(
            FakeWindow::new(7)
                .with_process_path("C:\\A.exe")
                .with_app_user_model_id("Contoso.App")
                .with_rect(Rect::new(10, 20, 300, 400))
                .with_show_state(ShowState::Minimized),
        );

        assert_eq!(
            ws.process_path(handle(7)),
            Some(PathBuf::from("C:\\A.exe"))
        );
        assert_eq!(
            ws.app_user_model_id(handle(7)),
            Some("Contoso.App".to_string())
        );
        assert_eq!(ws.show_state(handle(7)), Some(ShowState::Minimized));
        assert_eq!(ws.window_rect(handle(7)), Some(Rect::new(10, 20, 300, 400)));
        assert!(!ws.is_system_popup(handle(7)));
    }

    #[test]
    fn unknown_windows_answer_none() {
        let ws = FakeWindowSystem::new();
        assert_eq!(ws.process_path(handle(99)), None);
        assert_eq!(ws.show_state(handle(99)), None);
        assert!(matches!(
            ws.move_resize(handle(99), &Rect::new(0, 0, 1, 1)),
            Err(WindowSystemError::WindowGone(_))
        ));
    }

    #[test]
    fn move_resize_updates_rect_and_records_the_call() {
        let ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1));
        let target = Rect::new(100, 100, 800, 600);
        ws.move_resize(handle(1), &target).unwrap();
        assert_eq!(ws.window_rect(handle(1)), Some(target));
        assert_eq!(ws.moved(), vec![(handle(1), target)]);
    }

    #[test]
    fn scripted_failures_surface_os_errors() {
        let ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1));
        ws.fail_move_for(handle(1));
        assert!(matches!(
            ws.move_resize(handle(1), &Rect::new(0, 0, 1, 1)),
            Err(WindowSystemError::OsFailure { code: 5, .. })
        ));
        assert!(ws.moved().is_empty());
    }

    #[test]
    fn force_minimize_flips_show_state() {
        let ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1));
        ws.force_minimize(handle(1)).unwrap();
        assert_eq!(ws.show_state(handle(1)), Some(ShowState::Minimized));
        assert_eq!(ws.minimized(), vec![handle(1)]);
    }

    #[test]
    fn show_no_activate_restores_minimized_windows() {
        let ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1).with_show_state(ShowState::Minimized));
        ws.show_no_activate(handle(1)).unwrap();
        assert_eq!(ws.show_state(handle(1)), Some(ShowState::Normal));
    }

    #[test]
    fn monitor_for_rect_finds_the_intersecting_monitor() {
        let ws = FakeWindowSystem::new();
        ws.set_monitors(vec![
            Monitor {
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1040),
                is_primary: true,
            },
            Monitor {
                bounds: Rect::new(1920, 0, 1920, 1080),
                work_area: Rect::new(1920, 0, 1920, 1080),
                is_primary: false,
            },
        ]);
        let on_second = ws.monitor_for_rect(&Rect::new(2000, 100, 400, 300)).unwrap();
        assert!(!on_second.is_primary);
        assert!(ws.monitor_for_rect(&Rect::new(5000, 0, 10, 10)).is_none());
    }
}
