//! Window placement.

use crate::workspaces::Application;
use restora_core::types::{Monitor, WindowHandle};
use restora_system::window_system::{WindowSystem, WindowSystemError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced while placing a window.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    WindowSystem(#[from] WindowSystemError),
}

/// Moves windows to their saved placement.
///
/// Saved positions are virtual-screen coordinates; before moving, they
/// are translated into the target monitor's work-area coordinates so the
/// visible result matches what was captured even when the monitor
/// reserves space for desktop chrome.
pub struct WindowPlacer {
    window_system: Arc<dyn WindowSystem>,
}

impl WindowPlacer {
    pub fn new(window_system: Arc<dyn WindowSystem>) -> Self {
        WindowPlacer { window_system }
    }

    /// Restores `window` to `app`'s saved position and state.
    ///
    /// Minimized placements are a single forced minimize. Everything else
    /// resolves the target monitor from `monitors` (the monitor
    /// intersecting the saved rectangle, falling back to the primary),
    /// translates the rectangle by the monitor's work-area offset, shows
    /// the window without activating it, moves it, and finally maximizes
    /// it when the saved state says so.
    pub fn place(
        &self,
        window: WindowHandle,
        app: &Application,
        monitors: &[Monitor],
    ) -> Result<(), PlacementError> {
        if app.state.is_minimized() {
            self.window_system.force_minimize(window)?;
            debug!(app = %app.name, %window, "window minimized in place");
            return Ok(());
        }

        let target = app.position;
        let monitor = monitors
            .iter()
            .find(|m| m.bounds.intersects(&target))
            .or_else(|| monitors.iter().find(|m| m.is_primary))
            .copied();

        let adjusted = match monitor {
            Some(monitor) => {
                let (dx, dy) = monitor.work_area_offset();
                target.translated(-dx, -dy)
            }
            None => target,
        };

        self.window_system.show_no_activate(window)?;
        self.window_system.move_resize(window, &adjusted)?;

        if app.state.is_maximized() {
            self.window_system.maximize(window)?;
        }

        debug!(app = %app.name, %window, ?adjusted, "window placed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::sample_app;
    use crate::workspaces::WindowState;
    use restora_core::types::{Rect, ShowState};
    use restora_system::window_system::fake::{FakeWindow, FakeWindowSystem};

    fn handle(raw: u64) -> WindowHandle {
        WindowHandle::new(raw)
    }

    fn fixture() -> (Arc<FakeWindowSystem>, WindowPlacer) {
        let windows = Arc::new(FakeWindowSystem::new());
        let placer = WindowPlacer::new(windows.clone());
        (windows, placer)
    }

    #[test]
    fn normal_placement_shows_then_moves() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1).with_process_path("/apps/a.exe"));
        let app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        assert_eq!(windows.shown(), vec![handle(1)]);
        assert_eq!(
            windows.moved(),
            vec![(handle(1), Rect::new(100, 100, 800, 600))]
        );
        assert!(windows.maximized().is_empty());
    }

    #[test]
    fn work_area_equal_to_bounds_keeps_the_rectangle_bit_exact() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1));
        let saved = Rect::new(321, 123, 777, 555);
        let app = sample_app("a", "/apps/a.exe", saved);

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        assert_eq!(windows.moved(), vec![(handle(1), saved)]);
    }

    #[test]
    fn reserved_chrome_shifts_the_target_into_the_work_area() {
        let (windows, placer) = fixture();
        windows.set_monitors(vec![Monitor {
            bounds: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(64, 32, 1856, 1048),
            is_primary: true,
        }]);
        windows.add_window(FakeWindow::new(1));
        let app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        assert_eq!(
            windows.moved(),
            vec![(handle(1), Rect::new(36, 68, 800, 600))]
        );
    }

    #[test]
    fn off_screen_rectangles_fall_back_to_the_primary_monitor() {
        let (windows, placer) = fixture();
        windows.set_monitors(vec![
            Monitor {
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 40, 1920, 1040),
                is_primary: true,
            },
            Monitor {
                bounds: Rect::new(1920, 0, 1920, 1080),
                work_area: Rect::new(1920, 0, 1920, 1080),
                is_primary: false,
            },
        ]);
        windows.add_window(FakeWindow::new(1));
        // Saved far outside every monitor.
        let app = sample_app("a", "/apps/a.exe", Rect::new(90_000, 90_000, 800, 600));

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        // The primary monitor's work-area offset (0, 40) applies.
        assert_eq!(
            windows.moved(),
            vec![(handle(1), Rect::new(90_000, 89_960, 800, 600))]
        );
    }

    #[test]
    fn minimized_placement_is_a_single_forced_minimize() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1));
        let mut app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));
        app.state = WindowState::Minimized;

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        assert_eq!(windows.minimized(), vec![handle(1)]);
        assert!(windows.moved().is_empty());
        assert!(windows.shown().is_empty());
    }

    #[test]
    fn maximized_placement_moves_first_then_maximizes() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1));
        let mut app = sample_app("a", "/apps/a.exe", Rect::new(0, 0, 1920, 1080));
        app.state = WindowState::Maximized;

        placer
            .place(handle(1), &app, &windows.monitors())
            .unwrap();

        assert_eq!(windows.moved().len(), 1);
        assert_eq!(windows.maximized(), vec![handle(1)]);
        assert_eq!(windows.window(handle(1)).unwrap().show_state, ShowState::Maximized);
    }

    #[test]
    fn move_failure_propagates_the_os_error() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1));
        windows.fail_move_for(handle(1));
        let app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));

        let result = placer.place(handle(1), &app, &windows.monitors());
        assert!(matches!(
            result,
            Err(PlacementError::WindowSystem(
                WindowSystemError::OsFailure { .. }
            ))
        ));
    }

    #[test]
    fn minimize_failure_propagates() {
        let (windows, placer) = fixture();
        windows.add_window(FakeWindow::new(1));
        windows.fail_minimize_for(handle(1));
        let mut app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));
        app.state = WindowState::Minimized;

        assert!(placer
            .place(handle(1), &app, &windows.monitors())
            .is_err());
    }
}
