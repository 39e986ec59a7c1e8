//! Nearest-window selection.
//!
//! When several windows could belong to one application, the one closest
//! to the saved geometry wins. Distance is the sum of the absolute edge
//! offsets plus a placement penalty that heavily disfavors pairing a
//! minimized window with a normal placement (or the reverse).

use super::WindowMatcher;
use crate::workspaces::Application;
use restora_core::types::WindowHandle;
use restora_system::window_system::WindowSystem;

/// Penalty when exactly one of window and saved placement is minimized.
const MINIMIZED_MISMATCH_PENALTY: i64 = 10_000;

/// A candidate window with its distance from the saved placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowWithDistance {
    pub window: WindowHandle,
    pub distance: i64,
}

/// Distance between a window's current geometry and an application's
/// saved placement. Lower is better.
///
/// A minimized window paired with a minimized placement is a perfect
/// match at distance zero; agreement on a non-minimized state costs the
/// base penalty of one plus the edge offsets.
pub fn window_distance(
    window_system: &dyn WindowSystem,
    window: WindowHandle,
    app: &Application,
) -> i64 {
    let window_minimized = window_system
        .show_state(window)
        .map(|s| s.is_minimized())
        .unwrap_or(false);

    if app.state.is_minimized() && window_minimized {
        return 0;
    }

    let placement_penalty = if app.state.is_minimized() || window_minimized {
        MINIMIZED_MISMATCH_PENALTY
    } else {
        1
    };

    let rect = window_system.window_rect(window).unwrap_or_default();
    placement_penalty + app.position.edge_distance(&rect)
}

/// The best candidate window for `app` among the current enumeration.
///
/// Candidates must pass the popup filter, not already be in `moved`, have
/// a readable process path, and match the application. Ties keep the
/// earliest window in enumeration order.
pub fn nearest_window(
    window_system: &dyn WindowSystem,
    matcher: &WindowMatcher,
    app: &Application,
    moved: &[WindowHandle],
) -> Option<WindowWithDistance> {
    let mut nearest: Option<WindowWithDistance> = None;

    for window in window_system.enumerate_windows() {
        if window_system.is_system_popup(window) {
            continue;
        }
        if moved.contains(&window) {
            continue;
        }
        match window_system.process_path(window) {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => continue,
        }
        if !matcher.matches(window, app) {
            continue;
        }

        let distance = window_distance(window_system, window, app);
        if nearest.map_or(true, |best| distance < best.distance) {
            nearest = Some(WindowWithDistance { window, distance });
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::sample_app;
    use crate::workspaces::WindowState;
    use restora_core::types::{Rect, ShowState};
    use restora_system::pwa::TablePwaHelper;
    use restora_system::window_system::fake::{FakeWindow, FakeWindowSystem};
    use std::sync::Arc;

    fn handle(raw: u64) -> WindowHandle {
        WindowHandle::new(raw)
    }

    fn fixture() -> (Arc<FakeWindowSystem>, WindowMatcher) {
        let windows = Arc::new(FakeWindowSystem::new());
        let matcher = WindowMatcher::new(windows.clone(), Arc::new(TablePwaHelper::new()));
        (windows, matcher)
    }

    #[test]
    fn identical_geometry_with_normal_states_has_distance_one() {
        let (windows, _) = fixture();
        let position = Rect::new(100, 100, 800, 600);
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .with_rect(position),
        );
        let app = sample_app("a", "/apps/a.exe", position);

        assert_eq!(window_distance(windows.as_ref(), handle(1), &app), 1);
    }

    #[test]
    fn matching_minimized_states_have_distance_zero() {
        let (windows, _) = fixture();
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .with_show_state(ShowState::Minimized),
        );
        let mut app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));
        app.state = WindowState::Minimized;

        assert_eq!(window_distance(windows.as_ref(), handle(1), &app), 0);
    }

    #[test]
    fn minimization_mismatch_costs_the_large_penalty() {
        let (windows, _) = fixture();
        let position = Rect::new(100, 100, 800, 600);
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .with_rect(position)
                .with_show_state(ShowState::Minimized),
        );
        let app = sample_app("a", "/apps/a.exe", position);

        assert_eq!(
            window_distance(windows.as_ref(), handle(1), &app),
            MINIMIZED_MISMATCH_PENALTY
        );
    }

    #[test]
    fn closest_window_wins() {
        let (windows, matcher) = fixture();
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .with_rect(Rect::new(110, 110, 800, 600)),
        );
        windows.add_window(
            FakeWindow::new(2)
                .with_process_path("/apps/a.exe")
                .with_rect(Rect::new(500, 500, 200, 200)),
        );
        let app = sample_app("a", "/apps/a.exe", Rect::new(100, 100, 800, 600));

        let found = nearest_window(windows.as_ref(), &matcher, &app, &[]).unwrap();
        assert_eq!(found.window, handle(1));
        assert_eq!(found.distance, 41);
    }

    #[test]
    fn ties_keep_the_earliest_window_in_enumeration_order() {
        let (windows, matcher) = fixture();
        let rect = Rect::new(0, 0, 800, 600);
        windows.add_window(
            FakeWindow::new(5)
                .with_process_path("/apps/a.exe")
                .with_rect(rect),
        );
        windows.add_window(
            FakeWindow::new(6)
                .with_process_path("/apps/a.exe")
                .with_rect(rect),
        );
        let app = sample_app("a", "/apps/a.exe", rect);

        let found = nearest_window(windows.as_ref(), &matcher, &app, &[]).unwrap();
        assert_eq!(found.window, handle(5));
    }

    #[test]
    fn moved_windows_are_not_candidates() {
        let (windows, matcher) = fixture();
        let rect = Rect::new(0, 0, 800, 600);
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .with_rect(rect),
        );
        windows.add_window(
            FakeWindow::new(2)
                .with_process_path("/apps/a.exe")
                .with_rect(Rect::new(700, 700, 100, 100)),
        );
        let app = sample_app("a", "/apps/a.exe", rect);

        let found = nearest_window(windows.as_ref(), &matcher, &app, &[handle(1)]).unwrap();
        assert_eq!(found.window, handle(2));
    }

    #[test]
    fn popups_and_pathless_windows_are_not_candidates() {
        let (windows, matcher) = fixture();
        windows.add_window(
            FakeWindow::new(1)
                .with_process_path("/apps/a.exe")
                .as_popup(),
        );
        windows.add_window(FakeWindow::new(2));
        let app = sample_app("a", "/apps/a.exe", Rect::new(0, 0, 800, 600));

        assert!(nearest_window(windows.as_ref(), &matcher, &app, &[]).is_none());
    }

    #[test]
    fn no_matching_window_yields_none() {
        let (windows, matcher) = fixture();
        windows.add_window(FakeWindow::new(1).with_process_path("/apps/other.exe"));
        let app = sample_app("a", "/apps/a.exe", Rect::new(0, 0, 800, 600));

        assert!(nearest_window(windows.as_ref(), &matcher, &app, &[]).is_none());
    }
}
