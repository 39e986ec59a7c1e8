//! The application launch engine.
//!
//! One application is launched by walking an ordered ladder of strategies
//! and stopping at the first success: packaged-app activation through its
//! apps-folder reference, protocol launch for URI-style identifiers,
//! package-manager activation, the PWA proxy rewrite for browser-hosted
//! apps, and finally plain process creation with a shell fallback. Every
//! failed attempt is recorded; one success makes the launch a success
//! regardless of earlier failures.

use crate::workspaces::Application;
use restora_system::app_activation::{ActivationError, AppActivator, ShellVerb};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

const EDGE_FILENAME: &str = "msedge.exe";
const EDGE_PROXY_FILENAME: &str = "msedge_proxy.exe";
const CHROME_FILENAME: &str = "chrome.exe";
const CHROME_PROXY_FILENAME: &str = "chrome_proxy.exe";
const PWA_ARGS_PREFIX: &str = "--profile-directory=Default --app-id=";
const SHELL_APPS_FOLDER_PREFIX: &str = "shell:AppsFolder\\";

/// A failed launch attempt: a short display name plus the failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchError {
    pub app: String,
    pub message: String,
}

/// Whether an identifier begins with a URI protocol scheme (for example
/// `steam:`). Single letters are not schemes; they would collide with
/// drive prefixes.
fn has_uri_scheme(identifier: &str) -> bool {
    match identifier.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() >= 2
                && scheme
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Launches applications through an [`AppActivator`].
pub struct AppLaunchEngine {
    activator: Arc<dyn AppActivator>,
}

impl AppLaunchEngine {
    pub fn new(activator: Arc<dyn AppActivator>) -> Self {
        AppLaunchEngine { activator }
    }

    /// Starts `item` (an executable path, apps-folder reference, or URI).
    ///
    /// Non-elevated launches try direct process creation first and fall
    /// back to shell activation; elevated launches go straight to the
    /// elevated shell verb.
    fn launch_item(&self, item: &str, args: &str, elevated: bool) -> Result<(), ActivationError> {
        let path = Path::new(item);
        let working_dir = path.parent().filter(|p| !p.as_os_str().is_empty());

        if !elevated {
            match self.activator.create_process(path, args, working_dir) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(item, error = %e, "process creation failed, falling back to shell activation");
                }
            }
        }

        let verb = if elevated {
            ShellVerb::RunAs
        } else {
            ShellVerb::Open
        };
        self.activator.shell_execute(item, args, working_dir, verb)
    }

    /// Runs the strategy ladder for `app`.
    ///
    /// Returns whether any strategy succeeded; each failed attempt appends
    /// a [`LaunchError`] to `errors`.
    pub fn launch(&self, app: &Application, errors: &mut Vec<LaunchError>) -> bool {
        let mut launched = false;

        // Packaged app addressed directly through its apps-folder entry.
        if !app.package_full_name.is_empty() && !app.app_user_model_id.is_empty() {
            trace!(app = %app.name, aumid = %app.app_user_model_id, "launching as packaged app");
            let item = format!("{}{}", SHELL_APPS_FOLDER_PREFIX, app.app_user_model_id);
            match self.launch_item(&item, &app.command_line_args, app.elevated) {
                Ok(()) => launched = true,
                Err(e) => errors.push(LaunchError {
                    app: app.path_file_name(),
                    message: e.message(),
                }),
            }
        }

        // Identifiers carrying a protocol scheme launch through the shell.
        if !launched && has_uri_scheme(&app.app_user_model_id) {
            trace!(app = %app.name, uri = %app.app_user_model_id, "launching via protocol");
            match self.launch_item(&app.app_user_model_id, &app.command_line_args, app.elevated) {
                Ok(()) => launched = true,
                Err(e) => errors.push(LaunchError {
                    app: app.app_user_model_id.clone(),
                    message: e.message(),
                }),
            }
        }

        // Plain packaged launch through the package manager.
        if !launched
            && !app.package_full_name.is_empty()
            && app.command_line_args.is_empty()
            && !app.elevated
        {
            trace!(app = %app.name, package = %app.package_full_name, "launching via package manager");
            match self.activator.activate_package(&app.package_full_name) {
                Ok(()) => launched = true,
                Err(e) => errors.push(LaunchError {
                    app: app.package_full_name.clone(),
                    message: e.message(),
                }),
            }
        }

        let mut final_path = app.path.clone();
        let mut final_args = app.command_line_args.clone();

        if !launched && !app.pwa_app_id.is_empty() {
            let version = match app.version.trim().parse::<i32>() {
                Ok(v) => v,
                Err(_) => {
                    if !app.version.is_empty() {
                        warn!(app = %app.name, version = %app.version, "invalid version format");
                    }
                    0
                }
            };

            // Recent records carry an AUMID addressable directly.
            if version >= 1 && !app.app_user_model_id.is_empty() {
                let item = format!("{}{}", SHELL_APPS_FOLDER_PREFIX, app.app_user_model_id);
                match self.launch_item(&item, &app.command_line_args, app.elevated) {
                    Ok(()) => launched = true,
                    Err(e) => errors.push(LaunchError {
                        app: app.app_user_model_id.clone(),
                        message: e.message(),
                    }),
                }
            }

            // Otherwise the browser's proxy executable hosts the app.
            if !launched {
                let file_name = app.path_file_name();
                let proxy = match file_name.as_str() {
                    EDGE_FILENAME => Some(EDGE_PROXY_FILENAME),
                    CHROME_FILENAME => Some(CHROME_PROXY_FILENAME),
                    _ => None,
                };
                if let Some(proxy) = proxy {
                    final_path = app
                        .path
                        .parent()
                        .map(|p| p.join(proxy))
                        .unwrap_or_else(|| proxy.into());
                    final_args = format!(
                        "{}{} {}",
                        PWA_ARGS_PREFIX, app.pwa_app_id, app.command_line_args
                    )
                    .trim_end()
                    .to_string();
                }
            }
        }

        // Plain executable launch.
        if !launched {
            trace!(app = %app.name, path = %final_path.display(), "launching executable");

            if !self.activator.path_exists(&final_path) {
                error!(path = %final_path.display(), "File not found");
                errors.push(LaunchError {
                    app: file_name_of(&final_path),
                    message: "File not found".to_string(),
                });
                return false;
            }

            match self.launch_item(&final_path.to_string_lossy(), &final_args, app.elevated) {
                Ok(()) => launched = true,
                Err(e) => errors.push(LaunchError {
                    app: file_name_of(&final_path),
                    message: e.message(),
                }),
            }
        }

        trace!(app = %app.name, launched, "launch ladder finished");
        launched
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
