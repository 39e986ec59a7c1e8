//! Application activation.
//!
//! [`AppActivator`] exposes the primitive launch operations the launch
//! engine sequences: direct process creation, shell-item activation with a
//! verb, and packaged-app activation. [`NativeActivator`] backs process
//! creation with `std::process`; shell and package activation depend on
//! host integration and report [`ActivationError::Unsupported`] on this
//! backend. [`FakeActivator`] scripts outcomes for tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by activation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// Process creation failed.
    #[error("failed to start process {path:?}: {message}")]
    ProcessCreation { path: PathBuf, message: String },

    /// A shell activation failed.
    #[error("shell activation of '{item}' failed: {message}")]
    ShellActivation { item: String, message: String },

    /// No matching package, or the package has no activatable entry.
    #[error("package activation of '{package}' failed: {message}")]
    PackageActivation { package: String, message: String },

    /// The operation is not available on this backend.
    #[error("{operation} is not supported by this activation backend")]
    Unsupported { operation: &'static str },
}

impl ActivationError {
    /// A short human-readable message, used when recording launch errors.
    pub fn message(&self) -> String {
        match self {
            ActivationError::ProcessCreation { message, .. } => message.clone(),
            ActivationError::ShellActivation { message, .. } => message.clone(),
            ActivationError::PackageActivation { message, .. } => message.clone(),
            ActivationError::Unsupported { operation } => {
                format!("{} is not supported", operation)
            }
        }
    }
}

/// The verb a shell activation runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellVerb {
    /// Default open semantics.
    Open,
    /// Elevated launch.
    RunAs,
}

/// Primitive launch operations consumed by the launch engine.
pub trait AppActivator: Send + Sync {
    /// Starts the executable at `path` directly, minimized and without
    /// activation, with the given argument string and working directory.
    ///
    /// The spawned process handle is released immediately; launched
    /// processes are not tracked.
    fn create_process(
        &self,
        path: &Path,
        args: &str,
        working_dir: Option<&Path>,
    ) -> Result<(), ActivationError>;

    /// Activates a shell item (a file path, a `shell:` reference, or a URI
    /// with a protocol scheme) with the given verb.
    fn shell_execute(
        &self,
        item: &str,
        args: &str,
        working_dir: Option<&Path>,
        verb: ShellVerb,
    ) -> Result<(), ActivationError>;

    /// Activates the first application entry of the installed package with
    /// the given full name.
    fn activate_package(&self, package_full_name: &str) -> Result<(), ActivationError>;

    /// Whether a file exists at `path`.
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// [`AppActivator`] backed by `std::process`.
#[derive(Debug, Default)]
pub struct NativeActivator;

impl NativeActivator {
    pub fn new() -> Self {
        NativeActivator
    }
}

impl AppActivator for NativeActivator {
    fn create_process(
        &self,
        path: &Path,
        args: &str,
        working_dir: Option<&Path>,
    ) -> Result<(), ActivationError> {
        let mut command = Command::new(path);
        command
            .args(args.split_whitespace())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        // The child handle is dropped on purpose; the window system, not
        // the process table, is the source of truth for what launched.
        match command.spawn() {
            Ok(child) => {
                debug!(path = %path.display(), pid = child.id(), "process started");
                Ok(())
            }
            Err(e) => Err(ActivationError::ProcessCreation {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    fn shell_execute(
        &self,
        _item: &str,
        _args: &str,
        _working_dir: Option<&Path>,
        _verb: ShellVerb,
    ) -> Result<(), ActivationError> {
        Err(ActivationError::Unsupported {
            operation: "shell_execute",
        })
    }

    fn activate_package(&self, _package_full_name: &str) -> Result<(), ActivationError> {
        Err(ActivationError::Unsupported {
            operation: "activate_package",
        })
    }
}

/// A recorded activation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationCall {
    CreateProcess {
        path: PathBuf,
        args: String,
        working_dir: Option<PathBuf>,
    },
    ShellExecute {
        item: String,
        args: String,
        elevated: bool,
    },
    ActivatePackage {
        package: String,
    },
}

type ActivationHook =
    Box<dyn Fn(&ActivationCall) -> Result<(), ActivationError> + Send + Sync + 'static>;

/// Scriptable [`AppActivator`] for tests.
///
/// Every call is recorded. By default all operations succeed and every
/// path exists; outcomes are overridden with [`FakeActivator::set_hook`]
/// and [`FakeActivator::set_existing_paths`].
pub struct FakeActivator {
    calls: std::sync::Mutex<Vec<ActivationCall>>,
    existing_paths: std::sync::Mutex<Option<Vec<PathBuf>>>,
    hook: std::sync::Mutex<Option<ActivationHook>>,
}

impl Default for FakeActivator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeActivator {
    pub fn new() -> Self {
        FakeActivator {
            calls: std::sync::Mutex::new(Vec::new()),
            existing_paths: std::sync::Mutex::new(None),
            hook: std::sync::Mutex::new(None),
        }
    }

    /// Restricts `path_exists` to the given set. Without this, every path
    /// exists.
    pub fn set_existing_paths(&self, paths: Vec<PathBuf>) {
        *self.existing_paths.lock().unwrap() = Some(paths);
    }

    /// Installs a hook deciding the outcome of every activation call. The
    /// hook also runs for calls that should have side effects (tests use
    /// it to make windows appear when a launch happens).
    pub fn set_hook<F>(&self, hook: F)
    where
        F: Fn(&ActivationCall) -> Result<(), ActivationError> + Send + Sync + 'static,
    {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ActivationCall> {
        self.calls.lock().unwrap().clone()
    }

    fn dispatch(&self, call: ActivationCall) -> Result<(), ActivationError> {
        let result = match &*self.hook.lock().unwrap() {
            Some(hook) => hook(&call),
            None => Ok(()),
        };
        self.calls.lock().unwrap().push(call);
        result
    }
}

impl AppActivator for FakeActivator {
    fn create_process(
        &self,
        path: &Path,
        args: &str,
        working_dir: Option<&Path>,
    ) -> Result<(), ActivationError> {
        self.dispatch(ActivationCall::CreateProcess {
            path: path.to_path_buf(),
            args: args.to_string(),
            working_dir: working_dir.map(Path::to_path_buf),
        })
    }

    fn shell_execute(
        &self,
        item: &str,
        args: &str,
        _working_dir: Option<&Path>,
        verb: ShellVerb,
    ) -> Result<(), ActivationError> {
        self.dispatch(ActivationCall::ShellExecute {
            item: item.to_string(),
            args: args.to_string(),
            elevated: verb == ShellVerb::RunAs,
        })
    }

    fn activate_package(&self, package_full_name: &str) -> Result<(), ActivationError> {
        self.dispatch(ActivationCall::ActivatePackage {
            package: package_full_name.to_string(),
        })
    }

    fn path_exists(&self, path: &Path) -> bool {
        match &*self.existing_paths.lock().unwrap() {
            Some(paths) => paths.iter().any(|p| p == path),
            None => true,
        }
    }
}
