//! Host operating system detection and per-OS defaults.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::font::FontSource;
use crate::resources::package::PackageManager;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Any Linux distribution.
    Linux,
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Whether the host is Arch Linux (pacman available).
    pub is_arch: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            is_arch: Self::detect_arch(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, is_arch: bool) -> Self {
        Self { os, is_arch }
    }

    /// The package manager used to resolve missing commands, if any.
    #[must_use]
    pub const fn package_manager(&self) -> Option<PackageManager> {
        match self.os {
            Os::Windows => Some(PackageManager::Winget),
            Os::MacOs => Some(PackageManager::Brew),
            Os::Linux if self.is_arch => Some(PackageManager::Pacman),
            Os::Linux => None,
        }
    }

    /// Where installed fonts are listed on this platform.
    #[must_use]
    pub fn font_source(&self) -> FontSource {
        match self.os {
            Os::Windows => FontSource::windows_defaults(),
            Os::Linux | Os::MacOs => FontSource::FontConfig,
        }
    }

    /// Default shell profile script that receives prompt init lines.
    #[must_use]
    pub fn default_profile_path(&self, home: &Path) -> PathBuf {
        match self.os {
            Os::Windows => home
                .join("Documents")
                .join("PowerShell")
                .join("Microsoft.PowerShell_profile.ps1"),
            Os::MacOs => home.join(".zshrc"),
            Os::Linux => home.join(".bashrc"),
        }
    }

    /// Default prompt initialisation line for the platform's shell.
    #[must_use]
    pub const fn default_prompt_init_line(&self) -> &'static str {
        match self.os {
            Os::Windows => "oh-my-posh init pwsh | Invoke-Expression",
            Os::MacOs => "eval \"$(oh-my-posh init zsh)\"",
            Os::Linux => "eval \"$(oh-my-posh init bash)\"",
        }
    }

    /// Default Windows Terminal settings file.
    ///
    /// Only meaningful on Windows; other platforms get a path that will not
    /// exist, which handlers treat as "terminal not installed".
    #[must_use]
    pub fn default_terminal_settings_path(&self, home: &Path) -> PathBuf {
        home.join("AppData")
            .join("Local")
            .join("Packages")
            .join("Microsoft.WindowsTerminal_8wekyb3d8bbwe")
            .join("LocalState")
            .join("settings.json")
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }

    fn detect_arch() -> bool {
        if cfg!(target_os = "linux") {
            Path::new("/etc/arch-release").exists()
        } else {
            false
        }
    }
}
