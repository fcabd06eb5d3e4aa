/// Whether the current process runs with administrator rights.
///
/// Only meaningful on Windows. Elsewhere links are plain symlinks that need no
/// elevation, so this reports `true`.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use windows_sys::Win32::UI::Shell::IsUserAnAdmin;

    // SAFETY: takes no arguments and only queries the process token.
    unsafe { IsUserAnAdmin() != 0 }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    true
}

/// Whether this session may invoke the link creator.
pub fn can_create(require_admin: bool) -> bool {
    !require_admin || is_elevated()
}
