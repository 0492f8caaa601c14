//! Platform-specific file time handling.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Set the creation (birth) time of a file.
///
/// Returns `Ok(false)` where the platform has no settable creation time.
#[cfg(windows)]
pub fn set_created(path: &Path, time: SystemTime) -> io::Result<bool> {
    use std::fs::FileTimes;
    use std::os::windows::fs::FileTimesExt;

    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_created(time))?;
    Ok(true)
}

/// Set the creation (birth) time of a file.
///
/// Returns `Ok(false)` where the platform has no settable creation time.
#[cfg(target_os = "macos")]
pub fn set_created(path: &Path, time: SystemTime) -> io::Result<bool> {
    use std::fs::FileTimes;
    use std::os::macos::fs::FileTimesExt;

    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_created(time))?;
    Ok(true)
}

/// Set the creation (birth) time of a file.
///
/// Returns `Ok(false)` where the platform has no settable creation time.
#[cfg(not(any(windows, target_os = "macos")))]
pub fn set_created(path: &Path, _time: SystemTime) -> io::Result<bool> {
    // Birth time is read-only here; still fail on files that are gone.
    File::open(path)?;
    Ok(false)
}
