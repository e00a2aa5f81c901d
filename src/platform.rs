//! OS integration: elevation, recycle bin, restarts.
//!
//! The real implementations are Windows shell calls; other platforms get
//! no-op fallbacks so the crate (and its tests) still build everywhere.

use std::process::Command;

use anyhow::Result;

/// Relaunch the current executable with the same arguments. The caller is
/// expected to quit afterwards.
pub fn restart_app() -> std::io::Result<()> {
    let exe = std::env::current_exe()?;
    Command::new(exe).args(std::env::args().skip(1)).spawn()?;
    Ok(())
}

#[cfg(windows)]
mod imp {
    use std::ffi::OsStr;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    use std::process::Command;

    use anyhow::{Result, anyhow};
    use windows::Win32::UI::Shell::{
        IsUserAnAdmin, SHEmptyRecycleBinW, SHERB_NOCONFIRMATION, SHERB_NOPROGRESSUI, SHERB_NOSOUND,
        ShellExecuteW,
    };
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::{PCWSTR, w};

    fn to_wide(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(once(0)).collect()
    }

    pub fn is_elevated() -> bool {
        unsafe { IsUserAnAdmin().as_bool() }
    }

    /// Relaunch the current executable through UAC with the `runas` verb.
    pub fn relaunch_elevated() -> Result<()> {
        let exe = std::env::current_exe()?;
        let parameters = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
        let exe_wide = to_wide(exe.as_os_str());
        let parameters_wide = to_wide(OsStr::new(&parameters));
        let instance = unsafe {
            ShellExecuteW(
                None,
                w!("runas"),
                PCWSTR(exe_wide.as_ptr()),
                PCWSTR(parameters_wide.as_ptr()),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };
        // ShellExecuteW reports success as a value greater than 32.
        let code = instance.0 as isize;
        if code > 32 {
            Ok(())
        } else {
            Err(anyhow!("elevation was refused (code {code})"))
        }
    }

    pub fn empty_recycle_bin() -> Result<()> {
        unsafe {
            SHEmptyRecycleBinW(
                None,
                PCWSTR::null(),
                SHERB_NOCONFIRMATION | SHERB_NOPROGRESSUI | SHERB_NOSOUND,
            )?;
        }
        Ok(())
    }

    pub fn restart_computer() -> Result<()> {
        Command::new("shutdown").args(["/r", "/t", "0"]).spawn()?;
        Ok(())
    }
}

#[cfg(not(windows))]
mod imp {
    use anyhow::Result;
    use log::warn;

    pub fn is_elevated() -> bool {
        true
    }

    pub fn relaunch_elevated() -> Result<()> {
        Ok(())
    }

    pub fn empty_recycle_bin() -> Result<()> {
        warn!("emptying the recycle bin is not supported on this platform");
        Ok(())
    }

    pub fn restart_computer() -> Result<()> {
        warn!("restarting the computer is not supported on this platform");
        Ok(())
    }
}

pub fn is_elevated() -> bool {
    imp::is_elevated()
}

pub fn relaunch_elevated() -> Result<()> {
    imp::relaunch_elevated()
}

pub fn empty_recycle_bin() -> Result<()> {
    imp::empty_recycle_bin()
}

pub fn restart_computer() -> Result<()> {
    imp::restart_computer()
}
