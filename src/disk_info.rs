use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

/// Usage of the filesystem holding `path`, via statvfs.
pub fn get_disk_info(path: &Path) -> Option<DiskInfo> {
    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let stat = unsafe { stat.assume_init() };
    let block_size = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * block_size;
    let available = stat.f_bavail as u64 * block_size;
    let used = total.saturating_sub(available);
    Some(DiskInfo {
        total,
        available,
        used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_capacity() {
        let info = get_disk_info(Path::new("/")).expect("statvfs on /");
        assert!(info.total > 0);
        assert!(info.used <= info.total);
    }

    #[test]
    fn test_missing_path() {
        assert!(get_disk_info(Path::new("/nonexistent_sysopt_root_12345")).is_none());
    }
}
