use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::{friendly_name, BlockDevice, DiskProvider};
use crate::util::{is_hidden, read_optional_string, read_u64};
use crate::{Error, Result};

const LOGIC_SECTOR_SIZE: u64 = 512;

// prefix of a directory above the resolved device -> transport name used by lsblk
const TRANSPORTS: &[(&str, &str)] = &[
    ("usb", "usb"),
    ("nvme", "nvme"),
    ("ata", "sata"),
    ("virtio", "virtio"),
    ("mmc_host", "mmc"),
];

/// Lists the entries of `/sys/block`, skipping loop devices.
pub struct SysfsBlock {
    root: PathBuf,
}

impl Default for SysfsBlock {
    fn default() -> Self {
        Self::new("/sys/block")
    }
}

impl SysfsBlock {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn block(&self, name: &OsStr) -> Result<Option<BlockDevice>> {
        let name = name.to_str().ok_or_else(Error::invalid_block_name)?;
        if name.starts_with("loop") {
            return Ok(None);
        }

        let dir = self.root.join(name);
        let size_bytes = read_u64(dir.join("size"))? * LOGIC_SECTOR_SIZE;
        let model = read_optional_string(dir.join("device/model"));
        let vendor = read_optional_string(dir.join("device/vendor"));

        Ok(Some(BlockDevice::new(
            name,
            friendly_name(vendor.as_deref(), model.as_deref()),
            transport(&dir),
            size_bytes,
        )))
    }
}

impl DiskProvider for SysfsBlock {
    fn disks(&self) -> Result<Vec<BlockDevice>> {
        let mut ret = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();

        for entry in walker.filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("skipping block device: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            match self.block(entry.file_name()) {
                Ok(Some(block)) => ret.push(block),
                Ok(None) => {}
                Err(e) => debug!("skipping block device: {e}"),
            }
        }

        Ok(ret)
    }
}

fn transport(dir: &Path) -> &'static str {
    let Ok(resolved) = std::fs::canonicalize(dir) else {
        return "";
    };
    // the device's own name says nothing about its bus, only its parents do
    let Some(parent) = resolved.parent() else {
        return "";
    };
    let parents: Vec<_> = parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();

    TRANSPORTS
        .iter()
        .find(|(prefix, _)| parents.iter().any(|name| name.starts_with(prefix)))
        .map(|(_, name)| *name)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn device(root: &Path, name: &str, sectors: &str, model: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("device")).unwrap();
        fs::write(dir.join("size"), sectors).unwrap();
        if let Some(model) = model {
            fs::write(dir.join("device/model"), model).unwrap();
        }
    }

    #[test]
    fn lists_block_devices() {
        let root = tempfile::tempdir().unwrap();
        device(root.path(), "sda", "976773168\n", Some("Samsung SSD 860\n"));
        device(root.path(), "nvme0n1", "1953525168\n", None);
        device(root.path(), "loop0", "8\n", None);
        fs::create_dir(root.path().join(".hidden")).unwrap();

        let disks = SysfsBlock::new(root.path()).disks().unwrap();
        assert_eq!(
            disks,
            vec![
                BlockDevice::new("nvme0n1", "", "", 1953525168 * 512),
                BlockDevice::new("sda", "Samsung SSD 860", "", 976773168 * 512),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn transport_from_resolved_link() {
        let root = tempfile::tempdir().unwrap();
        let ata = root
            .path()
            .join("devices/pci0000:00/0000:00:17.0/ata1/host0/target0:0:0/0:0:0:0/block");
        device(&ata, "sda", "976773168\n", Some("Samsung SSD 860\n"));
        let nvme = root.path().join("devices/pci0000:00/0000:00:1d.0/nvme/nvme0");
        device(&nvme, "nvme0n1", "1953525168\n", None);

        let block = root.path().join("block");
        fs::create_dir(&block).unwrap();
        std::os::unix::fs::symlink(ata.join("sda"), block.join("sda")).unwrap();
        std::os::unix::fs::symlink(nvme.join("nvme0n1"), block.join("nvme0n1")).unwrap();

        let disks = SysfsBlock::new(&block).disks().unwrap();
        assert_eq!(
            disks,
            vec![
                BlockDevice::new("nvme0n1", "", "nvme", 1953525168 * 512),
                BlockDevice::new("sda", "Samsung SSD 860", "sata", 976773168 * 512),
            ]
        );
    }

    #[test]
    fn skips_unreadable_devices() {
        let root = tempfile::tempdir().unwrap();
        device(root.path(), "sda", "garbage", None);
        fs::create_dir(root.path().join("sdb")).unwrap();

        assert!(SysfsBlock::new(root.path()).disks().unwrap().is_empty());
    }

    #[test]
    fn missing_root() {
        let root = tempfile::tempdir().unwrap();
        let disks = SysfsBlock::new(root.path().join("block")).disks().unwrap();
        assert!(disks.is_empty());
    }
}
