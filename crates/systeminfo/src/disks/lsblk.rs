use super::{friendly_name, BlockDevice, DiskProvider, SysfsBlock};
use crate::util::run;
use crate::{Error, Result};

const LSBLK: &str = "lsblk";
// whole disks only, loop devices (major 7) excluded, sizes in bytes
const LSBLK_ARGS: &[&str] = &["-J", "-b", "-d", "-e", "7", "-o", "NAME,MODEL,VENDOR,TRAN,SIZE"];

/// Lists disks with `lsblk`, falling back to sysfs when the utility is not
/// installed.
#[derive(Default)]
pub struct Lsblk {
    fallback: SysfsBlock,
}

impl DiskProvider for Lsblk {
    fn disks(&self) -> Result<Vec<BlockDevice>> {
        match run(LSBLK, LSBLK_ARGS) {
            Ok(stdout) => parse(&stdout),
            Err(e) if e.is_not_found() => {
                warn!("{LSBLK} is not installed, reading block devices from sysfs");
                self.fallback.disks()
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Deserialize)]
struct Output {
    blockdevices: Vec<Device>,
}

#[derive(Deserialize)]
struct Device {
    name: String,
    model: Option<String>,
    vendor: Option<String>,
    tran: Option<String>,
    size: Option<Size>,
}

/// Older util-linux releases print every column as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Size {
    Bytes(u64),
    Text(String),
}

fn parse(stdout: &str) -> Result<Vec<BlockDevice>> {
    let output: Output = serde_json::from_str(stdout).map_err(|e| Error::output(e, LSBLK))?;

    output
        .blockdevices
        .into_iter()
        .map(|device| {
            let size_bytes = match device.size {
                Some(Size::Bytes(bytes)) => bytes,
                Some(Size::Text(text)) => text
                    .trim()
                    .parse()
                    .map_err(|e| Error::output(e, LSBLK))?,
                None => 0,
            };

            Ok(BlockDevice::new(
                device.name,
                friendly_name(device.vendor.as_deref(), device.model.as_deref()),
                device.tran.unwrap_or_default(),
                size_bytes,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_sizes() {
        let stdout = r#"{
           "blockdevices": [
              {"name":"sda", "model":"Samsung SSD 860 EVO 500GB", "vendor":"ATA     ", "tran":"sata", "size":500107862016},
              {"name":"nvme0n1", "model":"WDS100T3X0C-00SJG0", "vendor":null, "tran":"nvme", "size":1000204886016}
           ]
        }"#;

        let disks = parse(stdout).unwrap();
        assert_eq!(
            disks,
            vec![
                BlockDevice::new("sda", "ATA Samsung SSD 860 EVO 500GB", "sata", 500107862016),
                BlockDevice::new("nvme0n1", "WDS100T3X0C-00SJG0", "nvme", 1000204886016),
            ]
        );
    }

    #[test]
    fn parse_string_sizes() {
        let stdout = r#"{"blockdevices": [
            {"name": "vda", "model": null, "vendor": "0x1af4", "tran": null, "size": "21474836480"}
        ]}"#;

        let disks = parse(stdout).unwrap();
        assert_eq!(disks, vec![BlockDevice::new("vda", "0x1af4", "", 21474836480)]);
    }

    #[test]
    fn parse_empty() {
        assert!(parse(r#"{"blockdevices": []}"#).unwrap().is_empty());
    }

    #[test]
    fn parse_garbage() {
        assert!(parse("NAME MODEL VENDOR TRAN SIZE").is_err());
        assert!(parse(r#"{"blockdevices": [{"name": "sda", "size": "big"}]}"#).is_err());
    }
}
