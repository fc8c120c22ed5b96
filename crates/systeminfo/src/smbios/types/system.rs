use super::super::{ChassisType, Structure, Version};

macro_rules! string_fields {
    ($($(#[$meta:meta])* $name:ident = $offset:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<&'a str> {
                self.structure.string_at($offset)
            }
        )*
    };
}

/// BIOS Information (type 0).
#[derive(Copy, Clone, Debug)]
pub struct Bios<'a> {
    structure: &'a Structure,
}

impl<'a> Bios<'a> {
    pub fn new(structure: &'a Structure) -> Self {
        Self { structure }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    string_fields! {
        vendor = 0x04;
        version = 0x05;
        release_date = 0x08;
    }
}

/// System Information (type 1).
#[derive(Copy, Clone, Debug)]
pub struct System<'a> {
    structure: &'a Structure,
    version: Version,
}

impl<'a> System<'a> {
    pub fn new(structure: &'a Structure, version: Version) -> Self {
        Self { structure, version }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    string_fields! {
        manufacturer = 0x04;
        product_name = 0x05;
        version = 0x06;
        serial_number = 0x07;
    }

    /// Defined from SMBIOS 2.4.
    pub fn sku_number(&self) -> Option<&'a str> {
        self.since(2, 4)
            .then(|| self.structure.string_at(0x19))
            .flatten()
    }

    /// Defined from SMBIOS 2.4.
    pub fn family(&self) -> Option<&'a str> {
        self.since(2, 4)
            .then(|| self.structure.string_at(0x1A))
            .flatten()
    }

    fn since(&self, major: u8, minor: u8) -> bool {
        self.version.at_least(major, minor)
    }
}

/// Baseboard (or Module) Information (type 2).
#[derive(Copy, Clone, Debug)]
pub struct Baseboard<'a> {
    structure: &'a Structure,
}

impl<'a> Baseboard<'a> {
    pub fn new(structure: &'a Structure) -> Self {
        Self { structure }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    string_fields! {
        manufacturer = 0x04;
        product = 0x05;
        version = 0x06;
        serial_number = 0x07;
        asset_tag = 0x08;
    }
}

/// System Enclosure or Chassis (type 3).
#[derive(Copy, Clone, Debug)]
pub struct Enclosure<'a> {
    structure: &'a Structure,
}

impl<'a> Enclosure<'a> {
    pub fn new(structure: &'a Structure) -> Self {
        Self { structure }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    string_fields! {
        manufacturer = 0x04;
        version = 0x06;
        serial_number = 0x07;
        asset_tag = 0x08;
    }

    pub fn chassis_type(&self) -> Option<ChassisType> {
        self.structure.formatted().u8(0x05).map(ChassisType)
    }
}
