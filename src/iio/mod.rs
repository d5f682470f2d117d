//! Channel and attribute descriptors walked by the exposition layer.
//!
//! A device is described by a static [`DeviceDescriptor`]: its channels, each carrying its own
//! attribute list, plus device-wide attributes not tied to any channel. Attributes name their
//! accessors through a per-device accessor type `A` (usually a fieldless enum), which the device
//! resolves in its [`IioDevice`] implementation.

use std::fmt;

mod value;
mod dispatch;

pub use value::Value;
pub use dispatch::{
    IioDevice,
    read_channel_attr,
    write_channel_attr,
    read_device_attr,
    write_device_attr,
    show_channel_attr,
    store_channel_attr,
    show_device_attr,
    store_device_attr,
    debug_reg_read,
    debug_reg_write,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Voltage,
    Current,
    AltVoltage,
    AnglVel,
    Temp,
    Capacitance,
}

impl ChannelType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Voltage     => "voltage",
            Self::Current     => "current",
            Self::AltVoltage  => "altvoltage",
            Self::AnglVel     => "anglvel",
            Self::Temp        => "temp",
            Self::Capacitance => "capacitance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Input  => "in",
            Self::Output => "out",
        }
    }
}

/// How many sibling channels see the same attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shared {
    #[default]
    Separate,
    ByType,
    ByDirection,
    ByAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<A: 'static> {
    pub name: &'static str,
    pub shared: Shared,
    pub show: Option<A>,
    pub store: Option<A>,
}

impl<A> Attribute<A> {
    /// An attribute with no accessors bound.
    pub const fn new(name: &'static str, shared: Shared) -> Self {
        Attribute { name, shared, show: None, store: None }
    }

    pub const fn read_only(name: &'static str, shared: Shared, show: A) -> Self {
        Attribute { name, shared, show: Some(show), store: None }
    }

    pub const fn write_only(name: &'static str, shared: Shared, store: A) -> Self {
        Attribute { name, shared, show: None, store: Some(store) }
    }

    pub const fn read_write(name: &'static str, shared: Shared, show: A, store: A) -> Self {
        Attribute { name, shared, show: Some(show), store: Some(store) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
}

/// Layout of a sample in a bulk transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanType {
    pub sign: Sign,
    pub realbits: u8,
    pub storagebits: u8,
    pub shift: u8,
    pub big_endian: bool,
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}{}/{}>>{}",
            if self.big_endian { "be" } else { "le" },
            match self.sign { Sign::Signed => 's', Sign::Unsigned => 'u' },
            self.realbits, self.storagebits, self.shift)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel<A: 'static> {
    pub ch_type: ChannelType,
    pub index: u16,
    /// Negative input of a differential channel.
    pub index2: Option<u16>,
    pub direction: Direction,
    pub differential: bool,
    pub indexed: bool,
    /// Label inserted into attribute names, e.g. `supply` in `in_voltage1_supply_raw`.
    pub extend_name: Option<&'static str>,
    /// Driver specific selector.
    pub address: u32,
    pub scan_type: Option<ScanType>,
    pub attributes: &'static [Attribute<A>],
}

impl<A> Channel<A> {
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute<A>> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Name under which `attr` of this channel is exposed.
    pub fn attribute_path(&self, attr: &Attribute<A>) -> String {
        let dir = self.direction.prefix();
        let ty = self.ch_type.name();
        match attr.shared {
            Shared::ByAll => attr.name.to_owned(),
            Shared::ByDirection => format!("{}_{}", dir, attr.name),
            Shared::ByType if self.differential =>
                format!("{}_{}-{}_{}", dir, ty, ty, attr.name),
            Shared::ByType => format!("{}_{}_{}", dir, ty, attr.name),
            Shared::Separate => {
                let mut path = format!("{}_{}", dir, ty);
                if self.indexed {
                    path += &self.index.to_string();
                }
                if let (true, Some(index2)) = (self.differential, self.index2) {
                    path += &format!("-{}{}", ty, index2);
                }
                if let Some(extend_name) = self.extend_name {
                    path += "_";
                    path += extend_name;
                }
                path + "_" + attr.name
            }
        }
    }

    fn shares_with(&self, other: &Channel<A>, shared: Shared) -> bool {
        match shared {
            Shared::Separate => false,
            Shared::ByType => self.ch_type == other.ch_type &&
                self.direction == other.direction &&
                self.differential == other.differential,
            Shared::ByDirection => self.direction == other.direction,
            Shared::ByAll => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeviceDescriptor<A: 'static> {
    pub channels: &'static [Channel<A>],
    pub attributes: &'static [Attribute<A>],
    /// Whether raw register access is available for diagnostics.
    pub debug_registers: bool,
}

/// One entry of the exposed attribute namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedAttribute<A: 'static> {
    pub path: String,
    /// Channel through which the attribute is reached, or `None` for device attributes.
    pub channel: Option<&'static Channel<A>>,
    pub attribute: &'static Attribute<A>,
}

impl<A> DeviceDescriptor<A> {
    pub fn find_channel(&self, ch_type: ChannelType, index: u16, differential: bool)
            -> Option<&'static Channel<A>> {
        self.channels.iter().find(|channel| {
            channel.ch_type == ch_type &&
                channel.index == index &&
                channel.differential == differential
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&'static Attribute<A>> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Every distinct exposed attribute, in channel order. A shared attribute is listed once,
    /// reached through the first channel that carries it.
    pub fn exposed_attributes(&self) -> Vec<ExposedAttribute<A>> {
        let channels: &'static [Channel<A>] = self.channels;
        let mut exposed = Vec::new();
        for (position, channel) in channels.iter().enumerate() {
            for attribute in channel.attributes {
                let shadowed = channels[..position].iter().any(|earlier| {
                    earlier.shares_with(channel, attribute.shared) &&
                        earlier.attribute(attribute.name)
                            .is_some_and(|other| other.shared == attribute.shared)
                });
                if !shadowed {
                    exposed.push(ExposedAttribute {
                        path: channel.attribute_path(attribute),
                        channel: Some(channel),
                        attribute,
                    })
                }
            }
        }
        for attribute in self.attributes {
            exposed.push(ExposedAttribute {
                path: attribute.name.to_owned(),
                channel: None,
                attribute,
            })
        }
        exposed
    }
}
