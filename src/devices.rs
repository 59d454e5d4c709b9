use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceCategory {
    #[serde(rename = "iPhone")]
    IPhone,
    Android,
    #[serde(rename = "iPad")]
    IPad,
    Desktop,
    Custom,
}

impl DeviceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceCategory::IPhone => "iPhone",
            DeviceCategory::Android => "Android",
            DeviceCategory::IPad => "iPad",
            DeviceCategory::Desktop => "Desktop",
            DeviceCategory::Custom => "Custom",
        }
    }
}

/// A named screen resolution. `Custom` has no fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub category: DeviceCategory,
}

impl Device {
    const fn sized(name: &'static str, width: u32, height: u32, category: DeviceCategory) -> Self {
        Self {
            name,
            width: Some(width),
            height: Some(height),
            category,
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

pub static DEVICES: [Device; 17] = [
    Device::sized("iPhone 15 Pro Max", 1290, 2796, DeviceCategory::IPhone),
    Device::sized("iPhone 15 Pro / 15", 1179, 2556, DeviceCategory::IPhone),
    Device::sized("iPhone 14 Plus / 13 Pro Max", 1284, 2778, DeviceCategory::IPhone),
    Device::sized("iPhone 14 / 13 / 12", 1170, 2532, DeviceCategory::IPhone),
    Device::sized("iPhone SE (3rd gen)", 750, 1334, DeviceCategory::IPhone),
    Device::sized("Samsung Galaxy S24 Ultra", 1440, 3120, DeviceCategory::Android),
    Device::sized("Samsung Galaxy S24", 1080, 2340, DeviceCategory::Android),
    Device::sized("Google Pixel 8 Pro", 1344, 2992, DeviceCategory::Android),
    Device::sized("Google Pixel 8", 1080, 2400, DeviceCategory::Android),
    Device::sized("OnePlus 12", 1440, 3168, DeviceCategory::Android),
    Device::sized("iPad Pro 12.9\"", 2048, 2732, DeviceCategory::IPad),
    Device::sized("iPad Pro 11\"", 1668, 2388, DeviceCategory::IPad),
    Device::sized("iPad Air", 1640, 2360, DeviceCategory::IPad),
    Device::sized("MacBook Pro 14\"", 3024, 1964, DeviceCategory::Desktop),
    Device::sized("4K Desktop", 3840, 2160, DeviceCategory::Desktop),
    Device::sized("1080p Desktop", 1920, 1080, DeviceCategory::Desktop),
    Device {
        name: "Custom",
        width: None,
        height: None,
        category: DeviceCategory::Custom,
    },
];

/// Looks a device up by name, ignoring ASCII case.
pub fn device(name: &str) -> Option<&'static Device> {
    let name = name.trim();
    DEVICES
        .iter()
        .find(|device| device.name == name)
        .or_else(|| DEVICES.iter().find(|device| device.name.eq_ignore_ascii_case(name)))
}

pub fn devices_by_category(category: DeviceCategory) -> Vec<&'static Device> {
    DEVICES
        .iter()
        .filter(|device| device.category == category)
        .collect()
}
