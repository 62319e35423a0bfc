use fieldconfig::{AntialiasSetting, ColorSpaceSetting, GpuPowerSetting};
use renderer::{Antialiasing, ColorSpaceMode, GpuPowerPreference};

pub fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting.samples() {
        None => Antialiasing::Auto,
        Some(0 | 1) => Antialiasing::Off,
        Some(samples) => Antialiasing::Samples(samples),
    }
}

pub fn map_color_space(setting: ColorSpaceSetting) -> ColorSpaceMode {
    match setting {
        ColorSpaceSetting::Auto => ColorSpaceMode::Auto,
        ColorSpaceSetting::Gamma => ColorSpaceMode::Gamma,
        ColorSpaceSetting::Linear => ColorSpaceMode::Linear,
    }
}

pub fn map_gpu_power(setting: GpuPowerSetting) -> GpuPowerPreference {
    match setting {
        GpuPowerSetting::Low => GpuPowerPreference::Low,
        GpuPowerSetting::High => GpuPowerPreference::High,
    }
}
