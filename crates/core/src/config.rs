use crate::area::AreaSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{value, DocumentMut};

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, bool);

macro_rules! gen_config {
    (
        $( $(#[doc = $doc:literal])* $name:ident: $type:ty = $default:expr ),* $(,)?
    ) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct SessionConfig {
            $(
                $(#[doc = $doc])*
                pub $name: $type,
            )*
        }

        impl Default for SessionConfig {
            fn default() -> Self {
                Self {
                    $( $name: $default, )*
                }
            }
        }

        impl SessionConfig {
            /// Reads `config_file`, writing back any keys that were missing
            /// with their default values. A missing file is created.
            pub fn load(config_file: impl AsRef<Path>) -> anyhow::Result<SessionConfig> {
                let path = config_file.as_ref();
                let str = match fs::read_to_string(path) {
                    Ok(str) => str,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => {
                        return Err(err).with_context(|| format!("failed to read {}", path.display()))
                    }
                };
                let mut doc = str
                    .parse::<DocumentMut>()
                    .with_context(|| format!("failed to parse {}", path.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    fs::write(path, &patched)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }

                toml::from_str(&patched)
                    .with_context(|| format!("invalid configuration in {}", path.display()))
            }
        }
    };
}

gen_config! {
    command_prefix: String = ".".to_string(),
    /// Ticks between retries of an unfinished border pass.
    area_retry_interval: i64 = 20,
    area_max_scan_attempts: i64 = 100,
    /// Largest side length `BuildBorder` accepts.
    area_max_side_length: i64 = 512,
    /// Radius, in chunks, kept loaded around the console player.
    view_distance: i64 = 4,
    chunks_per_tick: i64 = 1,
    tps: i64 = 20,
    debug: bool = false,
    ground_height: i64 = 64,
    admin_tag: String = "tagAdmin".to_string(),
}

impl SessionConfig {
    pub fn area_settings(&self) -> AreaSettings {
        AreaSettings {
            retry_interval: self.area_retry_interval.clamp(1, u32::MAX as i64) as u32,
            max_scan_attempts: self.area_max_scan_attempts.clamp(0, u32::MAX as i64) as u32,
            max_side_length: self.area_max_side_length.clamp(3, 65_536) as u32,
            ..AreaSettings::default()
        }
    }
}
