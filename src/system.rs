//! Properties of the host this process runs on, served to aggregating peers

use std::{env, path::MAIN_SEPARATOR};

use sysinfo::System;

use crate::domain::properties::PropertyMap;

pub fn local_properties() -> PropertyMap {
    let mut properties = PropertyMap::new();

    properties.insert(
        "os.name".to_string(),
        System::name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| os_display_name(env::consts::OS)),
    );
    properties.insert("os.arch".to_string(), env::consts::ARCH.to_string());
    properties.insert("os.family".to_string(), env::consts::FAMILY.to_string());
    properties.insert("file.separator".to_string(), MAIN_SEPARATOR.to_string());
    properties.insert(
        "path.separator".to_string(),
        if cfg!(windows) { ";" } else { ":" }.to_string(),
    );
    properties.insert(
        "line.separator".to_string(),
        if cfg!(windows) { "\r\n" } else { "\n" }.to_string(),
    );
    properties.insert(
        "app.version".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );

    let optional = [
        ("user.name", first_env(&["USER", "USERNAME", "LOGNAME"])),
        ("user.home", first_env(&["HOME", "USERPROFILE"])),
        (
            "user.dir",
            env::current_dir()
                .ok()
                .map(|dir| dir.display().to_string()),
        ),
        ("host.name", host_name()),
        ("os.version", System::long_os_version()),
        ("os.kernel.version", System::kernel_version()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            properties.insert(key.to_string(), value);
        }
    }

    properties
}

fn os_display_name(os: &str) -> String {
    match os {
        "linux" => "Linux",
        "macos" => "Mac OS X",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
    .to_string()
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn host_name() -> Option<String> {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().trim().to_string())
        .filter(|name| !name.is_empty())
}
