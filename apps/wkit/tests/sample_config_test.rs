// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

#![allow(clippy::expect_used)]

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use std::path::PathBuf;
use wirekit_runner::config::{LogFormat, LogLevel};

fn repo_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|parent| parent.parent())
        .expect("wirekit-runner should live under workspace_root/apps/wkit")
        .to_path_buf()
}

#[test]
fn samples_wkit_toml_parses_and_matches_expected_defaults() {
    let sample_path = repo_root().join("samples/wkit.toml");

    let figment = Figment::new().merge(Serialized::defaults(wirekit_runner::Config::default()));
    let config: wirekit_runner::Config = match figment.merge(Toml::file(&sample_path)).extract() {
        Ok(cfg) => cfg,
        Err(e) => panic!("samples/wkit.toml should parse as wirekit_runner::Config: {e}"),
    };

    assert!(config.log.console_enable);
    assert_eq!(config.log.console_level, LogLevel::Info);
    assert!(!config.log.file_enable);
    assert_eq!(config.log.file_format, LogFormat::Text);
    assert_eq!(config.engine, wirekit_engine::EngineConfig::default());
}

#[test]
fn default_node_catalogue_covers_wireless_kinds() {
    let kinds: Vec<String> =
        wirekit_runner::runner::node_definitions().into_iter().map(|d| d.kind).collect();
    for kind in [
        "core::constant",
        "core::debug",
        "wireless::debug",
        "wireless::input",
        "wireless::manager",
        "wireless::output",
        "wireless::relay",
    ] {
        assert!(kinds.iter().any(|k| k == kind), "missing {kind} in {kinds:?}");
    }
}
