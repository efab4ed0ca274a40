//! Tag command implementation

use std::process::ExitCode;

use crate::config::SpritegroupConfig;
use crate::models::MeshType;
use crate::policy::PackerPolicy;

use super::EXIT_SUCCESS;

/// Describe how a packing tag is parsed and packed under the configured policy.
pub fn describe_tag(tag: &str, config: &SpritegroupConfig) -> String {
    let policy = PackerPolicy::from_config(config);
    let parsed = policy.tag_parser().parse(tag);

    let mut lines = vec![
        format!("Tag:      {:?}", tag),
        format!("Atlas:    {}", parsed.atlas_name),
        format!(
            "Prefix:   {:?} ({}, {})",
            policy.tag_parser().prefix(),
            if parsed.prefixed { "matched" } else { "not matched" },
            if config.policy.case_sensitive { "case-sensitive" } else { "ignoring case" }
        ),
    ];
    for mesh_type in [MeshType::Tight, MeshType::FullRect] {
        let mode = policy.packing_modes().resolve(mesh_type, parsed.prefixed);
        lines.push(format!("Mesh {:<10} -> {}", mesh_type, mode));
    }
    lines.join("\n")
}

/// Execute the tag command
pub fn run_tag(tag: &str, config: &SpritegroupConfig) -> ExitCode {
    println!("{}", describe_tag(tag, config));
    ExitCode::from(EXIT_SUCCESS)
}
