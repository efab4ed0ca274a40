//! Packer policy integration tests.
//!
//! Drives the full pipeline (resolver -> tag parsing -> packing mode ->
//! grouping -> builder) through the public API with on-disk importer
//! manifests and the recording builder.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use spritegroup::config::{PageConfig, PolicyConfig, SpritegroupConfig};
use spritegroup::job::{AtlasBuilder, JobError, PageRecorder};
use spritegroup::models::{
    AtlasSettings, FilterMode, PackingMode, PackingRotation, SpriteId, TextureFormat,
};
use spritegroup::policy::{PackerPolicy, PolicyError};
use spritegroup::resolver::{BuildTarget, ManifestError, ManifestResolver};

// ============================================================================
// Test Utilities
// ============================================================================

/// Write an importer manifest into `dir`.
fn manifest(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(format!("{}.import.json", name));
    fs::write(&path, json).expect("should write manifest");
    path
}

/// Run `policy` over `manifests` and return the recorded pages.
fn run(policy: &PackerPolicy, target: &str, manifests: &[PathBuf]) -> PageRecorder {
    let mut recorder = PageRecorder::new();
    policy
        .group_atlases(&BuildTarget::new(target), &mut recorder, &ManifestResolver::new(), manifests)
        .expect("policy run should succeed");
    recorder
}

fn page_names(recorder: &PageRecorder) -> Vec<String> {
    recorder.pages().iter().map(|p| p.name.clone()).collect()
}

fn sprites_of(recorder: &PageRecorder, page: &str) -> Vec<String> {
    recorder
        .page(page)
        .unwrap_or_else(|| panic!("missing page {page}"))
        .sprites
        .iter()
        .map(|a| a.sprite.to_string())
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_tight_tagged_enemies() {
    let temp = TempDir::new().unwrap();
    let orc = manifest(
        temp.path(),
        "orc",
        r#"{"texture": "orc.png", "packing_tag": " [TIGHT] Enemies ", "mesh_type": "tight", "sprites": ["orc"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[orc]);
    assert_eq!(page_names(&recorder), vec!["Enemies"]);
    assert_eq!(recorder.pages()[0].sprites[0].mode, PackingMode::Tight);
    assert_eq!(recorder.pages()[0].sprites[0].rotation, PackingRotation::None);
}

#[test]
fn test_untagged_sprite_is_unnamed_rectangle() {
    let temp = TempDir::new().unwrap();
    let rock = manifest(
        temp.path(),
        "rock",
        r#"{"texture": "rock.png", "packing_tag": "", "mesh_type": "tight", "sprites": ["rock"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[rock]);
    assert_eq!(page_names(&recorder), vec!["(unnamed)"]);
    assert_eq!(recorder.pages()[0].sprites[0].mode, PackingMode::Rectangle);
}

#[test]
fn test_heroes_split_by_filter_mode() {
    let temp = TempDir::new().unwrap();
    let a = manifest(
        temp.path(),
        "hero_a",
        r#"{"texture": "a.png", "packing_tag": "Heroes", "filter_mode": "Bilinear", "sprites": ["a"]}"#,
    );
    let b = manifest(
        temp.path(),
        "hero_b",
        r#"{"texture": "b.png", "packing_tag": "Heroes", "filter_mode": "Bilinear", "sprites": ["b"]}"#,
    );
    let c = manifest(
        temp.path(),
        "hero_c",
        r#"{"texture": "c.png", "packing_tag": "Heroes", "filter_mode": "Point", "sprites": ["c"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[a, c, b]);
    assert_eq!(page_names(&recorder), vec!["Heroes (Group 0)", "Heroes (Group 1)"]);
    assert_eq!(sprites_of(&recorder, "Heroes (Group 0)"), vec!["a.png#a", "b.png#b"]);
    assert_eq!(sprites_of(&recorder, "Heroes (Group 1)"), vec!["c.png#c"]);
    assert_eq!(recorder.pages()[1].settings.filter_mode, FilterMode::Point);
}

#[test]
fn test_tag_named_like_group_page_shares_that_page() {
    let temp = TempDir::new().unwrap();
    let a = manifest(
        temp.path(),
        "hero_a",
        r#"{"texture": "a.png", "packing_tag": "Heroes", "sprites": ["a"]}"#,
    );
    let b = manifest(
        temp.path(),
        "hero_b",
        r#"{"texture": "b.png", "packing_tag": "Heroes", "filter_mode": "Point", "sprites": ["b"]}"#,
    );
    let c = manifest(
        temp.path(),
        "boss",
        r#"{"texture": "c.png", "packing_tag": "Heroes (Group 0)", "sprites": ["c"]}"#,
    );
    let manifests = [a, b, c];

    let planned: Vec<String> = PackerPolicy::default()
        .plan_pages(&BuildTarget::default(), &ManifestResolver::new(), &manifests)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(planned, vec!["Heroes (Group 0)", "Heroes (Group 1)", "Heroes (Group 0)"]);

    let recorder = run(&PackerPolicy::default(), "standalone", &manifests);
    assert_eq!(page_names(&recorder), vec!["Heroes (Group 0)", "Heroes (Group 1)"]);
    assert_eq!(sprites_of(&recorder, "Heroes (Group 0)"), vec!["a.png#a", "c.png#c"]);
    assert_eq!(sprites_of(&recorder, "Heroes (Group 1)"), vec!["b.png#b"]);
}

#[test]
fn test_tag_named_like_group_page_with_other_settings_is_rejected() {
    let temp = TempDir::new().unwrap();
    let a = manifest(
        temp.path(),
        "hero_a",
        r#"{"texture": "a.png", "packing_tag": "Heroes", "sprites": ["a"]}"#,
    );
    let b = manifest(
        temp.path(),
        "hero_b",
        r#"{"texture": "b.png", "packing_tag": "Heroes", "filter_mode": "Point", "sprites": ["b"]}"#,
    );
    let c = manifest(
        temp.path(),
        "boss",
        r#"{"texture": "c.png", "packing_tag": "Heroes (Group 0)", "filter_mode": "Trilinear", "sprites": ["c"]}"#,
    );

    let mut recorder = PageRecorder::new();
    let err = PackerPolicy::default()
        .group_atlases(&BuildTarget::default(), &mut recorder, &ManifestResolver::new(), &[a, b, c])
        .unwrap_err();
    assert!(matches!(
        err,
        PolicyError::Build(JobError::ConflictingPage(ref page)) if page == "Heroes (Group 0)"
    ));
}

#[test]
fn test_full_rect_mesh_ignores_tight_tag() {
    let temp = TempDir::new().unwrap();
    let ui = manifest(
        temp.path(),
        "ui",
        r#"{"texture": "ui.png", "packing_tag": "[TIGHT] UI", "mesh_type": "full_rect", "sprites": ["button", "panel"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[ui]);
    assert_eq!(page_names(&recorder), vec!["UI"]);
    assert!(recorder.pages()[0].sprites.iter().all(|a| a.mode == PackingMode::Rectangle));
}

#[test]
fn test_sliced_sheet_keeps_sprite_order() {
    let temp = TempDir::new().unwrap();
    let sheet = manifest(
        temp.path(),
        "sheet",
        r#"{"texture": "sheet.png", "packing_tag": "FX", "sprites": ["f3", "f1", "f2"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[sheet]);
    assert_eq!(sprites_of(&recorder, "FX"), vec!["sheet.png#f3", "sheet.png#f1", "sheet.png#f2"]);
}

#[test]
fn test_importer_without_sprites_contributes_nothing() {
    let temp = TempDir::new().unwrap();
    let plain = manifest(temp.path(), "plain", r#"{"texture": "plain.png", "packing_tag": "Ghost"}"#);

    let recorder = run(&PackerPolicy::default(), "standalone", &[plain]);
    assert!(recorder.pages().is_empty());
}

#[test]
fn test_unnamed_placeholder_and_literal_share_atlas() {
    let temp = TempDir::new().unwrap();
    let empty = manifest(temp.path(), "empty", r#"{"texture": "e.png", "sprites": ["e"]}"#);
    let literal = manifest(
        temp.path(),
        "literal",
        r#"{"texture": "l.png", "packing_tag": "(unnamed)", "sprites": ["l"]}"#,
    );

    let recorder = run(&PackerPolicy::default(), "standalone", &[empty, literal]);
    assert_eq!(page_names(&recorder), vec!["(unnamed)"]);
    assert_eq!(sprites_of(&recorder, "(unnamed)"), vec!["e.png#e", "l.png#l"]);
}

// ============================================================================
// Build targets and configuration
// ============================================================================

#[test]
fn test_platform_override_splits_pages_only_on_that_target() {
    let temp = TempDir::new().unwrap();
    let a = manifest(
        temp.path(),
        "a",
        r#"{"texture": "a.png", "packing_tag": "World", "sprites": ["a"],
            "platforms": {"android": {"format": "ETC2_RGBA8"}}}"#,
    );
    let b = manifest(temp.path(), "b", r#"{"texture": "b.png", "packing_tag": "World", "sprites": ["b"]}"#);
    let inputs = [a, b];

    let standalone = run(&PackerPolicy::default(), "standalone", &inputs);
    assert_eq!(page_names(&standalone), vec!["World"]);

    let android = run(&PackerPolicy::default(), "android", &inputs);
    assert_eq!(page_names(&android), vec!["World (Group 0)", "World (Group 1)"]);
    assert_eq!(android.pages()[0].settings.format, TextureFormat::new("ETC2_RGBA8"));
}

#[test]
fn test_configured_page_constants() {
    let temp = TempDir::new().unwrap();
    let a = manifest(temp.path(), "a", r#"{"texture": "a.png", "packing_tag": "A", "sprites": ["a"]}"#);

    let policy = PackerPolicy::new(
        &PolicyConfig::default(),
        PageConfig { padding_power: 2, max_width: 1024, max_height: 512 },
    );
    let recorder = run(&policy, "standalone", &[a]);
    let settings = &recorder.pages()[0].settings;
    assert!(settings.generate_mip_maps);
    assert_eq!((settings.padding_power, settings.max_width, settings.max_height), (2, 1024, 512));
}

#[test]
fn test_inverted_policy_from_config() {
    let temp = TempDir::new().unwrap();
    let plain = manifest(temp.path(), "plain", r#"{"texture": "p.png", "packing_tag": "Set", "sprites": ["p"]}"#);
    let tagged = manifest(
        temp.path(),
        "tagged",
        r#"{"texture": "t.png", "packing_tag": "[RECT] Set", "sprites": ["t"]}"#,
    );

    let config: SpritegroupConfig = toml::from_str(
        r#"
[policy]
tag_prefix = "[RECT]"
allow_tight_when_tagged = false
"#,
    )
    .unwrap();
    let recorder = run(&PackerPolicy::from_config(&config), "standalone", &[plain, tagged]);

    let page = recorder.page("Set").expect("single Set page");
    assert_eq!(page.sprites[0].mode, PackingMode::Tight);
    assert_eq!(page.sprites[1].mode, PackingMode::Rectangle);
}

// ============================================================================
// Determinism and failures
// ============================================================================

#[test]
fn test_runs_are_idempotent() {
    let temp = TempDir::new().unwrap();
    let mut inputs = Vec::new();
    for i in 0..12 {
        let json = format!(
            r#"{{"texture": "t{i}.png", "packing_tag": "{tag}", "filter_mode": {filter}, "sprites": ["s{i}"]}}"#,
            i = i,
            tag = ["A", "[TIGHT] B", "C"][i % 3],
            filter = i % 4,
        );
        inputs.push(manifest(temp.path(), &format!("t{}", i), &json));
    }

    let first = run(&PackerPolicy::default(), "standalone", &inputs);
    let second = run(&PackerPolicy::default(), "standalone", &inputs);
    assert_eq!(first.pages(), second.pages());

    let total: usize = first.pages().iter().map(|p| p.sprites.len()).sum();
    assert_eq!(total, inputs.len());
}

#[test]
fn test_resolver_failure_aborts_before_builder() {
    let temp = TempDir::new().unwrap();
    let good = manifest(temp.path(), "good", r#"{"texture": "g.png", "sprites": ["g"]}"#);
    let missing = temp.path().join("missing.import.json");

    let mut recorder = PageRecorder::new();
    let err = PackerPolicy::default()
        .group_atlases(
            &BuildTarget::default(),
            &mut recorder,
            &ManifestResolver::new(),
            [good, missing],
        )
        .unwrap_err();

    assert!(matches!(err, PolicyError::Resolve(ManifestError::Io { .. })));
    assert!(recorder.pages().is_empty());
}

/// Rejection from [`NoTrilinear`].
#[derive(Debug, PartialEq, thiserror::Error)]
enum Unsupported {
    #[error("page '{0}' uses trilinear filtering")]
    Trilinear(String),
    #[error(transparent)]
    Job(#[from] JobError),
}

/// Builder that refuses pages with trilinear filtering.
struct NoTrilinear(PageRecorder);

impl AtlasBuilder for NoTrilinear {
    type Error = Unsupported;

    fn declare_page(&mut self, name: &str, settings: &AtlasSettings) -> Result<(), Unsupported> {
        if settings.filter_mode == FilterMode::Trilinear {
            return Err(Unsupported::Trilinear(name.to_string()));
        }
        Ok(self.0.declare_page(name, settings)?)
    }

    fn assign(
        &mut self,
        page_name: &str,
        sprite: &SpriteId,
        mode: PackingMode,
        rotation: PackingRotation,
    ) -> Result<(), Unsupported> {
        Ok(self.0.assign(page_name, sprite, mode, rotation)?)
    }
}

#[test]
fn test_builder_rejection_surfaces_verbatim() {
    let temp = TempDir::new().unwrap();
    let ok = manifest(temp.path(), "ok", r#"{"texture": "ok.png", "packing_tag": "A", "sprites": ["ok"]}"#);
    let tri = manifest(
        temp.path(),
        "tri",
        r#"{"texture": "tri.png", "packing_tag": "B", "filter_mode": 2, "sprites": ["tri"]}"#,
    );

    let mut builder = NoTrilinear(PageRecorder::new());
    let err = PackerPolicy::default()
        .group_atlases(&BuildTarget::default(), &mut builder, &ManifestResolver::new(), [ok, tri])
        .unwrap_err();

    assert_eq!(err.to_string(), "page 'B' uses trilinear filtering");
    match err {
        PolicyError::Build(e) => assert_eq!(e, Unsupported::Trilinear("B".to_string())),
        other => panic!("expected builder error, got {other:?}"),
    }
    assert_eq!(page_names(&builder.0), vec!["A"]);
}
