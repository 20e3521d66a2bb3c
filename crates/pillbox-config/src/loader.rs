use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/pillbox/config.toml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/pillbox/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("pillbox/config.toml"));
    }

    // 3. Workspace-local
    paths.push(PathBuf::from(".pillbox/config.toml"));
    paths.push(PathBuf::from("pillbox.toml"));

    paths
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load configuration by merging all discovered TOML files.
/// The `extra` argument may provide an explicit path (e.g. `--config` CLI flag).
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    load_from(&config_search_paths(), extra)
}

fn load_from(search: &[PathBuf], extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in search {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            merge_toml(&mut merged, read_layer(path)?);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        merge_toml(&mut merged, read_layer(p)?);
    }

    merged.try_into().context("invalid configuration")
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::map::Map::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn val(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val(r#"x = 1"#);
        merge_toml(&mut dst, val(r#"x = 2"#));
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_nested_tables() {
        let mut dst = val("[picker]\ntrigger = \"/\"\nmax_visible = 4");
        merge_toml(&mut dst, val("[picker]\nmax_visible = 12"));
        assert_eq!(dst["picker"]["trigger"].as_str(), Some("/"));
        assert_eq!(dst["picker"]["max_visible"].as_integer(), Some(12));
    }

    #[test]
    fn defaults_when_no_files_present() {
        let config = load_from(&[PathBuf::from("/nonexistent/pillbox.toml")], None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.picker.trigger, '[');
        assert_eq!(config.picker.close_delay_ms, 10);
        assert!(config.render.markup);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = load_from(&[], Some(Path::new("/tmp/pillbox_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_file(&dir, "base.toml", "[picker]\nclose_delay_ms = 50\nmax_visible = 3\n");
        let local = write_file(&dir, "local.toml", "[picker]\nmax_visible = 6\n");
        let explicit = write_file(&dir, "explicit.toml", "[render]\nshow_ids = true\n");

        let config = load_from(&[base, local], Some(&explicit)).unwrap();
        assert_eq!(config.picker.close_delay_ms, 50);
        assert_eq!(config.picker.max_visible, 6);
        assert!(config.render.show_ids);
        assert!(config.render.markup, "unset fields keep their defaults");
    }

    #[test]
    fn invalid_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_file(&dir, "bad.toml", "[picker]\ntrigger = \"too long\"\n");
        assert!(load_from(&[], Some(&bad)).is_err());
    }
}
