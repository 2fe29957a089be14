use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const ENV_PREFIX: &str = "TAB_ARCHIVE_";

fn sources_under(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut sources = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                sources.push(path);
            }
        }
    }
    Ok(sources)
}

/// Names like `TAB_ARCHIVE_ROOT` appearing anywhere in `source`. The bare
/// prefix alone does not count.
fn env_keys_in(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
        .filter(|token| token.len() > ENV_PREFIX.len() && token.starts_with(ENV_PREFIX))
}

fn render_allowlist(keys: &BTreeSet<String>) -> String {
    let mut out = String::from("pub const GENERATED_ENV_ALLOWLIST: &[&str] = &[\n");
    for key in keys {
        out.push_str(&format!("    {key:?},\n"));
    }
    out.push_str("];\n");
    out
}

fn main() -> std::io::Result<()> {
    let mut keys = BTreeSet::new();
    for path in sources_under(Path::new("src"))? {
        let source = fs::read_to_string(&path)?;
        keys.extend(env_keys_in(&source).map(str::to_owned));
    }

    let out_dir = env::var_os("OUT_DIR").map(PathBuf::from).unwrap_or_default();
    fs::write(out_dir.join("env_allowlist.rs"), render_allowlist(&keys))?;

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!(
        "cargo:rustc-env=BUILD_ID={}-{built_at:x}",
        env::var("CARGO_PKG_VERSION").unwrap_or_default()
    );
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
