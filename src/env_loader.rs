use std::path::PathBuf;

fn fallback_dotenv_path(config_dir: Option<PathBuf>) -> Option<PathBuf> {
    Some(config_dir?.join("tab-archive").join(".env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let Some(path) = fallback_dotenv_path(dirs::config_dir()) else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
