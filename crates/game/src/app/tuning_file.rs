use std::fs;
use std::io;
use std::path::Path;

use sidescroll_engine::Tuning;
use tracing::info;

type TuningFileResult<T> = Result<T, String>;

/// Reads optional gameplay overrides. A missing file means defaults; a
/// present but broken one is a startup error naming the bad field.
pub(crate) fn load_tuning_file(path: &Path) -> TuningFileResult<Tuning> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "tuning_file_missing_using_defaults");
            return Ok(Tuning::default());
        }
        Err(error) => return Err(format!("read tuning '{}': {error}", path.display())),
    };
    let tuning = parse_tuning_json(&raw)
        .map_err(|message| format!("tuning '{}': {message}", path.display()))?;
    tuning
        .validate()
        .map_err(|error| format!("tuning '{}': {error}", path.display()))?;
    info!(path = %path.display(), "tuning_loaded");
    Ok(tuning)
}

fn parse_tuning_json(raw: &str) -> TuningFileResult<Tuning> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Tuning>(&mut deserializer) {
        Ok(tuning) => Ok(tuning),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse json: {source}"))
            } else {
                Err(format!("parse json at {path}: {source}"))
            }
        }
    }
}
