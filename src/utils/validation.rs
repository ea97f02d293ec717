use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Checks the filename's extension against the single allowed one, ignoring case
pub fn validate_extension(filename: &str, allowed: &str) -> Result<(), ValidationError> {
    let allowed = allowed.trim_start_matches('.');
    let matches = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(allowed));

    if matches {
        return Ok(());
    }

    Err(ValidationError {
        code: "INVALID_EXTENSION",
        message: format!("Only {} files are allowed!", allowed.to_uppercase()),
    })
}

/// Reduces a client-supplied filename to its last path component
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    // Browsers on Windows may send backslash separated paths
    let normalized = filename.replace('\\', "/");
    let name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ValidationError {
            code: "INVALID_FILENAME",
            message: "Filename cannot be empty".to_string(),
        });
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError {
            code: "INVALID_FILENAME",
            message: "Filename contains control characters".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Produces `<millis>-<name>` stored names. The millisecond prefix never
/// repeats for a given generator, even when the wall clock stalls or steps back.
#[derive(Debug, Default)]
pub struct StoredNameGenerator {
    last: AtomicI64,
}

impl StoredNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn stored_name(&self, original: &str) -> String {
        format!("{}-{}", self.next_timestamp(), original)
    }
}
