//! `${...}` variable interpolation for configuration values
//!
//! Supported references:
//!
//! - `${other.key}`: another key of the same configuration
//! - `${env:NAME}`: an environment variable
//! - `${sys:user.home}`, `${sys:user.name}`, `${sys:user.dir}`,
//!   `${sys:java.io.tmpdir}`: host properties
//!
//! References that cannot be resolved are kept literally.

/// Nesting limit for references that expand to further references.
pub const MAX_DEPTH: usize = 8;

/// Expand every `${...}` reference in `value`.
///
/// `lookup` resolves plain keys (no prefix); it returns the raw,
/// uninterpolated value.
pub fn interpolate<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    expand(value, lookup, 0)
}

fn expand<F>(value: &str, lookup: &F, depth: usize) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if depth >= MAX_DEPTH || !value.contains("${") {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match resolve(name, lookup) {
            Some(resolved) => out.push_str(&expand(&resolved, lookup, depth + 1)),
            None => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn resolve<F>(name: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(var) = name.strip_prefix("env:") {
        return std::env::var(var).ok();
    }
    if let Some(prop) = name.strip_prefix("sys:") {
        return system_property(prop);
    }
    lookup(name)
}

fn system_property(name: &str) -> Option<String> {
    match name {
        "user.home" => dirs::home_dir().map(|p| p.to_string_lossy().to_string()),
        "user.name" => std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok(),
        "user.dir" => std::env::current_dir()
            .ok()
            .map(|p| p.to_string_lossy().to_string()),
        "java.io.tmpdir" => Some(std::env::temp_dir().to_string_lossy().to_string()),
        _ => None,
    }
}
