//! Symbol names for generated code

/// Characters replaced by `_` when deriving a symbol name
pub const BLACKLIST: &[char] = &[' ', '.', '/', '\\', '-', '+', '#', '$', '%', '^', '!', '@'];

/// Identifiers derived from one source name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNames {
    /// Sanitized name
    pub base: String,
    /// `base` with the first character lower-cased
    pub camel: String,
    /// `base` upper-cased
    pub upper: String,
}

impl SymbolNames {
    pub fn new(name: &str) -> Self {
        let base = sanitize(name);
        let mut chars = base.chars();
        let camel = match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        };
        let upper = base.to_uppercase();
        Self { base, camel, upper }
    }
}

/// Replace every blacklisted character of the name's last `/` component
///
/// All other characters, including non-ASCII ones, pass through.
pub fn sanitize(name: &str) -> String {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    file_name
        .chars()
        .map(|c| if BLACKLIST.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_blacklist() {
        assert_eq!(sanitize("a b.c\\d-e+f#g$h%i^j!k@l"), "a_b_c_d_e_f_g_h_i_j_k_l");
        assert_eq!(sanitize("Cube.001"), "Cube_001");
    }

    #[test]
    fn test_sanitize_one_underscore_per_character() {
        let name: String = BLACKLIST.iter().collect();
        // '/' splits the path, so only the tail survives
        let tail = name.rsplit('/').next().unwrap();
        assert_eq!(sanitize(&name), "_".repeat(tail.chars().count()));

        let without_slash: String = BLACKLIST.iter().filter(|&&c| c != '/').collect();
        assert_eq!(sanitize(&without_slash), "_".repeat(BLACKLIST.len() - 1));
    }

    #[test]
    fn test_sanitize_takes_last_path_component() {
        assert_eq!(sanitize("/tmp/out/model.h"), "model_h");
        assert_eq!(sanitize("dir/"), "");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii() {
        assert_eq!(sanitize("Würfel ü"), "Würfel_ü");
        assert_eq!(sanitize("立方体.1"), "立方体_1");
    }

    #[test]
    fn test_symbol_names() {
        let names = SymbolNames::new("My Cube.001");
        assert_eq!(names.base, "My_Cube_001");
        assert_eq!(names.camel, "my_Cube_001");
        assert_eq!(names.upper, "MY_CUBE_001");
    }

    #[test]
    fn test_symbol_names_deterministic() {
        assert_eq!(SymbolNames::new("Suzanne#2"), SymbolNames::new("Suzanne#2"));
    }

    #[test]
    fn test_symbol_names_empty() {
        let names = SymbolNames::new("");
        assert_eq!(names.camel, "");
        assert_eq!(names.upper, "");
    }
}
