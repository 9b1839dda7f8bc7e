//! Collision-free node names.

/// Pick a node name that `taken` does not report as used.
///
/// For "about", tries "about", "about-1", "about-2", etc.
pub fn unique_child_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }

    for i in 1..1000 {
        let candidate = format!("{name}-{i}");
        if !taken(&candidate) {
            return candidate;
        }
    }

    // Fallback: random suffix
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{name}-{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_name_is_kept() {
        assert_eq!(unique_child_name("about", |_| false), "about");
    }

    #[test]
    fn test_collisions_are_suffixed() {
        let used = ["about", "about-1"];
        assert_eq!(unique_child_name("about", |n| used.contains(&n)), "about-2");
    }
}
