//! Property-based tests for manifest persistence and module path handling.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::Manifest;
    use crate::module::{resolve_under, Module, ModuleType};
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::path::Path;
    use tempfile::TempDir;

    fn module_strategy() -> impl Strategy<Value = Module> {
        (
            "[a-z][a-z0-9_-]{0,8}(/[a-z0-9_-]{1,8}){0,2}",
            "[a-z]{1,10}",
            "[a-z][a-z0-9/._-]{0,15}",
            prop_oneof![Just("HEAD".to_string()), "[0-9a-f]{7,40}"],
            0u32..50,
        )
            .prop_map(|(path, host, branch, commit, depth)| {
                Module::new(
                    ModuleType::Git,
                    path,
                    format!("https://{host}.example/repo.git"),
                    branch,
                    commit,
                )
                .with_depth(depth)
            })
    }

    fn modules_strategy() -> impl Strategy<Value = BTreeMap<String, Module>> {
        prop::collection::btree_map("[a-zA-Z][a-zA-Z0-9_-]{0,12}", module_strategy(), 0..6)
    }

    // ============================================================================
    // persistence
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: persisting then loading yields an identical registry
        #[test]
        fn persist_then_load_is_identity(modules in modules_strategy()) {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("mdlr.yml");

            let mut manifest = Manifest::prepare(&path);
            let parent = manifest.parent_directory().to_path_buf();
            for (name, mut module) in modules {
                module.prepare(&name, &parent);
                manifest.modules.insert(name, module);
            }
            manifest.persist().unwrap();

            let loaded = Manifest::load(&path).unwrap();
            prop_assert_eq!(&loaded, &manifest);
        }

        /// Property: load always visits modules in lexicographic order
        #[test]
        fn names_are_sorted(modules in modules_strategy()) {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("mdlr.yml");

            let mut manifest = Manifest::prepare(&path);
            manifest.modules = modules;
            manifest.persist().unwrap();

            let names = Manifest::load(&path).unwrap().names();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(names, sorted);
        }
    }

    // ============================================================================
    // path resolution
    // ============================================================================

    proptest! {
        /// Property: a validated module path always resolves strictly below the root
        #[test]
        fn valid_paths_stay_below_root(path in "(\\./)?[a-z0-9_-]{1,8}(/[a-z0-9_.-]{1,8}){0,3}") {
            let root = Path::new("/project");
            let mut module = Module::new(ModuleType::Git, path.clone(), "https://x.org/r", "main", "HEAD");
            module.prepare("m", root);

            if module.validate().is_ok() {
                prop_assert!(module.absolute_path().starts_with(root));
                prop_assert_ne!(module.absolute_path(), root);
            }
        }

        /// Property: leading "./" never changes the resolved location
        #[test]
        fn current_dir_prefix_is_ignored(path in "[a-z0-9_-]{1,8}(/[a-z0-9_-]{1,8}){0,3}") {
            let root = Path::new("/project");
            prop_assert_eq!(
                resolve_under(root, &format!("./{path}")),
                resolve_under(root, &path)
            );
        }

        /// Property: paths climbing out with ".." are always rejected
        #[test]
        fn parent_components_are_rejected(prefix in "[a-z]{1,6}", rest in "[a-z]{1,6}") {
            let path = format!("{prefix}/../{rest}");
            let mut module = Module::new(ModuleType::Git, path, "https://x.org/r", "main", "HEAD");
            module.prepare("m", Path::new("/project"));
            prop_assert!(module.validate().is_err());
        }
    }
}
