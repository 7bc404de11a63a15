use std::path::Path;

/// Frontend toolchain a project is built with; decides which build and
/// cache directories are pruned from scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Next,
    Nuxt,
    Vite,
    Angular,
    /// Any other project with a `package.json`
    Node,
    Generic,
}

const NEXT_CONFIGS: &[&str] = &["next.config.js", "next.config.mjs", "next.config.ts"];
const NUXT_CONFIGS: &[&str] = &["nuxt.config.js", "nuxt.config.ts"];
const VITE_CONFIGS: &[&str] = &["vite.config.js", "vite.config.mjs", "vite.config.ts"];

fn has_any(base_dir: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| base_dir.join(name).exists())
}

pub fn detect_project_type(base_dir: &Path) -> ProjectType {
    if has_any(base_dir, NEXT_CONFIGS) {
        ProjectType::Next
    } else if has_any(base_dir, NUXT_CONFIGS) {
        ProjectType::Nuxt
    } else if has_any(base_dir, VITE_CONFIGS) {
        ProjectType::Vite
    } else if base_dir.join("angular.json").exists() {
        ProjectType::Angular
    } else if base_dir.join("package.json").exists() {
        ProjectType::Node
    } else {
        ProjectType::Generic
    }
}

/// Directory names pruned from every walk for `project_type`
pub fn get_default_exclusions(project_type: ProjectType) -> Vec<&'static str> {
    // Dependencies, VCS metadata and build or coverage output are never app source
    let mut exclusions = vec![
        "node_modules",
        "build",
        "dist",
        ".git",
        ".svn",
        ".hg",
        ".idea",
        ".vscode",
        "coverage",
        ".turbo",
        ".cache",
    ];

    match project_type {
        ProjectType::Next => exclusions.extend_from_slice(&[".next", "out", ".vercel"]),
        ProjectType::Nuxt => exclusions.extend_from_slice(&[".nuxt", ".output"]),
        ProjectType::Vite => exclusions.push(".vite"),
        ProjectType::Angular => exclusions.push(".angular"),
        ProjectType::Node => exclusions.push("out"),
        ProjectType::Generic => exclusions.extend_from_slice(&["vendor", "target"]),
    }

    exclusions
}
