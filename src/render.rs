//! Serialization of a module descriptor to `module-info.java` text.
//!
//! Output is fully determined by its inputs: `requires` names come from
//! sorted sets, qualified target lists are sorted, and everything else keeps
//! declaration order. Versions are never written.

use crate::classify::{Classification, RequirementBucket};
use crate::core::spec::{ModuleDescriptorSpec, PackageSpec};

const INDENT: &str = "    ";

/// Render the descriptor for `spec` with the given requirements.
pub fn render(spec: &ModuleDescriptorSpec, requirements: &Classification) -> String {
    let mut out = String::new();

    if spec.is_open() {
        out.push_str("open ");
    }
    out.push_str(&format!("module {} {{\n", spec.name()));

    for bucket in RequirementBucket::ALL {
        for name in requirements.bucket(bucket) {
            out.push_str(&format!("{}{} {};\n", INDENT, bucket.keyword(), name));
        }
    }

    if !spec.uses().is_empty() {
        out.push('\n');
        for service in spec.uses() {
            out.push_str(&format!("{}uses {};\n", INDENT, service));
        }
    }

    if !spec.provides().is_empty() {
        out.push('\n');
        for provides in spec.provides() {
            out.push_str(&format!(
                "{}provides {} with {};\n",
                INDENT,
                provides.service,
                provides.implementations.join(", ")
            ));
        }
    }

    write_packages(&mut out, "exports", spec.exports());
    write_packages(&mut out, "opens", spec.opens());

    out.push_str("}\n");
    out
}

fn write_packages(out: &mut String, directive: &str, packages: &[PackageSpec]) {
    if packages.is_empty() {
        return;
    }

    out.push('\n');
    for package in packages {
        out.push_str(&format!("{}{} {}", INDENT, directive, package.package));
        if package.is_qualified() {
            let mut targets: Vec<&str> = package.modules.iter().map(String::as_str).collect();
            targets.sort_unstable();
            out.push_str(&format!(" to {}", targets.join(", ")));
        }
        out.push_str(";\n");
    }
}
