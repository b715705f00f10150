//! Inference of `requires` modifiers from classpath membership.
//!
//! Three roles feed the classification:
//!
//! - **static**: everything visible at compile time
//! - **transitive**: api-like dependencies re-exposed to consumers
//! - **runtime**: everything needed at run time
//!
//! Each name ends up in exactly one [`RequirementBucket`]. Explicit
//! declarations from the module spec replace whatever was inferred.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::spec::RequiresSpec;
use crate::errors::GenerateError;

/// The four mutually exclusive forms of a `requires` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequirementBucket {
    RequiresStaticTransitive,
    RequiresTransitive,
    RequiresStatic,
    Requires,
}

impl RequirementBucket {
    /// Buckets in the order they are rendered.
    pub const ALL: [RequirementBucket; 4] = [
        RequirementBucket::RequiresStaticTransitive,
        RequirementBucket::RequiresTransitive,
        RequirementBucket::RequiresStatic,
        RequirementBucket::Requires,
    ];

    pub fn from_flags(is_static: bool, transitive: bool) -> Self {
        match (is_static, transitive) {
            (true, true) => RequirementBucket::RequiresStaticTransitive,
            (false, true) => RequirementBucket::RequiresTransitive,
            (true, false) => RequirementBucket::RequiresStatic,
            (false, false) => RequirementBucket::Requires,
        }
    }

    /// The directive as written in the descriptor.
    pub fn keyword(&self) -> &'static str {
        match self {
            RequirementBucket::RequiresStaticTransitive => "requires static transitive",
            RequirementBucket::RequiresTransitive => "requires transitive",
            RequirementBucket::RequiresStatic => "requires static",
            RequirementBucket::Requires => "requires",
        }
    }
}

impl fmt::Display for RequirementBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What to do when an explicit declaration contradicts the classpaths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The declaration wins; the move is recorded as an [`Override`].
    #[default]
    Override,
    /// Any contradiction is a [`GenerateError::Conflict`].
    Error,
}

/// An explicit declaration that moved a module out of its inferred bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub module: String,
    pub inferred: RequirementBucket,
    pub declared: RequirementBucket,
}

/// The result of classification: four disjoint, sorted name sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub requires_static_transitive: BTreeSet<String>,
    pub requires_transitive: BTreeSet<String>,
    pub requires_static: BTreeSet<String>,
    pub requires: BTreeSet<String>,
    pub overrides: Vec<Override>,
}

impl Classification {
    pub fn bucket(&self, bucket: RequirementBucket) -> &BTreeSet<String> {
        match bucket {
            RequirementBucket::RequiresStaticTransitive => &self.requires_static_transitive,
            RequirementBucket::RequiresTransitive => &self.requires_transitive,
            RequirementBucket::RequiresStatic => &self.requires_static,
            RequirementBucket::Requires => &self.requires,
        }
    }

    fn bucket_mut(&mut self, bucket: RequirementBucket) -> &mut BTreeSet<String> {
        match bucket {
            RequirementBucket::RequiresStaticTransitive => &mut self.requires_static_transitive,
            RequirementBucket::RequiresTransitive => &mut self.requires_transitive,
            RequirementBucket::RequiresStatic => &mut self.requires_static,
            RequirementBucket::Requires => &mut self.requires,
        }
    }

    /// Which bucket, if any, holds `module`.
    pub fn bucket_of(&self, module: &str) -> Option<RequirementBucket> {
        RequirementBucket::ALL
            .into_iter()
            .find(|b| self.bucket(*b).contains(module))
    }

    /// Total number of `requires` directives.
    pub fn len(&self) -> usize {
        RequirementBucket::ALL
            .iter()
            .map(|b| self.bucket(*b).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every classified name with its bucket, in render order.
    pub fn iter(&self) -> impl Iterator<Item = (RequirementBucket, &str)> + '_ {
        RequirementBucket::ALL
            .into_iter()
            .flat_map(move |b| self.bucket(b).iter().map(move |n| (b, n.as_str())))
    }
}

/// Classify module names by classpath membership, then merge explicit
/// declarations.
pub fn classify(
    static_names: &BTreeSet<String>,
    transitive_names: &BTreeSet<String>,
    runtime_names: &BTreeSet<String>,
    explicit: &[RequiresSpec],
    policy: ConflictPolicy,
) -> Result<Classification, GenerateError> {
    let mut result = infer(static_names, transitive_names, runtime_names);

    for spec in explicit {
        let declared = RequirementBucket::from_flags(spec.is_static, spec.transitive);
        match result.bucket_of(&spec.module) {
            Some(inferred) if inferred == declared => continue,
            Some(inferred) => {
                if policy == ConflictPolicy::Error {
                    return Err(GenerateError::Conflict {
                        module: spec.module.clone(),
                        inferred,
                        declared,
                    });
                }
                tracing::warn!(
                    "explicit `{} {}` overrides inferred `{}`",
                    declared,
                    spec.module,
                    inferred
                );
                result.bucket_mut(inferred).remove(&spec.module);
                result.overrides.push(Override {
                    module: spec.module.clone(),
                    inferred,
                    declared,
                });
            }
            None => {}
        }
        result.bucket_mut(declared).insert(spec.module.clone());
    }

    Ok(result)
}

/// The set algebra over the three classpath roles.
fn infer(
    static_names: &BTreeSet<String>,
    transitive_names: &BTreeSet<String>,
    runtime_names: &BTreeSet<String>,
) -> Classification {
    // static and transitive, but not runtime
    let requires_static_transitive = static_names
        .intersection(transitive_names)
        .filter(|n| !runtime_names.contains(*n))
        .cloned()
        .collect();

    // transitive and runtime
    let requires_transitive = runtime_names
        .intersection(transitive_names)
        .cloned()
        .collect();

    // static only
    let requires_static = static_names
        .iter()
        .filter(|n| !runtime_names.contains(*n) && !transitive_names.contains(*n))
        .cloned()
        .collect();

    // runtime and not transitive
    let requires = runtime_names.difference(transitive_names).cloned().collect();

    Classification {
        requires_static_transitive,
        requires_transitive,
        requires_static,
        requires,
        overrides: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn names(bucket: &BTreeSet<String>) -> Vec<&str> {
        bucket.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_static_only_is_requires_static() {
        let c = classify(&set(&["m"]), &set(&[]), &set(&[]), &[], ConflictPolicy::Override).unwrap();
        assert_eq!(c.bucket_of("m"), Some(RequirementBucket::RequiresStatic));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_runtime_only_is_plain_requires() {
        let c = classify(&set(&[]), &set(&[]), &set(&["m"]), &[], ConflictPolicy::Override).unwrap();
        assert_eq!(c.bucket_of("m"), Some(RequirementBucket::Requires));
    }

    #[test]
    fn test_all_three_roles_is_requires_transitive() {
        let all = set(&["m"]);
        let c = classify(&all, &all, &all, &[], ConflictPolicy::Override).unwrap();
        assert_eq!(c.bucket_of("m"), Some(RequirementBucket::RequiresTransitive));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_mixed_scenario() {
        let c = classify(
            &set(&["m1", "m2"]),
            &set(&["m1"]),
            &set(&["m2"]),
            &[],
            ConflictPolicy::Override,
        )
        .unwrap();

        assert_eq!(names(&c.requires_static_transitive), vec!["m1"]);
        assert_eq!(names(&c.requires), vec!["m2"]);
        assert!(c.requires_static.is_empty());
        assert!(c.requires_transitive.is_empty());
    }

    #[test]
    fn test_transitive_only_is_not_required() {
        let c = classify(&set(&[]), &set(&["m"]), &set(&[]), &[], ConflictPolicy::Override).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_explicit_without_classpath_presence() {
        let explicit = [RequiresSpec::new("org.example").with_static(true)];
        let c = classify(&set(&[]), &set(&[]), &set(&[]), &explicit, ConflictPolicy::Override)
            .unwrap();

        assert_eq!(names(&c.requires_static), vec!["org.example"]);
        assert!(c.overrides.is_empty());
    }

    #[test]
    fn test_explicit_flags_select_bucket() {
        let explicit = [
            RequiresSpec::new("a").with_static(true).with_transitive(true),
            RequiresSpec::new("b").with_transitive(true),
            RequiresSpec::new("c").with_static(true),
            RequiresSpec::new("d"),
        ];
        let empty = set(&[]);
        let c = classify(&empty, &empty, &empty, &explicit, ConflictPolicy::Override).unwrap();

        assert_eq!(names(&c.requires_static_transitive), vec!["a"]);
        assert_eq!(names(&c.requires_transitive), vec!["b"]);
        assert_eq!(names(&c.requires_static), vec!["c"]);
        assert_eq!(names(&c.requires), vec!["d"]);
    }

    #[test]
    fn test_explicit_overrides_inferred_bucket() {
        let explicit = [RequiresSpec::new("m").with_static(true)];
        let c = classify(&set(&[]), &set(&[]), &set(&["m"]), &explicit, ConflictPolicy::Override)
            .unwrap();

        assert_eq!(c.bucket_of("m"), Some(RequirementBucket::RequiresStatic));
        assert!(c.requires.is_empty());
        assert_eq!(
            c.overrides,
            vec![Override {
                module: "m".to_string(),
                inferred: RequirementBucket::Requires,
                declared: RequirementBucket::RequiresStatic,
            }]
        );
    }

    #[test]
    fn test_matching_explicit_is_not_an_override() {
        let explicit = [RequiresSpec::new("m")];
        let c = classify(&set(&[]), &set(&[]), &set(&["m"]), &explicit, ConflictPolicy::Error)
            .unwrap();

        assert_eq!(c.bucket_of("m"), Some(RequirementBucket::Requires));
        assert!(c.overrides.is_empty());
    }

    #[test]
    fn test_conflict_policy_error() {
        let explicit = [RequiresSpec::new("m").with_transitive(true)];
        let err = classify(&set(&["m"]), &set(&[]), &set(&[]), &explicit, ConflictPolicy::Error)
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::Conflict {
                inferred: RequirementBucket::RequiresStatic,
                declared: RequirementBucket::RequiresTransitive,
                ..
            }
        ));
    }

    #[test]
    fn test_buckets_partition_union() {
        let s = set(&["a", "b", "c", "d"]);
        let t = set(&["b", "c", "e"]);
        let r = set(&["c", "d", "e", "f"]);
        let explicit = [RequiresSpec::new("g"), RequiresSpec::new("a").with_transitive(true)];
        let c = classify(&s, &t, &r, &explicit, ConflictPolicy::Override).unwrap();

        let mut seen = BTreeSet::new();
        for (_, name) in c.iter() {
            assert!(seen.insert(name.to_string()), "{name} classified twice");
        }

        let mut expected: BTreeSet<String> = s.union(&r).cloned().collect();
        expected.extend(s.intersection(&t).cloned());
        expected.insert("g".to_string());
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_iter_follows_render_order() {
        let c = classify(
            &set(&["s", "st"]),
            &set(&["st", "t"]),
            &set(&["t", "r"]),
            &[],
            ConflictPolicy::Override,
        )
        .unwrap();

        let order: Vec<_> = c.iter().collect();
        assert_eq!(
            order,
            vec![
                (RequirementBucket::RequiresStaticTransitive, "st"),
                (RequirementBucket::RequiresTransitive, "t"),
                (RequirementBucket::RequiresStatic, "s"),
                (RequirementBucket::Requires, "r"),
            ]
        );
    }
}
