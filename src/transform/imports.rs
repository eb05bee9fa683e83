//! Import-alias rewriting
//!
//! Rewrites module specifiers in static and dynamic imports from the
//! registry's internal namespace (`@/registry/...`) into the consuming
//! project's own alias scheme. Each import site is visited exactly once, so
//! a remote-sourced specifier that gets mapped into the registry namespace
//! is never rewritten a second time.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};

use crate::config::Config;
use crate::error::Result;
use crate::transform::{TransformContext, TransformStage};

/// Namespace registry items use for their own internal imports
const REGISTRY_NAMESPACE: &str = "@/registry/";

/// Namespace remote (non-registry) items are mapped into before rewriting
const REMOTE_NAMESPACE: &str = "@/registry/new-york/";

/// Shared helper binding that redirects a lib/utils import to the `utils`
/// alias
const SHARED_HELPER: &str = "cn";

fn static_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\s+(?:type\s+)?(?P<bindings>[A-Za-z0-9_$\s,{}*]+?)\s*from\s*["'](?P<spec>[^"']+)["']"#)
            .expect("valid regex")
    })
}

fn bare_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"import\s*["'](?P<spec>[^"']+)["']"#).expect("valid regex"))
}

fn dynamic_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\s*\(\s*["'](?P<spec>[^"']+)["']\s*\)"#).expect("valid regex")
    })
}

fn destructured_dynamic_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:const|let|var)\s*\{(?P<bindings>[^}]*)\}\s*=\s*await\s+import\s*\(\s*["'](?P<spec>[^"']+)["']\s*\)"#,
        )
        .expect("valid regex")
    })
}

/// Import-alias rewrite stage
pub struct ImportRewrite;

impl TransformStage for ImportRewrite {
    fn name(&self) -> &'static str {
        "import-alias"
    }

    fn apply(&self, ctx: &TransformContext, source: &str) -> Result<(String, usize)> {
        Ok(rewrite_imports(source, ctx.config, ctx.is_remote))
    }
}

struct ImportSite {
    range: Range<usize>,
    spec: String,
    bindings: Option<String>,
    /// Destructured dynamic imports match binding keys, static imports
    /// match local names
    destructured: bool,
}

/// Specifier spans of every import site, for callers that rewrite imports
/// without the registry-namespace mapping (the post-write alias resolver)
pub fn import_specifier_sites(source: &str) -> Vec<(Range<usize>, String)> {
    collect_sites(source)
        .into_values()
        .map(|site| (site.range, site.spec))
        .collect()
}

fn collect_sites(source: &str) -> BTreeMap<usize, ImportSite> {
    // Keyed by specifier start so overlapping regexes visit a site once.
    let mut sites: BTreeMap<usize, ImportSite> = BTreeMap::new();

    for caps in destructured_dynamic_import_re().captures_iter(source) {
        let spec = caps.name("spec").expect("spec group");
        sites.insert(
            spec.start(),
            ImportSite {
                range: spec.range(),
                spec: spec.as_str().to_string(),
                bindings: caps.name("bindings").map(|m| m.as_str().to_string()),
                destructured: true,
            },
        );
    }

    for caps in static_import_re().captures_iter(source) {
        let spec = caps.name("spec").expect("spec group");
        sites.entry(spec.start()).or_insert_with(|| ImportSite {
            range: spec.range(),
            spec: spec.as_str().to_string(),
            bindings: caps.name("bindings").map(|m| m.as_str().to_string()),
            destructured: false,
        });
    }

    for re in [bare_import_re(), dynamic_import_re()] {
        for caps in re.captures_iter(source) {
            let spec = caps.name("spec").expect("spec group");
            sites.entry(spec.start()).or_insert_with(|| ImportSite {
                range: spec.range(),
                spec: spec.as_str().to_string(),
                bindings: None,
                destructured: false,
            });
        }
    }

    sites
}

/// Rewrite every import specifier in `source` once
pub fn rewrite_imports(source: &str, config: &Config, is_remote: bool) -> (String, usize) {
    let sites = collect_sites(source);

    let utils_alias = config.aliases.utils.clone();
    let workspace_alias = if utils_alias.contains('/') {
        utils_alias.split('/').next().unwrap_or("@").to_string()
    } else {
        "@".to_string()
    };
    let utils_import = format!("{workspace_alias}/lib/utils");

    let mut out = source.to_string();
    let mut count = 0;

    // Replace back-to-front so earlier ranges stay valid.
    for site in sites.values().rev() {
        let mut updated = update_import_aliases(&site.spec, config, is_remote);

        // The shared `cn` helper always comes from the utils alias, even
        // when the specifier otherwise resolves to lib.
        if (updated == utils_import || updated == "@/lib/utils") && !utils_alias.is_empty() {
            let has_helper = site
                .bindings
                .as_deref()
                .is_some_and(|b| binding_names(b, site.destructured).iter().any(|n| n == SHARED_HELPER));

            if has_helper {
                updated = if updated == utils_import {
                    updated.replacen(&utils_import, &utils_alias, 1)
                } else {
                    utils_alias.clone()
                };
            }
        }

        if updated != site.spec {
            out.replace_range(site.range.clone(), &updated);
            count += 1;
        }
    }

    (out, count)
}

/// Names bound by an import clause or destructuring pattern
///
/// Static imports bind local names (`{ cn as cx }` binds `cx`);
/// destructured dynamic imports match on the property key (`{ cn: cx }`
/// still reads key `cn`).
fn binding_names(bindings: &str, destructured: bool) -> Vec<String> {
    bindings
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let name = if destructured {
                entry.split(':').next().unwrap_or(entry)
            } else if let Some((_, local)) = entry.split_once(" as ") {
                local
            } else {
                entry
            };
            Some(name.trim().to_string())
        })
        .collect()
}

fn registry_sub_path_re(segment: &str) -> Regex {
    Regex::new(&format!(r"^@/registry/(.+)/{segment}")).expect("valid regex")
}

fn registry_root_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@/registry/[^/]+").expect("valid regex"))
}

/// Map one specifier into the project's alias scheme
///
/// Specifiers outside the registry namespace pass through unless the item
/// is remote, in which case they are first mapped into the synthetic
/// registry namespace. Longest-matching internal segment wins; anything
/// else under the namespace falls back to the components alias.
pub fn update_import_aliases(spec: &str, config: &Config, is_remote: bool) -> String {
    // Not a local import.
    if !spec.starts_with("@/") && !is_remote {
        return spec.to_string();
    }

    // A remote item's imports are treated as coming from a faux registry.
    let spec = if is_remote && spec.starts_with("@/") {
        spec.replacen("@/", REMOTE_NAMESPACE, 1)
    } else {
        spec.to_string()
    };

    // Not a registry import: fix the alias prefix and return.
    if !spec.starts_with(REGISTRY_NAMESPACE) {
        let alias = config
            .aliases
            .components
            .split('/')
            .next()
            .unwrap_or("@")
            .to_string();
        return spec.replacen("@/", &format!("{alias}/"), 1);
    }

    let ui_alias = config
        .aliases
        .ui
        .clone()
        .unwrap_or_else(|| format!("{}/ui", config.aliases.components));
    let ui_re = registry_sub_path_re("ui");
    if ui_re.is_match(&spec) {
        return ui_re.replace(&spec, NoExpand(&ui_alias)).into_owned();
    }

    if !config.aliases.components.is_empty() {
        let components_re = registry_sub_path_re("components");
        if components_re.is_match(&spec) {
            return components_re
                .replace(&spec, NoExpand(&config.aliases.components))
                .into_owned();
        }
    }

    if let Some(lib_alias) = &config.aliases.lib {
        let lib_re = registry_sub_path_re("lib");
        if lib_re.is_match(&spec) {
            return lib_re.replace(&spec, NoExpand(lib_alias)).into_owned();
        }
    }

    if let Some(composables_alias) = &config.aliases.composables {
        let composables_re = registry_sub_path_re("composables");
        if composables_re.is_match(&spec) {
            return composables_re
                .replace(&spec, NoExpand(composables_alias))
                .into_owned();
        }
    }

    registry_root_re()
        .replace(&spec, NoExpand(&config.aliases.components))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AliasOverlay, ConfigOverlay};

    fn config() -> Config {
        crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("~/components".to_string()),
                utils: Some("~/lib/utils".to_string()),
                ui: Some("~/components/ui".to_string()),
                lib: Some("~/lib".to_string()),
                composables: Some("~/composables".to_string()),
                ..AliasOverlay::default()
            },
            ..ConfigOverlay::default()
        })
    }

    #[test]
    fn test_registry_ui_import() {
        let out = update_import_aliases("@/registry/new-york/ui/button", &config(), false);
        assert_eq!(out, "~/components/ui/button");
    }

    #[test]
    fn test_registry_components_import() {
        let out = update_import_aliases("@/registry/default/components/Callout.vue", &config(), false);
        assert_eq!(out, "~/components/Callout.vue");
    }

    #[test]
    fn test_registry_lib_and_composables() {
        let cfg = config();
        assert_eq!(
            update_import_aliases("@/registry/default/lib/utils", &cfg, false),
            "~/lib/utils"
        );
        assert_eq!(
            update_import_aliases("@/registry/default/composables/use-toast", &cfg, false),
            "~/composables/use-toast"
        );
    }

    #[test]
    fn test_registry_other_sub_path_falls_back_to_components() {
        let out = update_import_aliases("@/registry/default/blocks/Hero.vue", &config(), false);
        assert_eq!(out, "~/components/blocks/Hero.vue");
    }

    #[test]
    fn test_non_registry_local_import_gets_alias_prefix() {
        let out = update_import_aliases("@/lib/utils", &config(), false);
        assert_eq!(out, "~/lib/utils");
    }

    #[test]
    fn test_external_import_untouched() {
        let out = update_import_aliases("reka-ui", &config(), false);
        assert_eq!(out, "reka-ui");
    }

    #[test]
    fn test_remote_import_mapped_through_registry_namespace() {
        let out = update_import_aliases("@/ui/button", &config(), true);
        assert_eq!(out, "~/components/ui/button");
    }

    #[test]
    fn test_missing_lib_alias_falls_back_to_components() {
        let cfg = crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("@/components".to_string()),
                utils: Some("@/lib/utils".to_string()),
                ..AliasOverlay::default()
            },
            ..ConfigOverlay::default()
        });

        let out = update_import_aliases("@/registry/default/lib/utils", &cfg, false);
        assert_eq!(out, "@/components/lib/utils");
    }

    #[test]
    fn test_rewrite_static_import() {
        let source = "import { Button } from '@/registry/new-york/ui/button'\n";
        let (out, count) = rewrite_imports(source, &config(), false);
        assert_eq!(out, "import { Button } from '~/components/ui/button'\n");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_rewrite_multiline_import() {
        let source = "import {\n  Card,\n  CardContent,\n} from \"@/registry/new-york/ui/card\"\n";
        let (out, _) = rewrite_imports(source, &config(), false);
        assert!(out.contains("from \"~/components/ui/card\""));
    }

    #[test]
    fn test_rewrite_dynamic_import() {
        let source = "const mod = await import('@/registry/new-york/ui/dialog')\n";
        let (out, _) = rewrite_imports(source, &config(), false);
        assert!(out.contains("import('~/components/ui/dialog')"));
    }

    #[test]
    fn test_cn_import_redirected_to_utils_alias() {
        let cfg = crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("~/components".to_string()),
                utils: Some("~/shared/cn".to_string()),
                lib: Some("~/lib".to_string()),
                ..AliasOverlay::default()
            },
            ..ConfigOverlay::default()
        });

        let source = "import { cn } from '@/lib/utils'\n";
        let (out, _) = rewrite_imports(source, &cfg, false);
        assert_eq!(out, "import { cn } from '~/shared/cn'\n");
    }

    #[test]
    fn test_cn_rule_ignores_other_bindings() {
        let cfg = crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("~/components".to_string()),
                utils: Some("~/shared/cn".to_string()),
                ..AliasOverlay::default()
            },
            ..ConfigOverlay::default()
        });

        let source = "import { formatDate } from '@/lib/utils'\n";
        let (out, _) = rewrite_imports(source, &cfg, false);
        assert_eq!(out, "import { formatDate } from '~/lib/utils'\n");
    }

    #[test]
    fn test_cn_destructured_dynamic_import() {
        let cfg = crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("~/components".to_string()),
                utils: Some("~/shared/cn".to_string()),
                ..AliasOverlay::default()
            },
            ..ConfigOverlay::default()
        });

        let source = "const { cn } = await import('@/lib/utils')\n";
        let (out, _) = rewrite_imports(source, &cfg, false);
        assert!(out.contains("import('~/shared/cn')"));
    }

    #[test]
    fn test_remote_specifiers_never_double_rewritten() {
        // A remote spec is first mapped into the registry namespace, then
        // resolved once; running the whole pass must visit it exactly once.
        let source = "import { Button } from '@/ui/button'\nimport { cn } from '@/lib/utils'\n";
        let (out, _) = rewrite_imports(source, &config(), true);
        assert!(out.contains("from '~/components/ui/button'"));
        // `@/lib/utils` remote: maps to @/registry/new-york/lib/utils, then
        // the lib alias; the cn rule pins it to the utils alias.
        assert!(out.contains("from '~/lib/utils'"));
        assert!(!out.contains("@/registry/"));
        assert!(!out.contains("~/components/~"));
    }

    #[test]
    fn test_relative_imports_untouched() {
        let source = "import Button from './Button.vue'\n";
        let (out, count) = rewrite_imports(source, &config(), false);
        assert_eq!(out, source);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_binding_names_static() {
        assert_eq!(
            binding_names("{ cn, type VariantProps }", false),
            vec!["cn", "type VariantProps"]
        );
        assert_eq!(binding_names("{ cn as cx }", false), vec!["cx"]);
    }

    #[test]
    fn test_binding_names_destructured() {
        assert_eq!(binding_names("cn: cx", true), vec!["cn"]);
    }
}
